//! # ROV Draft
//!
//! Draft recorder and analytics service for Arena of Valor tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (heroes, versions, matches, drafts, etc.)
//! - **draft**: The 20-step ban/pick sequence and draft validation
//! - **storage**: Embedded JSONL record store
//! - **calculate**: Hero, synergy, matchup, team pool and win condition statistics
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation
//! - **ingest**: Bulk hero import

pub mod api;
pub mod calculate;
pub mod config;
pub mod draft;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
