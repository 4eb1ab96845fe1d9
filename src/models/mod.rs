//! Core data models for the draft analyzer.

mod draft;
mod hero;
mod ids;
mod matchup;
mod stats;
mod team;
mod version;
mod win_condition;

pub use draft::*;
pub use hero::*;
pub use ids::*;
pub use matchup::*;
pub use stats::*;
pub use team::*;
pub use version::*;
pub use win_condition::*;
