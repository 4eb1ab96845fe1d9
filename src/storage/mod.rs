//! Embedded record store.
//!
//! Every record type lives in its own JSONL file under `data_dir/tables/`:
//! - `jsonl`: line-oriented readers and writers
//! - `store`: typed table access (CRUD, read-modify-write under a lock)

use std::path::PathBuf;
use thiserror::Error;

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{table} record not found: {id}")]
    NotFound { table: &'static str, id: String },

    #[error("{table} record already exists: {id}")]
    Duplicate { table: &'static str, id: String },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir.join("tables")
    }

    pub fn table_path(&self, table: Table) -> PathBuf {
        self.tables_dir().join(table.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
