//! Storage module for persisting sync results
//!
//! This module owns the two files a run touches:
//! - The JSON record store, rewritten atomically via a temporary file
//! - The sync-date marker holding the last applied source month
//!
//! The two are written independently. The marker is only updated after the
//! record store was saved, so a crash in between causes a harmless rerun.

mod atomic;
mod json_store;
mod records;
mod sync_date;

pub use atomic::{temp_path, write_atomic};
pub use json_store::JsonStore;
pub use records::{
    load_records, load_stored, save_records, save_stored, StoredRecords,
};
pub use sync_date::{read_sync_date, write_sync_date};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
