//! File-backed store for records and the sync-date marker

use crate::config::OutputConfig;
use crate::record::SourceDate;
use crate::store::{
    load_stored, read_sync_date, save_stored, write_sync_date, StoreResult, StoredRecords,
};
use std::path::{Path, PathBuf};

/// The pair of files a sync run reads and writes
#[derive(Debug, Clone)]
pub struct JsonStore {
    records_path: PathBuf,
    sync_date_path: PathBuf,
}

impl JsonStore {
    /// Creates a store over the given record and sync-date files
    pub fn new(records_path: impl Into<PathBuf>, sync_date_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            sync_date_path: sync_date_path.into(),
        }
    }

    /// Creates a store from the output section of the configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.records_path, &config.sync_date_path)
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn sync_date_path(&self) -> &Path {
        &self.sync_date_path
    }

    pub fn load(&self) -> StoredRecords {
        load_stored(&self.records_path)
    }

    pub fn save(&self, stored: &StoredRecords) -> StoreResult<usize> {
        save_stored(stored, &self.records_path)
    }

    pub fn last_sync_date(&self) -> Option<SourceDate> {
        read_sync_date(&self.sync_date_path)
    }

    pub fn record_sync_date(&self, date: &SourceDate) -> StoreResult<()> {
        write_sync_date(date, &self.sync_date_path)
    }
}
