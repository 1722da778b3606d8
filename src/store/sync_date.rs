//! Sync-date marker file

use crate::record::SourceDate;
use crate::store::{write_atomic, StoreResult};
use std::path::Path;

/// Reads the last applied source date
///
/// Missing, empty or unparseable files all mean "never synced".
pub fn read_sync_date(path: &Path) -> Option<SourceDate> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse() {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unreadable sync date '{}': {}", trimmed, e);
            None
        }
    }
}

/// Records `date` as the last applied source date
pub fn write_sync_date(date: &SourceDate, path: &Path) -> StoreResult<()> {
    write_atomic(path, |writer| writer.write_all(date.to_string().as_bytes()))?;
    tracing::info!("Sync date updated: {}", date);
    Ok(())
}
