//! Synchronization of the local store with the source page
//!
//! This module contains the core run logic:
//! - The date gate that skips runs when the source has not changed
//! - The reconciler that upserts extracted records into the store
//! - The pipeline tying fetch, extraction and persistence together

mod gate;
mod pipeline;
mod reconcile;

pub use gate::should_proceed;
pub use pipeline::{AbortReason, RunOptions, SyncOutcome, Synchronizer};
pub use reconcile::{merge, MergeStats};

use crate::config::Config;
use crate::fetch::HttpTransport;
use crate::store::JsonStore;
use crate::SyncError;

/// Runs one synchronization with the production transport
///
/// This is the main entry point used by the binary. It will:
/// 1. Build the HTTP transport from `config.source`
/// 2. Open the record and sync-date files from `config.output`
/// 3. Fetch, gate, extract, merge and persist
///
/// # Returns
///
/// * `Ok(SyncOutcome)` - The run finished; aborted runs are an outcome too
/// * `Err(SyncError)` - The client could not be built or the store not saved
pub async fn run_sync(config: &Config, options: RunOptions) -> Result<SyncOutcome, SyncError> {
    let transport = HttpTransport::new(&config.source)?;
    let store = JsonStore::from_config(&config.output);

    Synchronizer::new(transport, store, config.source.url.clone())
        .with_options(options)
        .run()
        .await
}
