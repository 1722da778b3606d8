//! Sync pipeline - one fetch, one merge, one write
//!
//! Transport → date extraction → gate → table extraction → load → merge →
//! save → sync date. Every early exit is reported as a [`SyncOutcome`].

use crate::extract::{extract_records, extract_source_date, TableSource};
use crate::fetch::{FetchError, Transport};
use crate::record::SourceDate;
use crate::store::JsonStore;
use crate::sync::{merge, should_proceed, MergeStats};
use crate::SyncError;

/// Length of the URL prefix shown in logs; the portal URL is very long
const LOGGED_URL_CHARS: usize = 60;

/// Knobs for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Merge even if the source date matches the last sync
    pub force: bool,
    /// Merge in memory and report, but write nothing
    pub dry_run: bool,
}

/// Why a run stopped before looking at the records
#[derive(Debug)]
pub enum AbortReason {
    /// The page could not be retrieved
    FetchFailed(FetchError),
    /// The page carries no usable "last updated" date
    SourceDateMissing,
}

/// How a run ended
#[derive(Debug)]
pub enum SyncOutcome {
    /// Records were merged and saved
    Synced {
        source_date: SourceDate,
        stats: MergeStats,
        total_records: usize,
    },
    /// The source date equals the last applied one
    UpToDate { source_date: SourceDate },
    /// The page had no table or no usable rows
    NoRecords {
        source_date: SourceDate,
        table: TableSource,
    },
    /// Dry run: what a real run would have saved
    DryRun {
        source_date: SourceDate,
        stats: MergeStats,
        total_records: usize,
    },
    /// Stopped early without touching any file
    Aborted(AbortReason),
}

/// Runs the sync pipeline against a transport and a store
pub struct Synchronizer<T: Transport> {
    transport: T,
    store: JsonStore,
    source_url: String,
    options: RunOptions,
}

impl<T: Transport> Synchronizer<T> {
    pub fn new(transport: T, store: JsonStore, source_url: impl Into<String>) -> Self {
        Self {
            transport,
            store,
            source_url: source_url.into(),
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Executes one run
    ///
    /// The sync date is written only after the record store was saved. A
    /// failure to write it is logged and does not fail the run; the next run
    /// then repeats the merge, which changes nothing.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        tracing::info!("Fetching {}...", url_prefix(&self.source_url));

        let html = match self.transport.fetch(&self.source_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Fetch failed: {}", e);
                return Ok(SyncOutcome::Aborted(AbortReason::FetchFailed(e)));
            }
        };
        tracing::debug!("Fetched {} bytes", html.len());

        let Some(source_date) = extract_source_date(&html) else {
            tracing::warn!("Could not determine source date, aborting");
            return Ok(SyncOutcome::Aborted(AbortReason::SourceDateMissing));
        };
        tracing::info!("Source date: {}", source_date);

        let last_synced = self.store.last_sync_date();
        if !should_proceed(&source_date, last_synced.as_ref()) {
            if self.options.force {
                tracing::info!("Source unchanged ({}), continuing because of --force", source_date);
            } else {
                tracing::info!("Store is up to date ({}), nothing to do", source_date);
                return Ok(SyncOutcome::UpToDate { source_date });
            }
        }

        let extraction = extract_records(&html);
        tracing::info!(
            "Extracted {} records from source ({} rows skipped)",
            extraction.records.len(),
            extraction.skipped_rows()
        );

        if extraction.records.is_empty() {
            tracing::warn!("No records found in the table");
            return Ok(SyncOutcome::NoRecords {
                source_date,
                table: extraction.source,
            });
        }

        let mut stored = self.store.load();
        let stats = merge(&mut stored.records, extraction.records);
        let total_records = stored.records.len();

        if self.options.dry_run {
            tracing::info!("Dry run: {} records would be saved", total_records);
            return Ok(SyncOutcome::DryRun {
                source_date,
                stats,
                total_records,
            });
        }

        self.store.save(&stored)?;

        if let Err(e) = self.store.record_sync_date(&source_date) {
            tracing::error!("Failed to update sync date: {}", e);
        }

        Ok(SyncOutcome::Synced {
            source_date,
            stats,
            total_records,
        })
    }
}

fn url_prefix(url: &str) -> &str {
    match url.char_indices().nth(LOGGED_URL_CHARS) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}
