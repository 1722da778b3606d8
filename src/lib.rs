//! hddt-sync: e-invoice organization registry synchronizer
//!
//! This crate fetches the public list of tax-registered e-invoice service
//! organizations, extracts its table into typed records, and reconciles them
//! into a locally persisted JSON store. Work is skipped entirely when the
//! page's declared "last updated" month has not changed since the last run.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod record;
pub mod store;
pub mod sync;

use thiserror::Error;

/// Main error type for hddt-sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for hddt-sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{RecordStore, SourceDate, TaxId, TaxRecord};
pub use sync::{run_sync, SyncOutcome, Synchronizer};
