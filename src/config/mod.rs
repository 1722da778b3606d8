//! Configuration module for hddt-sync
//!
//! Every setting has a built-in default, so the job runs without a config
//! file. A TOML file can override any of them and the `PROXY_URL`
//! environment variable is layered on top.
//!
//! # Example
//!
//! ```no_run
//! use hddt_sync::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hddt-sync.toml")).unwrap();
//! println!("Records are stored in: {}", config.output.records_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, SourceConfig, DEFAULT_SOURCE_URL, PROXY_ENV_VAR};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
