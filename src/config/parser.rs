//! Reading the optional TOML settings file
//!
//! The job normally runs from a scheduler with built-in defaults. When a
//! settings file is given, its SHA-256 is logged next to the run so that a
//! given write of the record store can be traced back to the exact settings
//! that produced it.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads the settings file at `path`
///
/// Sections and keys missing from the file keep their defaults. Environment
/// overrides are not applied here; see [`Config::apply_env`].
///
/// # Errors
///
/// `ConfigError::Io` if the file cannot be read, `Parse` for malformed TOML
/// and `Validation`/`InvalidUrl` for values the job cannot run with.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hddt_sync::config::load_config;
///
/// let config = load_config(Path::new("hddt-sync.toml")).unwrap();
/// println!("Source: {}", config.source.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_settings(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 of the settings file as it is on disk
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(settings_digest(&std::fs::read_to_string(path)?))
}

/// Loads the settings file and returns it with its digest
///
/// The file is read once, so the digest always matches the settings the
/// run actually uses even if the file is replaced while the job starts.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_settings(&content)?;
    Ok((config, settings_digest(&content)))
}

fn parse_settings(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn settings_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
