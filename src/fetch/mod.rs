//! Retrieval of the source page
//!
//! This module contains the transport used to download the registry page:
//! - Building the HTTP client from an explicit [`SourceConfig`](crate::config::SourceConfig)
//! - Bounded retry with exponential backoff on transient server errors
//! - Classification of failures into proxy, TLS, connection and status errors

mod retry;
mod transport;

pub use retry::{RetryPolicy, RETRYABLE_STATUSES};
pub use transport::{build_http_client, HttpTransport};

use std::future::Future;
use thiserror::Error;

/// Why the source page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Proxy unreachable: {0}")]
    ProxyUnreachable(String),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("Connection failure: {message}")]
    Connection { message: String, timed_out: bool },

    #[error("HTTP status {status} after {attempts} attempt(s)")]
    Status { status: u16, attempts: u32 },
}

/// Something that can download a page as text
///
/// The sync pipeline is generic over this so tests can substitute a canned
/// response for the network.
pub trait Transport {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}
