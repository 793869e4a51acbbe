//! Error types for HTML validation.

use std::path::PathBuf;

/// Everything that can abort a validation run.
///
/// The first failure at any stage is returned unchanged; nothing is retried
/// and no fallback result is produced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidatorError {
    /// The request never produced a response (DNS, TCP, TLS, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A local file classified as input could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The checker response was not a JSON object.
    #[error("invalid JSON response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured checker endpoint is unusable.
    #[error("invalid validator endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// A configured header value is not a legal HTTP header value.
    #[error("invalid {name} header '{value}': {reason}")]
    InvalidHeader {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The HTTP client could not be constructed from the configuration.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ValidatorError {
    /// Whether this is a transport or HTTP status failure.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
