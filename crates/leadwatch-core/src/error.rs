//! LeadWatch error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LeadWatchError>;

#[derive(Debug, Error)]
pub enum LeadWatchError {
    /// A required credential or identifier is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (DNS, connect, TLS, broken body).
    #[error("Network error: {0}")]
    Network(String),

    #[error("{service} request timed out after {secs}s")]
    Timeout { service: String, secs: u64 },

    /// The remote service answered with a non-success status.
    #[error("{service} API error {status}: {description}")]
    Upstream {
        service: String,
        status: u16,
        description: String,
    },

    /// A single record could not be parsed. Recovered locally by the extractor.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LeadWatchError {
    /// Whether re-running the whole pipeline later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
