//! Error type for external service calls.

use thiserror::Error;

/// Errors from the generation, retrieval, search, and record-store clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Record store error: {0}")]
    Store(String),
}
