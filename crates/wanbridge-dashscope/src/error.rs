//! Internal error types for DashScope operations.
//!
//! These errors are internal to `wanbridge-dashscope` and are mapped to the
//! core port error at the boundary.

use thiserror::Error;

/// Result type alias for DashScope operations.
pub(crate) type DashScopeResult<T> = Result<T, DashScopeError>;

/// Errors related to DashScope task API operations.
#[derive(Debug, Error)]
pub enum DashScopeError {
    /// The request reached the backend but came back with an error status.
    #[error("DashScope request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The response parsed, but required fields were missing.
    #[error("Invalid response from DashScope: {message}")]
    InvalidResponse {
        /// Description of what was invalid.
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
