//! Backend port for asynchronous image-generation tasks.
//!
//! The proxy drives one backend through this port: a single submission per
//! request, then repeated status polls. Both operations are single network
//! calls with no retry; every failure is terminal for its request.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{GenerationRequest, TaskHandle, TaskObservation};

/// Errors crossing the backend port boundary.
#[derive(Debug, Error)]
pub enum TaskPortError {
    /// The backend could not be reached at the transport level.
    #[error("Backend unreachable: {message}")]
    Unreachable {
        /// Transport-level failure description.
        message: String,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("Backend request failed with status {status}")]
    RequestFailed {
        /// HTTP status code returned by the backend.
        status: u16,
    },

    /// The backend answered with a payload this proxy cannot use.
    #[error("Invalid backend response: {message}")]
    InvalidResponse {
        /// Description of what was missing or malformed.
        message: String,
    },
}

/// Port for submitting and observing image-generation tasks.
///
/// Implementations must be safe for concurrent use by many request tasks;
/// no call's response is ever visible to another request.
#[async_trait]
pub trait ImageTaskPort: Send + Sync {
    /// Submit one generation task.
    ///
    /// Returns the backend-assigned task handle verbatim. Called exactly
    /// once per request; a failure aborts the request.
    async fn submit(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, TaskPortError>;

    /// Fetch the current state of a previously submitted task.
    async fn poll(&self, handle: &TaskHandle) -> Result<TaskObservation, TaskPortError>;
}
