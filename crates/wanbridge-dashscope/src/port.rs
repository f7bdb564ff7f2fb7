//! [`ImageTaskPort`] implementation for the DashScope client.
//!
//! Internal DashScope errors are converted to the core port error here, at
//! the boundary, so the proxy never sees transport-specific types.

use async_trait::async_trait;
use wanbridge_core::domain::{GenerationRequest, TaskHandle, TaskObservation};
use wanbridge_core::ports::{ImageTaskPort, TaskPortError};

use crate::client::DashScopeClient;
use crate::error::DashScopeError;
use crate::http::HttpTransport;

/// Convert an internal client error into the core port error.
fn map_error(err: DashScopeError) -> TaskPortError {
    match err {
        DashScopeError::RequestFailed { status, .. } => TaskPortError::RequestFailed { status },
        DashScopeError::InvalidResponse { message } => TaskPortError::InvalidResponse { message },
        DashScopeError::Network(e) => TaskPortError::Unreachable {
            message: e.to_string(),
        },
        DashScopeError::JsonParse(e) => TaskPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl<T: HttpTransport> ImageTaskPort for DashScopeClient<T> {
    async fn submit(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, TaskPortError> {
        self.create_task(model, request).await.map_err(map_error)
    }

    async fn poll(&self, handle: &TaskHandle) -> Result<TaskObservation, TaskPortError> {
        self.task_status(handle).await.map_err(map_error)
    }
}
