//! Wire types for the DashScope task API.
//!
//! Shapes follow the task-creation and status-by-id endpoints. Empty or
//! zero optional fields are omitted from the creation payload so the
//! backend applies its own defaults.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wanbridge_core::domain::{GenerationRequest, TaskObservation};

// ============================================================================
// Task creation
// ============================================================================

/// Task-creation request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateTaskRequest {
    pub model: String,
    pub input: TaskInput,
    pub parameters: TaskParameters,
}

/// Prompt inputs of a creation request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub negative_prompt: String,
}

/// Generation parameters of a creation request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskParameters {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub size: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub n: u32,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl CreateTaskRequest {
    /// Build the creation payload from a structured generation request.
    pub fn from_request(model: &str, request: &GenerationRequest) -> Self {
        Self {
            model: model.to_string(),
            input: TaskInput {
                prompt: request.prompt.clone(),
                negative_prompt: request.negative_prompt.clone(),
            },
            parameters: TaskParameters {
                size: request.size.clone(),
                n: request.n,
            },
        }
    }
}

/// Task-creation response envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateTaskResponse {
    pub output: Option<CreateTaskOutput>,
}

/// Output section of a creation response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateTaskOutput {
    pub task_id: Option<String>,
}

impl CreateTaskResponse {
    /// The backend-assigned task id, if the response carried one.
    pub fn task_id(self) -> Option<String> {
        self.output
            .and_then(|output| output.task_id)
            .filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Task status
// ============================================================================

/// Terminal status markers defined by the task API.
const STATUS_SUCCEEDED: &str = "SUCCEEDED";
const STATUS_FAILED: &str = "FAILED";
/// Non-terminal markers the API documents.
const STATUS_PENDING: &str = "PENDING";
const STATUS_RUNNING: &str = "RUNNING";

/// Task-status response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TaskStatusResponse {
    #[serde(default)]
    pub output: TaskStatusOutput,
}

/// Output section of a status response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TaskStatusOutput {
    #[serde(default)]
    pub task_status: String,
    #[serde(default)]
    pub results: Vec<TaskResult>,
}

/// One generated image reference.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskResult {
    #[serde(default)]
    pub url: String,
}

impl TaskStatusResponse {
    /// Map the backend's status marker onto a task observation.
    ///
    /// Only `SUCCEEDED` and `FAILED` are terminal. Markers outside the
    /// recognized set map to `Running` and are logged, so a changed backend
    /// contract surfaces in logs instead of silently spinning.
    pub fn into_observation(self) -> TaskObservation {
        match self.output.task_status.as_str() {
            STATUS_SUCCEEDED => TaskObservation::Succeeded {
                results: self
                    .output
                    .results
                    .into_iter()
                    .map(|result| result.url)
                    .collect(),
            },
            STATUS_FAILED => TaskObservation::Failed,
            STATUS_PENDING | STATUS_RUNNING => TaskObservation::Running,
            other => {
                debug!(status = %other, "Unrecognized task status, treating as running");
                TaskObservation::Running
            }
        }
    }
}
