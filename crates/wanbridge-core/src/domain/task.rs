//! Backend task handle and status observations.

use std::fmt;

/// Opaque backend-assigned task identifier.
///
/// Carried verbatim from the creation response; never normalized or
/// validated. Valid only for the backend's lifetime of that task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle(String);

impl TaskHandle {
    /// Wrap a backend-assigned task id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw task id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observation of a task's state, produced fresh by each poll.
///
/// Only the most recent observation drives the next polling decision;
/// none are retained beyond the iteration that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskObservation {
    /// The task has not reached a terminal state.
    Running,
    /// The task finished; result URLs in backend-provided order.
    /// An empty list means the backend itself returned none.
    Succeeded {
        /// Result URLs, order preserved.
        results: Vec<String>,
    },
    /// The backend reported terminal failure.
    Failed,
}
