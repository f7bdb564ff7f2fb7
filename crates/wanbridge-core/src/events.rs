//! Push events emitted over a request's stream.

/// One event on a request's outbound stream.
///
/// A stream carries zero or more `Progress` events followed by exactly one
/// terminal event; nothing is emitted after a terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Keep-alive marker while the task runs; carries no backend data.
    Progress,
    /// Terminal: the task finished with the given result URLs.
    Success {
        /// Result URLs in backend-provided order.
        urls: Vec<String>,
    },
    /// Terminal: the task or a poll against it failed.
    Failure {
        /// Short machine-oriented error text.
        message: String,
    },
    /// Terminal: the polling ceiling was exceeded.
    TimedOut,
}

impl StreamEvent {
    /// Whether this event ends the stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress)
    }
}
