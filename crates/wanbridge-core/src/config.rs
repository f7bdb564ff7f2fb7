//! Immutable proxy configuration.
//!
//! The allow-list, caller credential, and polling bounds are injected into
//! the server at construction rather than read from process-wide state.

use std::time::Duration;

/// Model identifiers the proxy accepts by default.
pub const ALLOWED_MODELS: [&str; 3] = [
    "wanx2.0-t2i-turbo",
    "wanx2.1-t2i-plus",
    "wanx2.1-t2i-turbo",
];

/// Configuration for the proxy server.
///
/// Use the builder-style methods to customize timing or the allow-list.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Bearer credential callers must present, compared exactly.
    pub api_key: String,
    /// Model identifiers accepted on the inbound endpoint.
    pub allowed_models: Vec<String>,
    /// Fixed delay between status polls.
    pub poll_interval: Duration,
    /// Wall-clock ceiling on one request's polling phase.
    pub poll_ceiling: Duration,
}

impl ProxyConfig {
    /// Create a configuration for the given caller credential with the
    /// default allow-list, a 5 second poll interval, and a 5 minute ceiling.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            allowed_models: ALLOWED_MODELS.iter().map(ToString::to_string).collect(),
            poll_interval: Duration::from_secs(5),
            poll_ceiling: Duration::from_secs(300),
        }
    }

    /// Override the accepted model identifiers.
    #[must_use]
    pub fn with_allowed_models(mut self, models: Vec<String>) -> Self {
        self.allowed_models = models;
        self
    }

    /// Set the delay between status polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the wall-clock ceiling on the polling phase.
    #[must_use]
    pub const fn with_poll_ceiling(mut self, ceiling: Duration) -> Self {
        self.poll_ceiling = ceiling;
        self
    }

    /// Whether the proxy accepts the given model identifier.
    #[must_use]
    pub fn is_model_allowed(&self, model: &str) -> bool {
        self.allowed_models.iter().any(|m| m == model)
    }
}
