//! Public configuration for the DashScope client.

use std::time::Duration;

/// Production DashScope API endpoint.
const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// Configuration for the DashScope client.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use wanbridge_dashscope::DashScopeConfig;
///
/// let config = DashScopeConfig::new("sk-...")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct DashScopeConfig {
    /// Base URL for the DashScope API.
    pub(crate) base_url: String,
    /// Bearer credential for outbound calls.
    pub(crate) api_key: String,
    /// Per-request transport timeout.
    pub(crate) timeout: Duration,
}

impl DashScopeConfig {
    /// Create a configuration for the given backend credential.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the API base URL (tests, regional endpoints).
    ///
    /// Defaults to `https://dashscope.aliyuncs.com`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request transport timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
