//! HTTP transport abstraction for the DashScope API.
//!
//! Trait-based transport so the client can be exercised in tests without a
//! network. The production implementation is a thin reqwest wrapper with a
//! request timeout and bearer auth. There is deliberately no retry here:
//! a failed call is terminal for its request.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::DashScopeConfig;
use crate::error::{DashScopeError, DashScopeResult};

/// Header requesting asynchronous task execution.
///
/// The only POST surface of this API is task creation, which this proxy
/// always requests asynchronously, so the transport sets it on every POST.
const ASYNC_HEADER: &str = "X-DashScope-Async";

/// Transport over which the DashScope API is reached.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and deserialize the JSON response.
    async fn post_json<B, T>(&self, url: &str, body: &B) -> DashScopeResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned;

    /// GET a URL and deserialize the JSON response.
    async fn get_json<T>(&self, url: &str) -> DashScopeResult<T>
    where
        T: DeserializeOwned;
}

/// Production transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    api_key: String,
}

impl ReqwestTransport {
    /// Create a new reqwest transport with the given configuration.
    pub fn new(config: &DashScopeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Check the status and decode the body of one response.
    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> DashScopeResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(DashScopeError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json<B, T>(&self, url: &str, body: &B) -> DashScopeResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .header(ASYNC_HEADER, "enable")
            .json(body)
            .send()
            .await?;

        Self::decode(url, response).await
    }

    async fn get_json<T>(&self, url: &str) -> DashScopeResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        Self::decode(url, response).await
    }
}
