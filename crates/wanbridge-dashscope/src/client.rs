//! DashScope task client: submit and observe text-to-image tasks.

use tracing::debug;
use wanbridge_core::domain::{GenerationRequest, TaskHandle, TaskObservation};

use crate::config::DashScopeConfig;
use crate::error::{DashScopeError, DashScopeResult};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::models::{CreateTaskRequest, CreateTaskResponse, TaskStatusResponse};

/// Path of the text-to-image task-creation endpoint.
const CREATE_TASK_PATH: &str = "/api/v1/services/aigc/text2image/image-synthesis";
/// Path prefix of the task-status endpoint.
const TASK_STATUS_PATH: &str = "/api/v1/tasks";

/// Default DashScope client using the reqwest transport.
pub type DefaultDashScopeClient = DashScopeClient<ReqwestTransport>;

/// Client for DashScope's asynchronous text-to-image task API.
///
/// Generic over the HTTP transport for testability; production code uses
/// [`DefaultDashScopeClient`]. Safe for concurrent use by many request
/// tasks with no additional coordination.
pub struct DashScopeClient<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl DefaultDashScopeClient {
    /// Create a client with the given configuration.
    #[must_use]
    pub fn new(config: &DashScopeConfig) -> Self {
        Self {
            transport: ReqwestTransport::new(config),
            base_url: config.base_url.clone(),
        }
    }
}

impl<T: HttpTransport> DashScopeClient<T> {
    /// Create a client with a custom transport.
    ///
    /// Use this for testing with a fake transport.
    #[cfg(test)]
    pub(crate) fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Submit one generation task.
    ///
    /// Returns the backend-assigned task id verbatim; fails when the
    /// creation response carries no id.
    pub(crate) async fn create_task(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> DashScopeResult<TaskHandle> {
        let url = format!("{}{CREATE_TASK_PATH}", self.base_url);
        let payload = CreateTaskRequest::from_request(model, request);

        let response: CreateTaskResponse = self.transport.post_json(&url, &payload).await?;
        let task_id = response
            .task_id()
            .ok_or_else(|| DashScopeError::InvalidResponse {
                message: "task creation response carried no task id".to_string(),
            })?;

        debug!(task_id = %task_id, model = %model, "Task created");
        Ok(TaskHandle::new(task_id))
    }

    /// Fetch the current status of a task.
    pub(crate) async fn task_status(
        &self,
        handle: &TaskHandle,
    ) -> DashScopeResult<TaskObservation> {
        let url = format!("{}{TASK_STATUS_PATH}/{}", self.base_url, handle.as_str());

        let response: TaskStatusResponse = self.transport.get_json(&url).await?;
        Ok(response.into_observation())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};

    use super::*;

    /// Transport that replays canned JSON responses and records requests.
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<Value>>,
        posts: Mutex<Vec<(String, Value)>>,
        gets: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn with_responses(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn next_response(&self) -> Value {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no canned response left")
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn post_json<B, T>(&self, url: &str, body: &B) -> DashScopeResult<T>
        where
            B: Serialize + Sync,
            T: DeserializeOwned,
        {
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), serde_json::to_value(body)?));
            Ok(serde_json::from_value(self.next_response())?)
        }

        async fn get_json<T>(&self, url: &str) -> DashScopeResult<T>
        where
            T: DeserializeOwned,
        {
            self.gets.lock().unwrap().push(url.to_string());
            Ok(serde_json::from_value(self.next_response())?)
        }
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            negative_prompt: String::new(),
            size: "1024*1024".to_string(),
            n: 1,
        }
    }

    #[tokio::test]
    async fn create_task_posts_payload_and_returns_handle() {
        let transport =
            FakeTransport::with_responses(vec![json!({"output": {"task_id": "t-99"}})]);
        let client = DashScopeClient::with_transport("https://backend.test", transport);

        let handle = client
            .create_task("wanx2.0-t2i-turbo", &request("a cat"))
            .await
            .unwrap();
        assert_eq!(handle.as_str(), "t-99");

        let posts = client.transport.posts.lock().unwrap();
        let (url, body) = &posts[0];
        assert_eq!(
            url,
            "https://backend.test/api/v1/services/aigc/text2image/image-synthesis"
        );
        assert_eq!(body["model"], "wanx2.0-t2i-turbo");
        assert_eq!(body["input"]["prompt"], "a cat");
        assert_eq!(body["parameters"]["size"], "1024*1024");
        assert_eq!(body["parameters"]["n"], 1);
    }

    #[tokio::test]
    async fn create_task_without_task_id_is_invalid_response() {
        let transport = FakeTransport::with_responses(vec![json!({"output": {}})]);
        let client = DashScopeClient::with_transport("https://backend.test", transport);

        let err = client
            .create_task("wanx2.0-t2i-turbo", &request("a cat"))
            .await
            .unwrap_err();
        assert!(matches!(err, DashScopeError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn task_status_queries_by_id_and_maps_status() {
        let transport = FakeTransport::with_responses(vec![json!({
            "output": {
                "task_status": "SUCCEEDED",
                "results": [{"url": "urlA"}, {"url": "urlB"}],
            }
        })]);
        let client = DashScopeClient::with_transport("https://backend.test", transport);

        let observation = client.task_status(&TaskHandle::new("t-99")).await.unwrap();
        assert_eq!(
            observation,
            TaskObservation::Succeeded {
                results: vec!["urlA".to_string(), "urlB".to_string()],
            }
        );

        let gets = client.transport.gets.lock().unwrap();
        assert_eq!(gets[0], "https://backend.test/api/v1/tasks/t-99");
    }
}
