//! Axum HTTP server for the chat-to-image proxy.
//!
//! `serve()` runs the server on a pre-bound listener until the cancellation
//! token fires. The chat-completions handler is the request orchestrator:
//! validate → extract → submit → poll → stream. Validation and submission
//! failures are synchronous JSON error responses; once the stream is open,
//! failures travel as terminal stream events instead.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use wanbridge_core::ProxyConfig;
use wanbridge_core::ports::{ImageTaskPort, TaskPortError};
use wanbridge_core::{detect_mode, extract};

use crate::models::{ChatCompletionRequest, ErrorResponse};
use crate::sse::{sse_frame, sse_response};
use crate::stream::{PollTiming, run_poll_loop};

/// Channel capacity between the poll loop and the SSE body.
const EVENT_BUFFER: usize = 8;

/// Shared application state for the proxy server.
#[derive(Clone)]
pub struct AppState {
    /// Backend used to create and observe generation tasks.
    backend: Arc<dyn ImageTaskPort>,
    /// Immutable proxy configuration.
    config: Arc<ProxyConfig>,
}

impl AppState {
    /// Create the server state from a backend and configuration.
    #[must_use]
    pub fn new(backend: Arc<dyn ImageTaskPort>, config: ProxyConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

/// Build the proxy router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state)
}

/// Run the proxy server until the cancellation token fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Proxy listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Proxy server shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Handle one chat-completion request end to end.
async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    debug!("POST /v1/chat/completions");

    if !credential_matches(&headers, &state.config.api_key) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::invalid_api_key()),
        )
            .into_response();
    }

    let request: ChatCompletionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to parse request: {e}");
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::invalid_body())).into_response();
        }
    };

    if !state.config.is_model_allowed(&request.model) {
        info!(model = %request.model, "Unsupported model");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::unsupported_model()),
        )
            .into_response();
    }

    let mode = detect_mode(&request.messages);
    let generation = extract(&request.messages);
    info!(model = %request.model, ?mode, n = generation.n, "Extracted generation request");

    let handle = match state.backend.submit(&request.model, &generation).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Task submission failed: {e}");
            return submission_error_response(&e);
        }
    };
    info!(task_id = %handle, model = %request.model, "Generation task submitted");

    let timing = PollTiming {
        interval: state.config.poll_interval,
        ceiling: state.config.poll_ceiling,
    };
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(run_poll_loop(state.backend.clone(), handle, timing, tx));

    let frames = ReceiverStream::new(rx)
        .map(|event| Ok::<_, Infallible>(Bytes::from(sse_frame(&event))));
    sse_response(frames)
}

/// Exact-match check of the caller's bearer credential.
fn credential_matches(headers: &HeaderMap, api_key: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {api_key}"))
}

/// Map a pre-stream submission failure to a synchronous error response.
fn submission_error_response(err: &TaskPortError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse::new(err.to_string())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn credential_check_requires_exact_match() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        assert!(credential_matches(&headers, "secret"));
        assert!(!credential_matches(&headers, "other"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "bearer secret".parse().unwrap());
        assert!(!credential_matches(&headers, "secret"));

        assert!(!credential_matches(&HeaderMap::new(), "secret"));
    }
}
