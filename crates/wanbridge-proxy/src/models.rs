//! Inbound API data models and push-event payload rendering.
//!
//! Types here match the chat-completion-shaped wire surface. Domain types
//! live in `wanbridge-core`; this module handles the API-layer mapping.

use serde::{Deserialize, Serialize};
use wanbridge_core::domain::ChatMessage;
use wanbridge_core::events::StreamEvent;

/// Fixed progress payload; keeps the stream alive while the task runs.
const PROGRESS_MESSAGE: &str = "绘图中...";
/// Error payload when the polling ceiling is exceeded.
const TIMEOUT_MESSAGE: &str = "Timeout";

// ============================================================================
// Request types
// ============================================================================

/// Request to the /v1/chat/completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier; must be on the configured allow-list.
    pub model: String,
    /// Ordered chat messages as supplied by the caller.
    pub messages: Vec<ChatMessage>,
}

// ============================================================================
// Error response types
// ============================================================================

/// JSON error body for synchronous failures and error stream events:
/// `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short machine-oriented error text.
    pub error: String,
}

impl ErrorResponse {
    /// Create an error response with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Error body for a bad or missing caller credential.
    #[must_use]
    pub fn invalid_api_key() -> Self {
        Self::new("Invalid API key")
    }

    /// Error body for an unparsable request payload.
    #[must_use]
    pub fn invalid_body() -> Self {
        Self::new("Invalid request body")
    }

    /// Error body for a model outside the allow-list.
    #[must_use]
    pub fn unsupported_model() -> Self {
        Self::new("Unsupported model")
    }
}

// ============================================================================
// Stream event payloads
// ============================================================================

/// Progress frame body.
#[derive(Debug, Clone, Serialize)]
struct StatusPayload<'a> {
    status: &'a str,
}

/// Success frame body, chat-completion shaped.
#[derive(Debug, Clone, Serialize)]
struct CompletionPayload {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Serialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Clone, Serialize)]
struct CompletionMessage {
    content: String,
}

/// Render result URLs as markdown image references, 1-indexed in render
/// order and comma-joined: `[p1](urlA),[p2](urlB)`.
#[must_use]
pub fn render_image_links(urls: &[String]) -> String {
    urls.iter()
        .enumerate()
        .map(|(i, url)| format!("[p{}]({url})", i + 1))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize one stream event into its wire JSON.
#[must_use]
pub fn event_payload(event: &StreamEvent) -> String {
    let json = match event {
        StreamEvent::Progress => serde_json::to_string(&StatusPayload {
            status: PROGRESS_MESSAGE,
        }),
        StreamEvent::Success { urls } => serde_json::to_string(&CompletionPayload {
            choices: vec![CompletionChoice {
                message: CompletionMessage {
                    content: render_image_links(urls),
                },
            }],
        }),
        StreamEvent::Failure { message } => {
            serde_json::to_string(&ErrorResponse::new(message.clone()))
        }
        StreamEvent::TimedOut => serde_json::to_string(&ErrorResponse::new(TIMEOUT_MESSAGE)),
    };
    json.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn image_links_are_one_indexed_in_render_order() {
        assert_eq!(
            render_image_links(&urls(&["urlA", "urlB"])),
            "[p1](urlA),[p2](urlB)"
        );
        assert_eq!(render_image_links(&[]), "");
    }

    #[test]
    fn progress_payload_is_fixed() {
        assert_eq!(
            event_payload(&StreamEvent::Progress),
            r#"{"status":"绘图中..."}"#
        );
    }

    #[test]
    fn success_payload_is_chat_completion_shaped() {
        let payload = event_payload(&StreamEvent::Success {
            urls: urls(&["urlA", "urlB"]),
        });
        assert_eq!(
            payload,
            r#"{"choices":[{"message":{"content":"[p1](urlA),[p2](urlB)"}}]}"#
        );
    }

    #[test]
    fn failure_and_timeout_payloads_carry_error_text() {
        let payload = event_payload(&StreamEvent::Failure {
            message: "Task failed".to_string(),
        });
        assert_eq!(payload, r#"{"error":"Task failed"}"#);

        assert_eq!(
            event_payload(&StreamEvent::TimedOut),
            r#"{"error":"Timeout"}"#
        );
    }
}
