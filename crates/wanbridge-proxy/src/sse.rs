//! SSE framing and streaming response construction.
//!
//! Frames are written through a streamed body so each event is delivered
//! as its own chunk with no buffering delay.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::Stream;
use wanbridge_core::events::StreamEvent;

use crate::models::event_payload;

/// Frame one event for the wire: `data: <json>\n\n`.
#[must_use]
pub fn sse_frame(event: &StreamEvent) -> String {
    format!("data: {}\n\n", event_payload(event))
}

/// Build the streamed half of a request: SSE headers plus a body that
/// delivers one frame per event.
pub fn sse_response<S>(frames: S) -> Response
where
    S: Stream<Item = Result<Bytes, Infallible>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("connection", "keep-alive")
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
