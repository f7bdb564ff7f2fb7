//! OpenAI-compatible SSE proxy server for wanbridge.
//!
//! Accepts chat-completion-shaped requests, translates them into
//! asynchronous image-generation tasks through the core port, polls the
//! task to completion, and streams progress and the final result back to
//! the caller as server-sent events.

#![deny(unsafe_code)]

pub mod models;
pub mod server;
pub mod sse;
pub mod stream;

pub use server::{AppState, router, serve};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
