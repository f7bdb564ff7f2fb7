//! Core domain types and port definitions for wanbridge.
//!
//! This crate owns the request-scoped domain model (chat messages, the
//! structured generation request, task observations, stream events), the
//! caller-message extractor, the immutable proxy configuration, and the
//! backend port trait. It is adapter-free: no HTTP, no runtime specifics.

#![deny(unsafe_code)]

pub mod config;
pub mod domain;
pub mod events;
pub mod extract;
pub mod ports;

pub use config::ProxyConfig;
pub use extract::{detect_mode, extract};
