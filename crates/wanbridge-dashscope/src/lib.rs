//! DashScope task-API client for wanbridge.
//!
//! Implements the core [`ImageTaskPort`](wanbridge_core::ports::ImageTaskPort)
//! against DashScope's asynchronous text-to-image service: one POST creates
//! a task, repeated GETs observe it until a terminal status. Every call is
//! single-shot; there is deliberately no retry at this layer.

#![deny(unsafe_code)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;

pub use client::{DashScopeClient, DefaultDashScopeClient};
pub use config::DashScopeConfig;
pub use error::DashScopeError;
