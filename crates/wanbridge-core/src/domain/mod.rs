//! Request-scoped domain types.
//!
//! Everything here is created at the start of one inbound request and
//! discarded when its handling returns; nothing is shared across requests.

mod chat;
mod generation;
mod task;

pub use chat::ChatMessage;
pub use generation::{DEFAULT_SIZE, GenerationRequest, Mode};
pub use task::{TaskHandle, TaskObservation};
