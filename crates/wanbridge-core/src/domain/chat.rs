//! Chat message types shared with the inbound API surface.

use serde::{Deserialize, Serialize};

/// A single chat message as received on the wire.
///
/// The role is kept as a plain string for OpenAI wire compatibility;
/// callers may send any role, and only "system" and "user" carry meaning
/// for this proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Free-text message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role and content.
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Whether this is a system-role message.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == "system"
    }

    /// Whether this is a user-role message.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}
