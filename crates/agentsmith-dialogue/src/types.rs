//! Core transcript types

use serde::{Deserialize, Serialize};

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. The transcript is append-only and ordered
/// by arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether this message was authored by the user
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
