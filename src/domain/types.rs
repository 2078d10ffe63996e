//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Utc};

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single timestamped line of a user's history.
/// Serves both as chat context and as the tracked-metrics log.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A `!name arg1 arg2` message split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercased, prefix stripped.
    pub name: String,
    pub args: Vec<String>,
}

/// What a tracking command produced on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// Appended to the user's history as a `System` entry when present.
    pub log: Option<String>,
    pub reply: String,
}

impl Recorded {
    pub fn new(log: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            log: Some(log.into()),
            reply: reply.into(),
        }
    }

    pub fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            log: None,
            reply: reply.into(),
        }
    }
}
