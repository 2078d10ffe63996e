//! # Domain Traits
//!
//! Abstract interfaces for the conversation store and the two outbound
//! collaborators (messaging platform, language model).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::types::ConversationEntry;

/// Abstract interface for a Chat Provider (e.g., WhatsApp, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Deliver a text message to a recipient
    async fn send_message(&self, recipient: &str, content: &str) -> Result<(), String>;

    /// Verify that the configured credentials are accepted by the platform
    async fn health_check(&self) -> Result<(), String>;

    /// Short name used in logs and the doctor report
    fn name(&self) -> &str;
}

/// Abstract interface for an LLM Provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply for an ordered prompt window (system entry first)
    async fn completion(&self, window: &[ConversationEntry]) -> Result<String, String>;
}

/// Per-user, append-only conversation history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Full history for a user. Unknown users yield an empty list.
    async fn get(&self, user_id: &str) -> Vec<ConversationEntry>;

    /// Append one entry, creating the user's history on first use.
    async fn append(&self, user_id: &str, entry: ConversationEntry);

    /// Append several entries in order with no other append for the same user in between.
    async fn extend(&self, user_id: &str, entries: Vec<ConversationEntry>);

    /// The last `n` entries in chronological order.
    async fn recent(&self, user_id: &str, n: usize) -> Vec<ConversationEntry> {
        let history = self.get(user_id).await;
        let start = history.len().saturating_sub(n);
        history[start..].to_vec()
    }
}
