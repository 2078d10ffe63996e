//! # Conversation Store
//!
//! Process-wide, in-memory history keyed by user id (`InMemoryStore`).
//! Each user's sequence sits behind its own mutex so appends for one user are
//! serialized while different users never contend beyond the map lookup.
//! Nothing is ever evicted: memory grows with every message received.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::traits::ConversationStore;
use crate::domain::types::ConversationEntry;

type History = Arc<Mutex<Vec<ConversationEntry>>>;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, History>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one entry.
    #[cfg(test)]
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    async fn existing(&self, user_id: &str) -> Option<History> {
        self.users.read().await.get(user_id).cloned()
    }

    /// Gets or creates the history for a user.
    async fn history(&self, user_id: &str) -> History {
        if let Some(history) = self.existing(user_id).await {
            return history;
        }
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn get(&self, user_id: &str) -> Vec<ConversationEntry> {
        match self.existing(user_id).await {
            Some(history) => history.lock().await.clone(),
            None => Vec::new(),
        }
    }

    async fn append(&self, user_id: &str, entry: ConversationEntry) {
        let history = self.history(user_id).await;
        history.lock().await.push(entry);
    }

    async fn extend(&self, user_id: &str, entries: Vec<ConversationEntry>) {
        if entries.is_empty() {
            return;
        }
        let history = self.history(user_id).await;
        history.lock().await.extend(entries);
    }

    async fn recent(&self, user_id: &str, n: usize) -> Vec<ConversationEntry> {
        let Some(history) = self.existing(user_id).await else {
            return Vec::new();
        };
        let guard = history.lock().await;
        let start = guard.len().saturating_sub(n);
        guard[start..].to_vec()
    }
}
