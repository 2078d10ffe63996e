//! # Message Dispatcher
//!
//! Routes every inbound message either to a tracking command handler (in `interface/commands`)
//! or to free-form chat with the language model, and keeps the user's history up to date.
//!
//! A recognized command whose arguments do not validate is *not* answered with an error:
//! the original text goes to the model instead, exactly like any other chat message.

use std::sync::Arc;
use std::time::Duration;

use crate::application::parsing::parse_command;
use crate::domain::error::DispatchError;
use crate::domain::traits::{ConversationStore, LlmProvider};
use crate::domain::types::{ConversationEntry, Role};
use crate::interface::commands;
use crate::strings::{logs, messages};

const PLAN_MARKERS: [&str; 2] = ["workout plan", "nutrition plan"];

pub struct MessageDispatcher {
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
    history_window: usize,
    model_timeout: Duration,
}

impl MessageDispatcher {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        llm: Arc<dyn LlmProvider>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            store,
            llm,
            system_prompt: system_prompt.into(),
            history_window: 10,
            model_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_history_window(mut self, entries: usize) -> Self {
        self.history_window = entries;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Handle one inbound message and return the reply to send back.
    pub async fn handle(&self, user_id: &str, text: &str) -> Result<String, DispatchError> {
        if text.trim().is_empty() {
            return Err(DispatchError::InvalidInput);
        }

        if let Some(cmd) = parse_command(text) {
            tracing::info!("{}", logs::dispatching(user_id, &cmd.name, &cmd.args));

            if let Some(handler) = commands::lookup(&cmd.name) {
                match handler(&cmd.args) {
                    Ok(recorded) => {
                        if let Some(log) = recorded.log {
                            self.store
                                .append(user_id, ConversationEntry::system(log))
                                .await;
                        }
                        tracing::info!("{}", logs::command_recorded(user_id, &cmd.name));
                        return Ok(recorded.reply);
                    }
                    Err(e) => {
                        tracing::debug!("{}", logs::command_fallthrough(user_id, &e.to_string()));
                    }
                }
            }
        }

        Ok(self.chat(user_id, text).await)
    }

    /// Free-form exchange with the model. Always yields a reply for the user.
    pub async fn chat(&self, user_id: &str, text: &str) -> String {
        self.store
            .append(user_id, ConversationEntry::user(text))
            .await;

        let window = self.prompt_window(user_id).await;

        // No store lock is held across the model call
        let reply = match tokio::time::timeout(self.model_timeout, self.llm.completion(&window))
            .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return self.apologize(user_id, DispatchError::ModelUnavailable(e)),
            Err(_) => {
                let reason = logs::model_timeout(self.model_timeout.as_secs());
                return self.apologize(user_id, DispatchError::ModelUnavailable(reason));
            }
        };

        let mut entries = vec![ConversationEntry::assistant(reply.clone())];
        if mentions_plan(&reply) {
            // Written for later reference; nothing reads it back yet
            entries.push(ConversationEntry::system(messages::last_plan_log(&reply)));
            tracing::debug!("{}", logs::plan_stored(user_id));
        }
        self.store.extend(user_id, entries).await;

        reply
    }

    /// System prompt followed by the most recent history entries.
    pub async fn prompt_window(&self, user_id: &str) -> Vec<ConversationEntry> {
        let recent = self.store.recent(user_id, self.history_window).await;
        let mut window = Vec::with_capacity(recent.len() + 1);
        window.push(ConversationEntry::new(Role::System, self.system_prompt.as_str()));
        window.extend(recent);
        window
    }

    fn apologize(&self, user_id: &str, err: DispatchError) -> String {
        tracing::warn!("{}", logs::model_failed(user_id, &err.to_string()));
        messages::MODEL_APOLOGY.to_string()
    }
}

fn mentions_plan(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    PLAN_MARKERS.iter().any(|marker| lower.contains(marker))
}
