//! # LLM Client
//!
//! Provides the `Client` struct, the model collaborator used by the dispatcher.
//! It resolves the configured provider once and routes every request to it.

use async_trait::async_trait;

use crate::domain::config::AgentConfig;
use crate::domain::traits::LlmProvider;
use crate::domain::types::ConversationEntry;
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Context, Error, Provider, Response};
use crate::strings::logs;

/// Simple LLM client
pub struct Client {
    agent: AgentConfig,
    provider: Provider,
    provider_config: ProviderConfig,
}

impl Client {
    /// Create a new client from the agent configuration
    pub fn new(agent: AgentConfig) -> Result<Self, Error> {
        // Get provider type from agent config (e.g., "openai", "gemini")
        let provider = Provider::from_str(&agent.provider)
            .ok_or_else(|| Error::new(&agent.provider, "Unknown provider"))?;

        // Reads api_key, endpoint, default model
        let provider_config = ProviderConfig::from_agent_config(&agent)?;

        Ok(Self {
            agent,
            provider,
            provider_config,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Send a context, applying the agent's sampling settings
    pub async fn chat(&self, context: Context) -> Result<Response, Error> {
        let mut context = context
            .with_temperature(self.agent.temperature)
            .with_max_tokens(self.agent.max_tokens);
        if context.model.is_none() && !self.agent.model.is_empty() {
            context = context.with_model(self.agent.model.clone());
        }
        providers::chat(self.provider, self.provider_config.clone(), context).await
    }

    /// Send a single user prompt
    pub async fn prompt(&self, prompt: &str) -> Result<Response, Error> {
        self.chat(Context::prompt(prompt)).await
    }
}

#[async_trait]
impl LlmProvider for Client {
    async fn completion(&self, window: &[ConversationEntry]) -> Result<String, String> {
        let response = self
            .chat(Context::from_window(window))
            .await
            .map_err(|e| e.to_string())?;
        let usage = &response.usage;
        tracing::debug!(
            "{}",
            logs::token_usage(
                &response.model,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            )
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("openai"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("Gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("google"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("groq"), Some(Provider::Groq));
        assert_eq!(Provider::from_str("unknown"), None);
    }

    #[test]
    fn test_provider_as_str() {
        assert_eq!(Provider::OpenAI.as_str(), "openai");
        assert_eq!(Provider::Gemini.as_str(), "gemini");
        assert_eq!(Provider::Groq.as_str(), "groq");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let agent = AgentConfig {
            provider: "carrier-pigeon".to_string(),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let err = Client::new(agent).err().unwrap();
        assert_eq!(err.message, "Unknown provider");
    }

    #[test]
    fn test_client_builds_from_inline_key() {
        let agent = AgentConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let client = Client::new(agent).unwrap();
        assert_eq!(client.provider(), Provider::Gemini);
    }

    #[test]
    fn test_window_becomes_context() {
        let window = vec![
            ConversationEntry::system("prompt"),
            ConversationEntry::user("hi"),
        ];
        let context = Context::from_window(&window);
        assert_eq!(context.messages.len(), 2);
        assert_eq!(context.messages[1].content, "hi");
        assert!(context.model.is_none());
    }
}
