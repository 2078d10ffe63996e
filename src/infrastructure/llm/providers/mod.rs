//! # LLM Providers
//!
//! Contains implementations for specific LLM providers (Gemini, OpenAI-compatible).
//! Groq speaks the OpenAI protocol and reuses that implementation with its own base URL.

mod gemini;
mod openai;

use crate::domain::config::AgentConfig;
use crate::infrastructure::llm::{Context, Error, Provider, Response};

/// Configuration for a provider
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for non-default endpoints)
    pub base_url: Option<String>,
    /// Default model
    pub default_model: String,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

impl ProviderConfig {
    pub fn from_agent_config(config: &AgentConfig) -> Result<Self, Error> {
        let api_key = if let Some(key) = &config.api_key {
            key.clone()
        } else {
            std::env::var(&config.api_key_env).map_err(|e| {
                Error::new(
                    &config.provider,
                    format!("API key env var {} not set: {}", config.api_key_env, e),
                )
            })?
        };

        Ok(Self {
            api_key,
            base_url: config.endpoint.clone(),
            default_model: config.model.clone(),
            timeout: config.timeout,
        })
    }
}

/// Execute a chat request with the specified provider
pub async fn chat(
    provider: Provider,
    config: ProviderConfig,
    context: Context,
) -> Result<Response, Error> {
    match provider {
        Provider::OpenAI => openai::chat(provider, config, context).await,
        Provider::Groq => {
            // Groq uses OpenAI-compatible API
            let config_with_url = ProviderConfig {
                base_url: Some(
                    config
                        .base_url
                        .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string()),
                ),
                ..config
            };
            openai::chat(provider, config_with_url, context).await
        }
        Provider::Gemini => gemini::chat(config, context).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_api_key_wins() {
        let agent = AgentConfig {
            api_key: Some("inline-key".to_string()),
            api_key_env: "FITCOACH_TEST_SURELY_UNSET_KEY".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout: Some(30),
            ..Default::default()
        };
        let config = ProviderConfig::from_agent_config(&agent).unwrap();
        assert_eq!(config.api_key, "inline-key");
        assert_eq!(config.default_model, "gemini-1.5-flash");
        assert_eq!(config.timeout, Some(30));
    }

    #[test]
    fn test_missing_api_key_is_reported() {
        let agent = AgentConfig {
            api_key_env: "FITCOACH_TEST_SURELY_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let err = ProviderConfig::from_agent_config(&agent).err().unwrap();
        assert_eq!(err.provider, "gemini");
        assert!(err.message.contains("FITCOACH_TEST_SURELY_UNSET_KEY"));
    }
}
