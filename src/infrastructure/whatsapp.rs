//! # WhatsApp Service Adapter
//!
//! Implements the `ChatProvider` trait for the WhatsApp Cloud API.
//! This module acts as the bridge between the generic `ChatProvider` interface used by the bot's core logic
//! and the Graph API's `/{phone_number_id}/messages` endpoint.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::config::WhatsAppConfig;
use crate::domain::traits::ChatProvider;
use crate::strings::logs;

#[derive(Clone)]
pub struct WhatsAppService {
    http: Client,
    access_token: String,
    phone_number_id: String,
    api_base: String,
    api_version: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct OutboundMessage<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    text: OutboundText<'a>,
}

#[derive(Debug, Serialize, PartialEq)]
struct OutboundText<'a> {
    body: &'a str,
}

impl<'a> OutboundMessage<'a> {
    fn text(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: OutboundText { body },
        }
    }
}

impl WhatsAppService {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            access_token: config.resolve_access_token()?,
            phone_number_id: config.resolve_phone_number_id()?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    fn phone_url(&self) -> String {
        format!("{}/{}/{}", self.api_base, self.api_version, self.phone_number_id)
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.phone_url())
    }

    /// Helper to turn a non-2xx response into a readable error
    async fn error_from(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| {
                json.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);
        format!("HTTP {}: {}", status, message)
    }
}

#[async_trait]
impl ChatProvider for WhatsAppService {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send_message(&self, recipient: &str, content: &str) -> Result<(), String> {
        tracing::info!("{}", logs::sending(recipient, content));
        let response = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(&OutboundMessage::text(recipient, content))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), String> {
        let response = self
            .http
            .get(self.phone_url())
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> WhatsAppService {
        let config = WhatsAppConfig {
            access_token: Some("token".to_string()),
            phone_number_id: Some("1234".to_string()),
            api_base: "https://graph.example.com/".to_string(),
            ..Default::default()
        };
        WhatsAppService::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let svc = service();
        assert_eq!(svc.phone_url(), "https://graph.example.com/v17.0/1234");
        assert_eq!(svc.messages_url(), "https://graph.example.com/v17.0/1234/messages");
    }

    #[test]
    fn test_outbound_payload_shape() {
        let json = serde_json::to_value(OutboundMessage::text("4915112345", "Weight recorded: 72.0 kg")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "4915112345",
                "type": "text",
                "text": {"body": "Weight recorded: 72.0 kg"}
            })
        );
    }

    #[test]
    fn test_missing_token_fails_construction() {
        let config = WhatsAppConfig {
            access_token: None,
            access_token_env: "FITCOACH_TEST_SURELY_UNSET_TOKEN".to_string(),
            phone_number_id: Some("1234".to_string()),
            ..Default::default()
        };
        assert!(WhatsAppService::new(&config).is_err());
    }
}
