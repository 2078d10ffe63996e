//! Gemini provider
//!
//! Talks to Google's `generateContent` endpoint. Gemini has no system role, so
//! system entries are sent as user turns labelled `System:`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ProviderConfig;
use crate::domain::types::Role;
use crate::infrastructure::llm::{Context, Error, Message, Response, TokenUsage};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client")
    })
}

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Gemini content (message)
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini content part
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

/// Gemini response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

/// Gemini usage metadata
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

fn to_contents(messages: &[Message]) -> Vec<GeminiContent> {
    messages
        .iter()
        .map(|msg| {
            let (role, text) = match msg.role {
                Role::System => ("user", format!("System: {}", msg.content)),
                Role::User => ("user", msg.content.clone()),
                Role::Assistant => ("model", msg.content.clone()),
            };
            GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart { text }],
            }
        })
        .collect()
}

fn extract_text(response: GeminiResponse) -> Result<(String, GeminiUsage), Error> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(Error::new("gemini", "No candidates in response"));
    };

    let Some(content) = candidate.content else {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(Error::new(
            "gemini",
            format!("Candidate has no content (finish reason: {})", reason),
        ));
    };

    // Extract text from parts
    let text = content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("\n");

    Ok((text, response.usage_metadata.unwrap_or_default()))
}

/// Execute a chat request using Gemini's API
pub async fn chat(config: ProviderConfig, context: Context) -> Result<Response, Error> {
    let base_url = config
        .base_url
        .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());

    let model = context.model.unwrap_or_else(|| {
        if config.default_model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.default_model.clone()
        }
    });

    // Key goes in a header so it never shows up in a URL
    let url = format!("{}/v1beta/models/{}:generateContent", base_url, model);

    // Build generation config
    let generation_config = if context.temperature.is_some() || context.max_tokens.is_some() {
        Some(GenerationConfig {
            temperature: context.temperature,
            max_output_tokens: context.max_tokens,
        })
    } else {
        None
    };

    let request = GeminiRequest {
        contents: to_contents(&context.messages),
        generation_config,
    };

    let mut request_builder = http_client()
        .post(&url)
        .header("x-goog-api-key", config.api_key.as_str())
        .header("Content-Type", "application/json")
        .json(&request);

    if let Some(timeout_secs) = config.timeout {
        request_builder = request_builder.timeout(std::time::Duration::from_secs(timeout_secs));
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| Error::new("gemini", format!("HTTP request failed: {}", e.without_url())))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        // Try to parse error message from response
        if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text) {
            if let Some(error_msg) = error_json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return Err(Error::new("gemini", error_msg));
            }
        }

        return Err(Error::new(
            "gemini",
            format!("HTTP {}: {}", status, error_text),
        ));
    }

    let gemini_response: GeminiResponse = response
        .json()
        .await
        .map_err(|e| {
            Error::new("gemini", format!("Failed to parse response: {}", e.without_url()))
        })?;

    let (content, usage) = extract_text(gemini_response)?;

    Ok(Response {
        content,
        model,
        usage: TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        },
    })
}
