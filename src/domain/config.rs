//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the HTTP server, the WhatsApp service, the model agent,
//! dispatcher tuning and the coaching defaults rendered into the system prompt.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "data/config.yaml";

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub coach: CoachConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

/// Where the webhook listener binds.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

/// Specific configuration for the WhatsApp Cloud API.
#[derive(Debug, Deserialize, Clone)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
    #[serde(default)]
    pub verify_token: Option<String>,
    #[serde(default = "default_verify_token_env")]
    pub verify_token_env: String,
    #[serde(default)]
    pub phone_number_id: Option<String>,
    #[serde(default = "default_phone_number_id_env")]
    pub phone_number_id_env: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            access_token_env: default_access_token_env(),
            verify_token: None,
            verify_token_env: default_verify_token_env(),
            phone_number_id: None,
            phone_number_id_env: default_phone_number_id_env(),
            api_base: default_api_base(),
            api_version: default_api_version(),
        }
    }
}

impl WhatsAppConfig {
    pub fn resolve_access_token(&self) -> Result<String> {
        resolve_secret(&self.access_token, &self.access_token_env)
    }

    pub fn resolve_verify_token(&self) -> Result<String> {
        resolve_secret(&self.verify_token, &self.verify_token_env)
    }

    pub fn resolve_phone_number_id(&self) -> Result<String> {
        resolve_secret(&self.phone_number_id, &self.phone_number_id_env)
    }
}

fn default_access_token_env() -> String {
    "WHATSAPP_TOKEN".to_string()
}
fn default_verify_token_env() -> String {
    "WHATSAPP_VERIFY_TOKEN".to_string()
}
fn default_phone_number_id_env() -> String {
    "PHONE_NUMBER_ID".to_string()
}
fn default_api_base() -> String {
    "https://graph.facebook.com".to_string()
}
fn default_api_version() -> String {
    "v17.0".to_string()
}

/// The language model used for free-form chat.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: String::new(),
            endpoint: None,
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

/// Dispatcher tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct CoachConfig {
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,
    /// Replaces the bundled `prompts/coach.md` when set.
    #[serde(default)]
    pub prompt_file: Option<String>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            model_timeout_secs: default_model_timeout(),
            prompt_file: None,
        }
    }
}

fn default_history_window() -> usize {
    10
}
fn default_model_timeout() -> u64 {
    60
}

/// Coaching defaults presented to the model as the client's starting targets.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoalsConfig {
    pub workout_days: u32,
    /// Minutes per session
    pub workout_duration: u32,
    pub calorie_goal: u32,
    /// kg
    pub weight_goal: f64,
    /// %
    pub body_fat_goal: f64,
    /// %
    pub muscle_mass_goal: f64,
    /// ml per day
    pub daily_water_goal: u32,
    /// grams per kg of body weight
    pub protein_goal: f64,
    pub carbs_goal: f64,
    pub fats_goal: f64,
    /// grams per serving
    pub whey_protein_goal: u32,
    pub bcaa_goal: u32,
    /// grams per day
    pub creatine_goal: u32,
    pub mood_scale: String,
    pub habits: Vec<String>,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            workout_days: 5,
            workout_duration: 60,
            calorie_goal: 2000,
            weight_goal: 75.0,
            body_fat_goal: 15.0,
            muscle_mass_goal: 45.0,
            daily_water_goal: 3000,
            protein_goal: 1.5,
            carbs_goal: 4.0,
            fats_goal: 0.8,
            whey_protein_goal: 20,
            bcaa_goal: 5,
            creatine_goal: 5,
            mood_scale: "1-5".to_string(),
            habits: vec![
                "Drink water every 2 hours".to_string(),
                "Get 7-9 hours of sleep".to_string(),
                "Practice mindfulness or meditation".to_string(),
                "Take a 5-minute walk after meals".to_string(),
                "Prepare meals in advance".to_string(),
            ],
        }
    }
}

/// Inline value wins, otherwise read the named environment variable.
pub fn resolve_secret(inline: &Option<String>, env_var: &str) -> Result<String> {
    if let Some(value) = inline {
        return Ok(value.clone());
    }
    std::env::var(env_var).with_context(|| format!("Environment variable {} not set", env_var))
}
