//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: Configuration, Types, Traits
//! - Infrastructure: WhatsApp, LLM
//! - Application: Dispatcher, Parsing, Conversation Store
//! - Interface: Webhook, Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::application::router::MessageDispatcher;
use crate::application::store::InMemoryStore;
use crate::domain::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::domain::traits::ChatProvider;
use crate::infrastructure::llm::Client as LlmClient;
use crate::infrastructure::whatsapp::WhatsAppService;
use crate::interface::webhook::{self, WebhookState};
use crate::strings::{logs, prompts};

const DOCTOR_TIMEOUT: Duration = Duration::from_secs(10);
const DOCTOR_PROMPT: &str = "Hello! Reply with one short sentence so I know you are there.";

#[derive(Parser)]
#[command(name = "fitcoach", version, about = "WhatsApp fitness coaching bot")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the webhook server (default)
    Serve,
    /// Check connectivity to the model and the WhatsApp API
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command.unwrap_or(CliCommand::Serve) {
        CliCommand::Serve => {
            // Keep the guard alive so the file writer flushes until exit
            let _guard = init_logging(true)?;
            tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));
            serve(config).await
        }
        CliCommand::Doctor => {
            let _guard = init_logging(false)?;
            doctor(config).await
        }
    }
}

/// Console output always; `data/session.log` (cleared on start) when `to_file` is set.
fn init_logging(to_file: bool) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let (file_layer, guard) = if to_file {
        let data_dir = Path::new("data");
        if !data_dir.exists() {
            std::fs::create_dir(data_dir).context("Failed to create data directory")?;
        }

        // Clear previous session log
        let log_path = data_dir.join("session.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(data_dir, "session.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_system_prompt(config: &AppConfig) -> Result<String> {
    let template = match &config.coach.prompt_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path))?,
        None => prompts::COACH_TEMPLATE.to_string(),
    };
    Ok(prompts::coach_prompt(&template, &config.goals))
}

async fn serve(config: AppConfig) -> Result<()> {
    tracing::info!("Starting fitcoach...");

    // 2. Initialize Infrastructure
    let llm = Arc::new(LlmClient::new(config.agent.clone()).context("Failed to set up model client")?);
    let whatsapp: Arc<dyn ChatProvider> = Arc::new(
        WhatsAppService::new(&config.services.whatsapp)
            .context("Failed to set up WhatsApp client")?,
    );
    let verify_token = config
        .services
        .whatsapp
        .resolve_verify_token()
        .context("Webhook verify token missing")?;

    // 3. Initialize Application Components
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = MessageDispatcher::new(store, llm, load_system_prompt(&config)?)
        .with_history_window(config.coach.history_window)
        .with_model_timeout(Duration::from_secs(config.coach.model_timeout_secs));

    // 4. Webhook
    let state = Arc::new(WebhookState {
        dispatcher: Arc::new(dispatcher),
        chat: whatsapp,
        verify_token,
    });
    let app = webhook::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("{}", logs::listening(&addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server failed")?;

    tracing::info!("{}", logs::SHUTDOWN);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{}", logs::shutdown_fail(&e.to_string()));
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
}

async fn doctor(config: AppConfig) -> Result<()> {
    println!("🩺 fitcoach doctor\n");
    let mut failures = 0_u32;

    // Model
    match LlmClient::new(config.agent.clone()) {
        Ok(client) => {
            let name = client.provider().as_str().to_string();
            match tokio::time::timeout(DOCTOR_TIMEOUT, client.prompt(DOCTOR_PROMPT)).await {
                Ok(Ok(response)) => {
                    println!("  ✅ {name:<9} {} replied: {}", response.model, response.content.trim());
                }
                Ok(Err(e)) => {
                    failures += 1;
                    println!("  ❌ {name:<9} {e}");
                }
                Err(_) => {
                    failures += 1;
                    println!("  ⏱️ {name:<9} timed out after {}s", DOCTOR_TIMEOUT.as_secs());
                }
            }
        }
        Err(e) => {
            failures += 1;
            println!("  ❌ model     {e}");
        }
    }

    // WhatsApp
    match WhatsAppService::new(&config.services.whatsapp) {
        Ok(service) => {
            let name = service.name().to_string();
            match tokio::time::timeout(DOCTOR_TIMEOUT, service.health_check()).await {
                Ok(Ok(())) => println!("  ✅ {name:<9} credentials accepted"),
                Ok(Err(e)) => {
                    failures += 1;
                    println!("  ❌ {name:<9} {e}");
                }
                Err(_) => {
                    failures += 1;
                    println!("  ⏱️ {name:<9} timed out after {}s", DOCTOR_TIMEOUT.as_secs());
                }
            }
        }
        Err(e) => {
            failures += 1;
            println!("  ❌ whatsapp  {e:#}");
        }
    }

    if let Err(e) = config.services.whatsapp.resolve_verify_token() {
        failures += 1;
        println!("  ❌ webhook   {e:#}");
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{failures} check(s) failed");
    }
    println!("All checks passed.");
    Ok(())
}
