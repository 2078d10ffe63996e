//! # LLM
//!
//! Small multi-provider wrapper (Gemini, OpenAI, Groq) used for free-form coaching chat.
//!
//! ```rust,ignore
//! let client = Client::new(config.agent.clone())?;
//! let reply = client.chat(Context::prompt("Hello!")).await?;
//! println!("Response: {}", reply.content);
//! ```

mod client;
pub mod providers;
mod types;

pub use client::Client;

pub use types::{Context, Error, Message, Provider, Response, TokenUsage};
