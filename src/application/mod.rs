//! # Application Layer
//!
//! Contains the core business logic of the bot: command parsing, the message
//! dispatcher and the per-user conversation store.

pub mod parsing;
pub mod router;
pub mod store;
