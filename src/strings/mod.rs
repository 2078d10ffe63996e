//! # Strings Module
//!
//! Centralizes user-facing strings, log lines and the coaching prompt.
//! Ensures consistency in messaging and easier localization/updates.

pub mod logs;
pub mod messages;
pub mod prompts;
