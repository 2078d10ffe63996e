//! # Interface Layer
//!
//! Entry points into the application: the WhatsApp webhook and the tracking
//! command handlers it reaches through the dispatcher.

pub mod commands;
pub mod webhook;
