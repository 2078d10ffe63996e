//! # Dispatch Errors
//!
//! Failure kinds of the message dispatcher. Only `InvalidInput` ever leaves
//! `MessageDispatcher::handle`; the others are caught where they happen and logged.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("message text is empty")]
    InvalidInput,

    #[error("invalid arguments for !{command}: {reason}")]
    CommandValidation { command: String, reason: String },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("delivery failed: {0}")]
    DeliveryFailure(String),
}

impl DispatchError {
    pub fn invalid_args(command: &str, reason: impl Into<String>) -> Self {
        Self::CommandValidation {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}
