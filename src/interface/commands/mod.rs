//! # Command Handlers
//!
//! Contains the handler functions for each supported tracking command (e.g., !weight, !mood).
//! The router looks handlers up by name in `HANDLERS`; names missing from the table
//! (including the advertised `!workout`, `!nutrition`, `!sleep`, `!recovery` and
//! `!motivation`) are treated as ordinary chat.

pub mod tracking;

use crate::domain::error::DispatchError;
use crate::domain::types::Recorded;

/// Validates `args` and either records a value or rejects the input.
pub type CommandHandler = fn(&[String]) -> Result<Recorded, DispatchError>;

pub const HANDLERS: &[(&str, CommandHandler)] = &[
    ("weight", tracking::weight),
    ("bodyfat", tracking::body_fat),
    ("hydration", tracking::hydration),
    ("mood", tracking::mood),
    ("supplements", tracking::supplements),
    ("habits", tracking::habits),
    ("meal", tracking::meal),
    ("progress", tracking::progress),
];

pub fn lookup(name: &str) -> Option<CommandHandler> {
    HANDLERS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, handler)| *handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        for name in [
            "weight",
            "bodyfat",
            "hydration",
            "mood",
            "supplements",
            "habits",
            "meal",
            "progress",
        ] {
            assert!(lookup(name).is_some(), "missing handler for {name}");
        }
    }

    #[test]
    fn test_lookup_unimplemented() {
        for name in ["workout", "nutrition", "sleep", "recovery", "motivation", ""] {
            assert!(lookup(name).is_none(), "unexpected handler for {name}");
        }
    }
}
