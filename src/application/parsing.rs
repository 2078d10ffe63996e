//! # Parsing Utils
//!
//! Splits an inbound message into a `Command` when it starts with the `!` prefix.
//! Parsing never fails; argument validation belongs to the individual handlers.

use crate::domain::types::Command;

pub const COMMAND_PREFIX: char = '!';

pub fn parse_command(text: &str) -> Option<Command> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;

    // "!" alone or "! weight" carries no command name
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_string).collect();

    Some(Command { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_command("how many push-ups today?"), None);
        assert_eq!(parse_command(""), None);
        // Prefix must be the very first character
        assert_eq!(parse_command(" !weight 70 kg"), None);
    }

    #[test]
    fn test_prefix_without_name() {
        assert_eq!(parse_command("!"), None);
        assert_eq!(parse_command("! weight 70 kg"), None);
        assert_eq!(parse_command("!\t"), None);
    }

    #[test]
    fn test_name_and_args() {
        let cmd = parse_command("!weight 160 lbs").unwrap();
        assert_eq!(cmd.name, "weight");
        assert_eq!(cmd.args, vec!["160", "lbs"]);
    }

    #[test]
    fn test_name_is_lowercased_args_are_not() {
        let cmd = parse_command("!MEAL Greek Yogurt").unwrap();
        assert_eq!(cmd.name, "meal");
        assert_eq!(cmd.args, vec!["Greek", "Yogurt"]);
    }

    #[test]
    fn test_irregular_whitespace_collapses() {
        let cmd = parse_command("!supplements   creatine \t fish-oil\n").unwrap();
        assert_eq!(cmd.name, "supplements");
        assert_eq!(cmd.args, vec!["creatine", "fish-oil"]);
    }

    #[test]
    fn test_command_without_args() {
        let cmd = parse_command("!progress").unwrap();
        assert_eq!(cmd.name, "progress");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_unknown_names_still_parse() {
        let cmd = parse_command("!workout strength").unwrap();
        assert_eq!(cmd.name, "workout");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "!Habits walked 10k steps";
        assert_eq!(parse_command(text), parse_command(text));
    }
}
