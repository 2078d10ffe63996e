//! # Tracking Commands
//!
//! `!weight`, `!bodyfat`, `!hydration`, `!mood`, `!supplements`, `!habits`, `!meal`
//! and the `!progress` stub. Handlers are pure; the router writes the log line.

use crate::domain::error::DispatchError;
use crate::domain::types::Recorded;
use crate::strings::messages;

const LBS_TO_KG: f64 = 0.453592;

pub fn weight(args: &[String]) -> Result<Recorded, DispatchError> {
    let [value, unit, ..] = args else {
        return Err(DispatchError::invalid_args("weight", "expected <value> <kg|lbs>"));
    };
    let value = parse_number("weight", value)?;
    let kg = match unit.to_lowercase().as_str() {
        "kg" => value,
        "lbs" => value * LBS_TO_KG,
        other => {
            return Err(DispatchError::invalid_args(
                "weight",
                format!("unknown unit '{other}'"),
            ));
        }
    };
    let kg = format!("{kg:.1}");
    Ok(Recorded::new(messages::weight_log(&kg), messages::weight_recorded(&kg)))
}

pub fn body_fat(args: &[String]) -> Result<Recorded, DispatchError> {
    let Some(value) = args.first() else {
        return Err(DispatchError::invalid_args("bodyfat", "expected <percentage>"));
    };
    let pct = format!("{:.1}", parse_number("bodyfat", value)?);
    Ok(Recorded::new(messages::body_fat_log(&pct), messages::body_fat_recorded(&pct)))
}

pub fn hydration(args: &[String]) -> Result<Recorded, DispatchError> {
    let Some(value) = args.first() else {
        return Err(DispatchError::invalid_args("hydration", "expected <ml>"));
    };
    // Always shows a decimal part: `500` reads back as `500.0`
    let ml = format!("{:?}", parse_number("hydration", value)?);
    Ok(Recorded::new(messages::hydration_log(&ml), messages::hydration_recorded(&ml)))
}

pub fn mood(args: &[String]) -> Result<Recorded, DispatchError> {
    let Some(value) = args.first() else {
        return Err(DispatchError::invalid_args("mood", "expected <1-5>"));
    };
    let mood: i64 = value
        .parse()
        .map_err(|_| DispatchError::invalid_args("mood", format!("'{value}' is not an integer")))?;
    if !(1..=5).contains(&mood) {
        return Err(DispatchError::invalid_args("mood", format!("{mood} is outside 1-5")));
    }
    Ok(Recorded::new(messages::mood_log(mood), messages::mood_recorded(mood)))
}

pub fn supplements(args: &[String]) -> Result<Recorded, DispatchError> {
    let list = free_text("supplements", args)?;
    Ok(Recorded::new(messages::supplements_log(&list), messages::supplements_recorded(&list)))
}

pub fn habits(args: &[String]) -> Result<Recorded, DispatchError> {
    let habits = free_text("habits", args)?;
    Ok(Recorded::new(messages::habits_log(&habits), messages::habits_recorded(&habits)))
}

pub fn meal(args: &[String]) -> Result<Recorded, DispatchError> {
    let meal = free_text("meal", args)?;
    Ok(Recorded::new(messages::meal_log(&meal), messages::meal_recorded(&meal)))
}

/// Not implemented yet; deliberately ignores stored metrics.
pub fn progress(_args: &[String]) -> Result<Recorded, DispatchError> {
    Ok(Recorded::reply_only(messages::PROGRESS_PLACEHOLDER))
}

fn parse_number(command: &str, raw: &str) -> Result<f64, DispatchError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DispatchError::invalid_args(
            command,
            format!("'{raw}' is not a number"),
        )),
    }
}

fn free_text(command: &str, args: &[String]) -> Result<String, DispatchError> {
    if args.is_empty() {
        return Err(DispatchError::invalid_args(command, "expected a description"));
    }
    Ok(args.join(" "))
}
