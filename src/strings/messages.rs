//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes tracking confirmations, history log lines and fallback replies.

pub const MODEL_APOLOGY: &str =
    "I apologize, but I'm having trouble processing your message. Please try again later.";

pub const PROGRESS_PLACEHOLDER: &str = "Progress summary: [TODO: Implement progress tracking]";

pub fn weight_recorded(kg: &str) -> String {
    format!("Weight recorded: {kg} kg")
}

pub fn weight_log(kg: &str) -> String {
    format!("Current weight: {kg} kg")
}

pub fn body_fat_recorded(pct: &str) -> String {
    format!("Body fat recorded: {pct}%")
}

pub fn body_fat_log(pct: &str) -> String {
    format!("Current body fat: {pct}%")
}

pub fn hydration_recorded(ml: &str) -> String {
    format!("Water intake recorded: {ml} ml")
}

pub fn hydration_log(ml: &str) -> String {
    format!("Water intake: {ml} ml")
}

pub fn mood_recorded(mood: i64) -> String {
    format!("Mood recorded: {mood}/5")
}

pub fn mood_log(mood: i64) -> String {
    format!("Mood: {mood}/5")
}

pub fn supplements_recorded(list: &str) -> String {
    format!("Supplements recorded: {list}")
}

pub fn supplements_log(list: &str) -> String {
    format!("Supplements: {list}")
}

pub fn habits_recorded(habits: &str) -> String {
    format!("Habits recorded: {habits}")
}

pub fn habits_log(habits: &str) -> String {
    format!("Completed habits: {habits}")
}

pub fn meal_recorded(meal: &str) -> String {
    format!("Meal recorded: {meal}")
}

pub fn meal_log(meal: &str) -> String {
    format!("Meal: {meal}")
}

pub fn last_plan_log(plan: &str) -> String {
    format!("Last plan: {plan}")
}
