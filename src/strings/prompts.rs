use crate::domain::config::GoalsConfig;
use crate::strings::logs;

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }

        if let Some(placeholder) = leftover_placeholder(&result) {
            tracing::error!("{}", logs::prompt_placeholder_left(placeholder));
        }

        result
    }
}

fn leftover_placeholder(text: &str) -> Option<&str> {
    let start = text.find("{{")?;
    let end = text[start..].find("}}")?;
    Some(&text[start..start + end + 2])
}

pub const COACH_TEMPLATE: &str = include_str!("../../prompts/coach.md");

/// The system instruction sent ahead of every chat window.
pub fn coach_prompt(template: &str, goals: &GoalsConfig) -> String {
    let habits = goals
        .habits
        .iter()
        .map(|h| format!("  * {h}"))
        .collect::<Vec<_>>()
        .join("\n");

    PromptRenderer::new(template)
        .set("{{MOOD_SCALE}}", goals.mood_scale.as_str())
        .set("{{WORKOUT_DAYS}}", goals.workout_days.to_string())
        .set("{{WORKOUT_DURATION}}", goals.workout_duration.to_string())
        .set("{{CALORIE_GOAL}}", goals.calorie_goal.to_string())
        .set("{{WEIGHT_GOAL}}", format!("{:.1}", goals.weight_goal))
        .set("{{BODY_FAT_GOAL}}", format!("{:.1}", goals.body_fat_goal))
        .set("{{MUSCLE_MASS_GOAL}}", format!("{:.1}", goals.muscle_mass_goal))
        .set("{{DAILY_WATER_GOAL}}", goals.daily_water_goal.to_string())
        .set("{{PROTEIN_GOAL}}", format!("{:.1}", goals.protein_goal))
        .set("{{CARBS_GOAL}}", format!("{:.1}", goals.carbs_goal))
        .set("{{FATS_GOAL}}", format!("{:.1}", goals.fats_goal))
        .set("{{WHEY_PROTEIN_GOAL}}", goals.whey_protein_goal.to_string())
        .set("{{BCAA_GOAL}}", goals.bcaa_goal.to_string())
        .set("{{CREATINE_GOAL}}", goals.creatine_goal.to_string())
        .set("{{DEFAULT_HABITS}}", habits)
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_replaces_keys() {
        let out = PromptRenderer::new("Hello {{NAME}}, drink {{ML}} ml")
            .set("{{NAME}}", "Sam")
            .set("{{ML}}", "500")
            .render();
        assert_eq!(out, "Hello Sam, drink 500 ml");
    }

    #[test]
    fn test_leftover_placeholder_detection() {
        assert_eq!(leftover_placeholder("a {{MISSING}} b"), Some("{{MISSING}}"));
        assert_eq!(leftover_placeholder("all done"), None);
    }

    #[test]
    fn test_coach_prompt_is_fully_rendered() {
        let prompt = coach_prompt(COACH_TEMPLATE, &GoalsConfig::default());
        assert_eq!(leftover_placeholder(&prompt), None);
        assert!(prompt.contains("5 days per week, 60 minutes per session"));
        assert!(prompt.contains("weight 75.0 kg, body fat 15.0%"));
        assert!(prompt.contains("  * Get 7-9 hours of sleep"));
        assert!(prompt.contains("!weight [number] [kg/lbs]"));
    }

    #[test]
    fn test_coach_prompt_uses_configured_goals() {
        let goals = GoalsConfig {
            calorie_goal: 2600,
            habits: vec!["Stretch daily".to_string()],
            ..Default::default()
        };
        let prompt = coach_prompt(COACH_TEMPLATE, &goals);
        assert!(prompt.contains("2600 kcal per day"));
        assert!(prompt.contains("  * Stretch daily"));
        assert!(!prompt.contains("Prepare meals in advance"));
    }
}
