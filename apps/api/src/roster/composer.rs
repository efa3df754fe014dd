//! Renders the roster system instruction from validated input.

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::roster::models::{AthleteDataset, MeetContext};
use crate::roster::prompts::{MAX_EVENTS_PER_ATHLETE, ROSTER_SYSTEM_TEMPLATE, SCORING_WEIGHTS};

/// Deterministic: the same dataset and context always produce the same prompt.
pub fn compose(data: &AthleteDataset, context: &MeetContext) -> String {
    let athlete_data = data.to_pretty_json();
    let scoring = SCORING_WEIGHTS
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("-");
    let max_events = MAX_EVENTS_PER_ATHLETE.to_string();

    fill_template(
        ROSTER_SYSTEM_TEMPLATE,
        &[
            ("meet_context", context.as_str()),
            ("athlete_data", &athlete_data),
            ("scoring", &scoring),
            ("max_events", &max_events),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::validation::{validate, validate_meet_context};

    fn inputs(raw: &str, context: &str) -> (AthleteDataset, MeetContext) {
        (
            validate(raw).unwrap(),
            validate_meet_context(context.to_string()).unwrap(),
        )
    }

    #[test]
    fn test_contains_context_and_dataset_verbatim() {
        let (data, context) = inputs(
            r#"{"100m": [{"name":"A","time":10.5}]}"#,
            "Conference finals vs Team A",
        );
        let prompt = compose(&data, &context);
        assert!(prompt.contains("Conference finals vs Team A"));
        assert!(prompt.contains(&data.to_pretty_json()));
    }

    #[test]
    fn test_carries_scoring_rules_and_output_contract() {
        let (data, context) = inputs(r#"{"100m": [1]}"#, "Dual meet");
        let prompt = compose(&data, &context);
        assert!(prompt.contains("10-8-6-5-4-3-2-1"));
        assert!(prompt.contains("Max 4 events per athlete"));
        assert!(prompt.contains("\"reasoning\""));
        assert!(prompt.contains("\"roster\""));
        assert!(prompt.contains("\"Athlete Name\", \"Event(s)\", and \"Notes\""));
        assert!(!prompt.contains("{meet_context}"));
        assert!(!prompt.contains("{athlete_data}"));
    }

    #[test]
    fn test_placeholder_text_in_context_is_not_expanded() {
        let (data, context) = inputs(r#"{"100m": [1]}"#, "Use {athlete_data} wisely");
        let prompt = compose(&data, &context);
        assert!(prompt.contains("Use {athlete_data} wisely"));
    }

    #[test]
    fn test_is_deterministic() {
        let (data, context) = inputs(r#"{"100m": [1], "200m": [2]}"#, "Finals");
        assert_eq!(compose(&data, &context), compose(&data, &context));
    }
}
