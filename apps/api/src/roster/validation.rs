//! Input validation for the raw text pasted by the coach.
//!
//! The dataset must be a JSON object keyed by event name with at least one non-empty
//! list of performances. Record shapes are deliberately not checked.

use serde_json::Value;
use thiserror::Error;

use crate::roster::models::{AthleteDataset, MeetContext};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid athlete data: {0}")]
    MalformedInput(String),

    #[error("Invalid athlete data: expected a non-empty JSON object keyed by event name.")]
    EmptyDataset,

    #[error("Invalid athlete data: at least one event must have a non-empty list of performances.")]
    NoPerformanceData,

    #[error("meet_context cannot be empty")]
    EmptyMeetContext,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),
}

/// Parses and checks the athlete dataset. On success the object is returned unchanged.
pub fn validate(raw: &str) -> Result<AthleteDataset, ValidationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ValidationError::MalformedInput(format!("not valid JSON ({e})")))?;

    let Value::Object(events) = value else {
        return Err(ValidationError::MalformedInput(
            "expected a JSON object mapping event names to lists of performances".to_string(),
        ));
    };

    if events.is_empty() {
        return Err(ValidationError::EmptyDataset);
    }

    let has_performances = events
        .values()
        .any(|v| v.as_array().is_some_and(|records| !records.is_empty()));
    if !has_performances {
        return Err(ValidationError::NoPerformanceData);
    }

    Ok(AthleteDataset::new(events))
}

/// Rejects blank meet context; the text itself is kept verbatim.
pub fn validate_meet_context(raw: String) -> Result<MeetContext, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyMeetContext);
    }
    Ok(MeetContext::new(raw))
}
