//! Axum route handler for roster generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::roster::composer::compose;
use crate::roster::models::RosterResponse;
use crate::roster::validation::{validate, validate_meet_context, ValidationError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    pub meet_context: String,
    /// JSON-encoded athlete dataset, exactly as pasted by the coach.
    pub athlete_data: String,
}

/// POST /generate_roster
///
/// Validates the dataset, composes the strategy prompt and relays the provider's
/// roster and reasoning unchanged. 400 on bad input, 500 on upstream failure.
/// Body rejections are reported as 400 with the same `detail` shape as other errors.
pub async fn handle_generate_roster(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> Result<Json<RosterResponse>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| ValidationError::InvalidRequest(rejection.body_text()))?;

    let dataset = validate(&request.athlete_data)?;
    let context = validate_meet_context(request.meet_context)?;
    debug!("Athlete data accepted: {} events", dataset.events().len());

    let prompt = compose(&dataset, &context);
    let response = state.dispatcher.dispatch(prompt).await?;

    Ok(Json(response))
}
