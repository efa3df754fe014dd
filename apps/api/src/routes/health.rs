use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version and which provider (if any) is serving roster requests.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "bowerman-api",
        "provider": state.dispatcher.provider_name(),
        "configured_provider": state.config.provider.as_str(),
    }))
}
