pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::roster::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate_roster",
            post(handlers::handle_generate_roster),
        )
        .with_state(state)
}
