use crate::config::Config;
use crate::roster::dispatcher::Dispatcher;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: Config,
}
