// Roster generation: validate → compose → dispatch → relay.
// All provider calls go through llm_client; nothing here talks HTTP to a model directly.

pub mod composer;
pub mod dispatcher;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod validation;
