//! The single point of entry for every upstream model call in Bowerman.
//!
//! No other module talks to a provider API directly. Callers hold an
//! `Arc<dyn LlmProvider>` chosen once at startup by [`build_provider`];
//! adding a backend means adding an implementation here, not a branch in the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ProviderKind};

pub mod anthropic;
pub mod gemini;
pub mod placeholder;
pub mod prompts;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use placeholder::PlaceholderProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One generation call: a system instruction carrying all the data, plus a short user turn.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_message: String,
    /// Ask the provider for a JSON-typed reply where the API supports it.
    pub json_output: bool,
}

/// Capability interface over a hosted model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider tag used in logs and error messages, e.g. `gemini`.
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Sends a single request and returns the model's raw text reply.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

/// Builds the HTTP client shared by all calls of one provider.
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Instantiates the configured provider.
///
/// Returns `Ok(None)` when the selected provider needs an API key that is not set;
/// the dispatcher then rejects every call with `ProviderUnavailable`.
pub fn build_provider(config: &Config) -> Result<Option<Arc<dyn LlmProvider>>> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Gemini => {
            let Some(api_key) = config.gemini_api_key.clone() else {
                warn!(
                    "Gemini client not initialized: set GEMINI_API_KEY or GOOGLE_API_KEY. \
                     Roster generation is disabled."
                );
                return Ok(None);
            };
            Arc::new(
                GeminiProvider::new(
                    api_key,
                    config.gemini_model.clone(),
                    config.gemini_base_url.clone(),
                    config.llm_timeout_secs,
                )
                .context("Failed to build Gemini HTTP client")?,
            )
        }
        ProviderKind::Anthropic => {
            let Some(api_key) = config.anthropic_api_key.clone() else {
                warn!(
                    "Anthropic client not initialized: set ANTHROPIC_API_KEY. \
                     Roster generation is disabled."
                );
                return Ok(None);
            };
            Arc::new(
                AnthropicProvider::new(
                    api_key,
                    config.anthropic_model.clone(),
                    config.anthropic_base_url.clone(),
                    config.llm_timeout_secs,
                )
                .context("Failed to build Anthropic HTTP client")?,
            )
        }
        ProviderKind::Placeholder => Arc::new(PlaceholderProvider),
    };

    info!(
        "LLM provider initialized: {} (model: {})",
        provider.name(),
        provider.model()
    );
    Ok(Some(provider))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped)
}
