//! Sends a composed prompt to the configured provider and parses its reply.
//!
//! One network round trip per call. No retries; the only bound on the wait is the
//! provider client's transport timeout.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::llm_client::{strip_json_fences, GenerationRequest, LlmProvider};
use crate::roster::models::RosterResponse;
use crate::roster::prompts::ROSTER_TRIGGER_MESSAGE;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Error: LLM provider not initialized. Check the provider API key.")]
    ProviderUnavailable,

    #[error("Error calling {provider} API: {message}")]
    UpstreamCallFailed { provider: String, message: String },

    #[error("Error calling {provider} API: malformed response ({reason})\n\nRaw Response: {raw}")]
    UpstreamMalformedResponse {
        provider: String,
        reason: String,
        raw: String,
    },
}

/// Holds the provider chosen at startup; `None` means dispatch is disabled.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Dispatcher {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub async fn dispatch(&self, prompt: String) -> Result<RosterResponse, DispatchError> {
        let provider = self
            .provider
            .as_deref()
            .ok_or(DispatchError::ProviderUnavailable)?;

        let request = GenerationRequest {
            system_instruction: prompt,
            user_message: ROSTER_TRIGGER_MESSAGE.to_string(),
            json_output: true,
        };

        let raw = provider.generate(&request).await.map_err(|e| {
            DispatchError::UpstreamCallFailed {
                provider: provider.name().to_string(),
                message: e.to_string(),
            }
        })?;

        let response = parse_roster_reply(&raw).map_err(|reason| {
            DispatchError::UpstreamMalformedResponse {
                provider: provider.name().to_string(),
                reason,
                raw: raw.clone(),
            }
        })?;

        info!(
            "Roster generated by {} ({}): {} entries",
            provider.name(),
            provider.model(),
            response.roster.len()
        );
        Ok(response)
    }
}

/// Parses the model's reply into a roster. Errors describe what was wrong with it.
///
/// Only the envelope is checked: a JSON object whose `roster` is a list and whose
/// `reasoning` is a string. Roster entries are passed through without inspection.
fn parse_roster_reply(raw: &str) -> Result<RosterResponse, String> {
    let value: Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(|e| format!("not valid JSON: {e}"))?;

    let Value::Object(fields) = &value else {
        return Err("expected a JSON object".to_string());
    };

    for key in ["roster", "reasoning"] {
        if fields.get(key).map_or(true, Value::is_null) {
            return Err(format!("missing \"{key}\" key"));
        }
    }

    if !fields["roster"].is_array() {
        return Err("\"roster\" is not a list".to_string());
    }
    if !fields["reasoning"].is_string() {
        return Err("\"reasoning\" is not a string".to_string());
    }

    serde_json::from_value(value).map_err(|e| format!("unexpected shape: {e}"))
}
