//! Anthropic Messages API backend.
//!
//! The Messages API has no JSON response mode, so `json_output` is honoured through the
//! system instruction alone and callers strip code fences from the reply.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, GenerationRequest, LlmError, LlmProvider};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: &request.system_instruction,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.user_message,
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnthropicResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        parsed
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// What the stand-in upstream received on its last call.
    #[derive(Clone, Default)]
    struct Captured {
        headers: Arc<Mutex<Option<HeaderMap>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    async fn spawn_upstream(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1/messages",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.headers.lock().unwrap() = Some(headers);
                            *captured.body.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), captured)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "system".to_string(),
            user_message: "user".to_string(),
            json_output: true,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_first_text_block() {
        let reply = json!({
            "content": [{"type": "text", "text": "{\"reasoning\": \"ok\"}"}],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        });
        let (base_url, _) = spawn_upstream(StatusCode::OK, reply).await;
        let provider =
            AnthropicProvider::new("k".into(), "claude-sonnet-4-5".into(), base_url, 5).unwrap();

        let text = provider.generate(&request()).await.unwrap();
        assert_eq!(text, "{\"reasoning\": \"ok\"}");
    }

    #[tokio::test]
    async fn test_request_carries_auth_headers_and_messages() {
        let reply = json!({"content": [{"type": "text", "text": "{}"}]});
        let (base_url, captured) = spawn_upstream(StatusCode::OK, reply).await;
        let provider =
            AnthropicProvider::new("secret".into(), "claude-sonnet-4-5".into(), base_url, 5)
                .unwrap();

        provider.generate(&request()).await.unwrap();

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "secret");
        assert_eq!(headers.get("anthropic-version").unwrap(), ANTHROPIC_VERSION);

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "claude-sonnet-4-5");
        assert_eq!(body["max_tokens"], MAX_TOKENS);
        assert_eq!(body["system"], "system");
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": "user"}])
        );
    }

    #[tokio::test]
    async fn test_error_body_message_is_extracted() {
        let reply = json!({"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}});
        let (base_url, _) = spawn_upstream(StatusCode::UNAUTHORIZED, reply).await;
        let provider = AnthropicProvider::new("k".into(), "m".into(), base_url, 5).unwrap();

        let err = provider.generate(&request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error (status 401): invalid x-api-key"
        );
    }

    #[tokio::test]
    async fn test_no_text_block_is_empty_content() {
        let reply = json!({"content": [{"type": "tool_use"}]});
        let (base_url, _) = spawn_upstream(StatusCode::OK, reply).await;
        let provider = AnthropicProvider::new("k".into(), "m".into(), base_url, 5).unwrap();

        let err = provider.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
