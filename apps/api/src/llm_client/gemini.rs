//! Google Gemini backend (`models/{model}:generateContent`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, GenerationRequest, LlmError, LlmProvider};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
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

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &request.user_message,
                }],
            }],
            generation_config: request.json_output.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        path: Arc<Mutex<Option<String>>>,
        key: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    async fn spawn_upstream(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1beta/models/:call",
                post(
                    move |State(captured): State<Captured>,
                          Path(call): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.path.lock().unwrap() = Some(call);
                            *captured.key.lock().unwrap() = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
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
        (format!("http://{addr}/v1beta"), captured)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "You are a coach.".to_string(),
            user_message: "Go.".to_string(),
            json_output: true,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let reply = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"roster\":"}, {"text": "[]}"}]}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        });
        let (base_url, captured) = spawn_upstream(StatusCode::OK, reply).await;
        let provider =
            GeminiProvider::new("secret".into(), "gemini-2.5-flash".into(), base_url, 5).unwrap();

        let text = provider.generate(&request()).await.unwrap();
        assert_eq!(text, "{\"roster\":[]}");

        assert_eq!(
            captured.path.lock().unwrap().as_deref(),
            Some("gemini-2.5-flash:generateContent")
        );
        assert_eq!(captured.key.lock().unwrap().as_deref(), Some("secret"));
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a coach."
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Go.");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let reply = json!({"error": {"code": 400, "message": "API key not valid."}});
        let (base_url, _) = spawn_upstream(StatusCode::BAD_REQUEST, reply).await;
        let provider = GeminiProvider::new("bad".into(), "m".into(), base_url, 5).unwrap();

        let err = provider.generate(&request()).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_content() {
        let (base_url, _) = spawn_upstream(StatusCode::OK, json!({"candidates": []})).await;
        let provider = GeminiProvider::new("k".into(), "m".into(), base_url, 5).unwrap();

        let err = provider.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            GeminiProvider::new("k".into(), "m".into(), format!("http://{addr}"), 5).unwrap();
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
