/// LLM Client — the single point of entry for all Gemini API calls in SkillQuest.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All LLM interactions MUST go through `TextGenerator`.
///
/// Model: gemini-1.5-pro (hardcoded — do not make configurable to prevent drift)
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// The model used for all LLM calls in SkillQuest.
pub const MODEL: &str = "gemini-1.5-pro";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1000;
/// Single attempt, no retries. The whole exchange must finish within this bound.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Longest slice of an unrecognised response body kept for diagnosis.
const RAW_DUMP_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            // The request URL carries the API key.
            LlmError::Http(e.without_url())
        }
    }
}

/// Anything that can turn a prompt into generated text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so handlers never depend on Gemini directly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(api_key, api_base, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: String,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.api_base)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Makes exactly one call to the Gemini API and returns the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        debug!("Calling Gemini API (model: {MODEL})");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        debug!("Gemini API responded with {status}");

        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            warn!("Gemini API returned {status}: {body}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let raw = response.text().await?;
        let body: Value = serde_json::from_str(&raw)?;

        if let Some(usage) = body.get("usageMetadata") {
            debug!("Gemini usage: {usage}");
        }

        extract_text(&raw, &body)
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
///
/// Only that path is inspected; the rest of the body may hold anything. A first
/// part without a string `text` is `EmptyContent`; any other missing level is
/// `UnexpectedShape` carrying the first characters of `raw`.
fn extract_text(raw: &str, body: &Value) -> Result<String, LlmError> {
    let first_part = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first());

    match first_part {
        Some(part) => part
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent),
        None => Err(LlmError::UnexpectedShape(truncate_chars(raw, RAW_DUMP_CHARS))),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::post, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn extract(body: Value) -> Result<String, LlmError> {
        extract_text(&body.to_string(), &body)
    }

    #[test]
    fn test_extract_text_first_candidate() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Roadmap"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        });
        assert_eq!(extract(body).unwrap(), "Roadmap");
    }

    #[test]
    fn test_extract_text_ignores_malformed_later_entries() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Roadmap"}, {"text": 42}]}},
                {"content": {"parts": "oops"}}
            ],
            "usageMetadata": "not an object"
        });
        assert_eq!(extract(body).unwrap(), "Roadmap");
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        match extract(json!({"candidates": []})) {
            Err(LlmError::UnexpectedShape(raw)) => assert_eq!(raw, r#"{"candidates":[]}"#),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_extract_text_missing_parts() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert!(matches!(extract(body), Err(LlmError::UnexpectedShape(_))));
    }

    #[test]
    fn test_extract_text_candidates_not_a_list() {
        let body = json!({"candidates": {"content": {"parts": [{"text": "Roadmap"}]}}});
        assert!(matches!(extract(body), Err(LlmError::UnexpectedShape(_))));
    }

    #[test]
    fn test_extract_text_part_without_text() {
        let body = json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]});
        assert!(matches!(extract(body), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_unexpected_shape_dump_keeps_raw_key_order() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}, "candidates": []}"#;
        let body: Value = serde_json::from_str(raw).unwrap();
        match extract_text(raw, &body) {
            Err(LlmError::UnexpectedShape(dump)) => assert_eq!(dump, raw),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_shape_dump_is_truncated() {
        match extract(json!({"error": "x".repeat(500)})) {
            Err(LlmError::UnexpectedShape(raw)) => {
                assert_eq!(raw.chars().count(), RAW_DUMP_CHARS);
                assert!(raw.starts_with(r#"{"error":"xxx"#));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_parameters() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(
                |axum::extract::Path(model): axum::extract::Path<String>,
                 Query(query): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    assert_eq!(model, format!("{MODEL}:generateContent"));
                    assert_eq!(query.get("key").map(String::as_str), Some("test-key"));
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "Plan my path");
                    assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
                    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
                    assert!((temperature - 0.7).abs() < 1e-6);
                    Json(json!({
                        "candidates": [{"content": {"parts": [{"text": "Step 1: learn SQL"}]}}],
                        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
                    }))
                },
            ),
        );
        let base = spawn_stub(router).await;

        let client = GeminiClient::new("test-key".to_string(), base).unwrap();
        let text = client.generate("Plan my path").await.unwrap();
        assert_eq!(text, "Step 1: learn SQL");
    }

    #[tokio::test]
    async fn test_generate_reports_non_200_status() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let base = spawn_stub(router).await;

        let client = GeminiClient::new("test-key".to_string(), base).unwrap();
        match client.generate("prompt").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_reports_unreadable_error_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Promises 100 body bytes, sends 7, then hangs up.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .unwrap();
        });

        let client = GeminiClient::new("test-key".to_string(), format!("http://{addr}")).unwrap();
        match client.generate("prompt").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.starts_with("<unreadable body:"), "message was {message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base = spawn_stub(router).await;

        let client =
            GeminiClient::with_timeout("test-key".to_string(), base, Duration::from_millis(200))
                .unwrap();
        assert!(matches!(
            client.generate("prompt").await,
            Err(LlmError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json_body() {
        let router = Router::new().route("/v1beta/models/:model", post(|| async { "not json" }));
        let base = spawn_stub(router).await;

        let client = GeminiClient::new("test-key".to_string(), base).unwrap();
        assert!(matches!(
            client.generate("prompt").await,
            Err(LlmError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        // Bind then drop so the port is closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            GeminiClient::new("super-secret".to_string(), format!("http://{addr}")).unwrap();
        match client.generate("prompt").await {
            Err(err @ LlmError::Http(_)) => assert!(!err.to_string().contains("super-secret")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
