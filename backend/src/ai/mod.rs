//! AI trainer client
//!
//! The trainer is an external, possibly slow and possibly failing
//! completion service. Handlers only see the [`AiTrainer`] trait so the
//! chat flow can be exercised against a stub.

use crate::config::AiConfig;
use fitness_trainer_shared::ChatTurn;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI trainer is disabled")]
    Disabled,

    #[error("AI trainer timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("AI trainer returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("AI trainer returned an empty reply")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Request(err.to_string())
        }
    }
}

/// Text-generation collaborator used by the chat service
#[axum::async_trait]
pub trait AiTrainer: Send + Sync {
    /// Reply to a conversation; the last turn is the new user message
    async fn chat(&self, turns: &[ChatTurn]) -> Result<String, AiError>;

    /// Answer a single stand-alone prompt
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.chat(&[ChatTurn::user(prompt)]).await
    }
}

/// Build the trainer selected by configuration
pub fn trainer_from_config(config: &AiConfig) -> anyhow::Result<Arc<dyn AiTrainer>> {
    if !config.enabled {
        return Ok(Arc::new(DisabledTrainer));
    }
    Ok(Arc::new(OllamaTrainer::from_config(config)?))
}

/// Used when no AI backend is configured; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTrainer;

#[axum::async_trait]
impl AiTrainer for DisabledTrainer {
    async fn chat(&self, _turns: &[ChatTurn]) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
}

// ============================================================================
// Ollama chat API
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Sampling options forwarded with every request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for an Ollama-compatible `/api/chat` endpoint
#[derive(Debug, Clone)]
pub struct OllamaTrainer {
    client: Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
}

impl OllamaTrainer {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        options: GenerationOptions,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options,
        })
    }

    pub fn from_config(config: &AiConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.base_url,
            &config.model,
            GenerationOptions {
                temperature: config.temperature,
                num_predict: config.max_output_tokens,
            },
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[axum::async_trait]
impl AiTrainer for OllamaTrainer {
    async fn chat(&self, turns: &[ChatTurn]) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: turns
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.as_str(),
                    content: &turn.content,
                })
                .collect(),
            stream: false,
            options: self.options,
        };

        debug!(model = %self.model, turns = turns.len(), "Calling AI trainer");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                metrics::counter!("ai_requests_total", "outcome" => "transport_error").increment(1);
                AiError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "AI trainer returned an error");
            metrics::counter!("ai_requests_total", "outcome" => "api_error").increment(1);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .message
            .map(|m| m.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AiError::EmptyResponse)?;

        metrics::counter!("ai_requests_total", "outcome" => "ok").increment(1);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn trainer(base_url: &str, timeout: Duration) -> OllamaTrainer {
        OllamaTrainer::new(
            base_url,
            "test-model",
            GenerationOptions {
                temperature: 0.7,
                num_predict: 1000,
            },
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_chat_sends_turns_and_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "stream": false,
                "options": { "num_predict": 1000 },
                "messages": [
                    { "role": "user", "content": "persona" },
                    { "role": "assistant", "content": "hello" },
                    { "role": "user", "content": "Hi" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "test-model",
                "message": { "role": "assistant", "content": "  Let's warm up!  " },
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let turns = vec![
            ChatTurn::user("persona"),
            ChatTurn::assistant("hello"),
            ChatTurn::user("Hi"),
        ];
        let reply = trainer(&server.uri(), Duration::from_secs(5))
            .chat(&turns)
            .await
            .unwrap();

        assert_eq!(reply, "Let's warm up!");
    }

    #[tokio::test]
    async fn test_generate_sends_single_user_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "content": "Plan a week" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "Monday: squats" }
            })))
            .mount(&server)
            .await;

        let reply = trainer(&server.uri(), Duration::from_secs(5))
            .generate("Plan a week")
            .await
            .unwrap();
        assert_eq!(reply, "Monday: squats");
    }

    #[tokio::test]
    async fn test_error_payload_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "model not found" })),
            )
            .mount(&server)
            .await;

        let err = trainer(&server.uri(), Duration::from_secs(5))
            .chat(&[ChatTurn::user("Hi")])
            .await
            .unwrap_err();

        match err {
            AiError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_reply_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "   " }
            })))
            .mount(&server)
            .await;

        let err = trainer(&server.uri(), Duration::from_secs(5))
            .chat(&[ChatTurn::user("Hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_slow_trainer_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({ "message": { "content": "late" } })),
            )
            .mount(&server)
            .await;

        let err = trainer(&server.uri(), Duration::from_millis(200))
            .chat(&[ChatTurn::user("Hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Timeout));
    }

    #[tokio::test]
    async fn test_disabled_trainer_always_fails() {
        let trainer = trainer_from_config(&AiConfig::default()).unwrap();
        assert!(matches!(
            trainer.generate("anything").await,
            Err(AiError::Disabled)
        ));
    }
}
