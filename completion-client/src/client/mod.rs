//! Completion service seam and the OpenAI-compatible HTTP client
//!
//! [`CompletionService`] is the only thing pipeline code depends on. The
//! HTTP client is built once at start-up and passed around by reference:
//!
//! ```text
//! main ──► OpenAiClient::new(ClientConfig::from_env()?)
//!            │
//!            └──► &dyn CompletionService ──► every stage request
//! ```
//!
//! Request bodies and response parsing are plain functions
//! ([`build_request_body`], [`parse_response`]) so they can be tested without
//! a network.

use crate::error::ClientError;
use crate::schema::validate_structured;
use crate::types::{CompletionRequest, CompletionResponse, ResponseSchema, TokenUsage};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default endpoint root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Anything that can answer a [`CompletionRequest`]
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ClientError>;
}

/// Connection settings for [`OpenAiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL`
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::Config {
                message: "OPENAI_API_KEY is not set".to_string(),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        Ok(config)
    }
}

/// Client for any endpoint following the OpenAI chat completions format
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = build_request_body(request);

        debug!(url = %url, model = %request.model, prompt_len = request.prompt.len(), "Sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| ClientError::ResponseParse {
            message: format!("Invalid JSON: {}", e),
        })?;

        parse_response(&json, request.response_schema.as_ref())
    }
}

/// Build the JSON body for a chat completions call
pub fn build_request_body(request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": [
            { "role": "user", "content": request.prompt }
        ],
        "temperature": request.temperature,
    });

    if let Some(schema) = &request.response_schema {
        body["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": schema.name,
                "schema": schema.schema,
                "strict": true,
            }
        });
    }

    body
}

/// Extract the first choice from a chat completions response.
///
/// When `schema` is given the content must be JSON matching it.
pub fn parse_response(
    json: &Value,
    schema: Option<&ResponseSchema>,
) -> Result<CompletionResponse, ClientError> {
    let message = json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| ClientError::ResponseParse {
            message: "response has no choices".to_string(),
        })?;

    if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
        return Err(ClientError::Refusal {
            message: refusal.to_string(),
        });
    }

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::ResponseParse {
            message: "message has no text content".to_string(),
        })?
        .to_string();

    if let Some(schema) = schema {
        validate_structured(&content, schema)?;
    }

    let usage = json.get("usage").map(|usage| TokenUsage {
        prompt_tokens: usage
            .get("prompt_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize,
        completion_tokens: usage
            .get("completion_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize,
    });

    Ok(CompletionResponse { content, usage })
}
