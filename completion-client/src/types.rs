//! Request and response types for chat completions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON schema the model output must follow (OpenAI structured outputs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Schema name sent to the API
    pub name: String,
    /// JSON schema document
    pub schema: Value,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// A single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// User-role prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Structured output schema, if any
    pub response_schema: Option<ResponseSchema>,
}

impl CompletionRequest {
    /// Create a free-text request at temperature 0
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: 0.0,
            response_schema: None,
        }
    }

    /// Constrain the response to a JSON schema
    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Token usage reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

/// Completion returned by the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Message content; JSON text when a schema was requested
    pub content: String,
    pub usage: Option<TokenUsage>,
}
