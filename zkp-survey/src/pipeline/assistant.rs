//! The single completion client used by every stage
//!
//! [`SurveyAssistant`] is built once in `main` and lent to each stage. It
//! renders prompts, enforces the prompt token budget, and turns every call
//! into a tagged [`Completion`] so that stages never see an error from an
//! individual row.

use completion_client::{
    ClientError, CompletionRequest, CompletionService, ResponseSchema, TokenCounter,
};
use tracing::{debug, warn};

use crate::pipeline::prompts::{
    classification_prompt, extraction_prompt, mining_prompt, reconcile_prompt,
};
use crate::pipeline::types::{
    common_dimensions_schema, dimensions_schema, extract_dimensions_schema, CommonDimensions,
};

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Prompts above this many tokens are not sent
pub const DEFAULT_PROMPT_TOKEN_LIMIT: usize = 128_000;

/// Persisted value for a prompt over budget
pub const NA: &str = "na";

/// Persisted value for a failed request
pub const ERROR: &str = "error";

/// Persisted value for an over-budget reconciliation prompt
pub const TOKEN_LIMIT_EXCEEDED: &str = "token_limit_exceeded";

/// Result of one model request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Model answer (JSON text for structured requests)
    Text(String),
    TokenLimitExceeded { tokens: usize, limit: usize },
    ServiceError(String),
}

impl Completion {
    pub fn text(&self) -> Option<&str> {
        match self {
            Completion::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Value written to an artifact column; `limit_sentinel` stands in for
    /// an over-budget prompt
    pub fn into_artifact_value(self, limit_sentinel: &str) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::TokenLimitExceeded { .. } => limit_sentinel.to_string(),
            Completion::ServiceError(_) => ERROR.to_string(),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Completion::Text(_) => "text",
            Completion::TokenLimitExceeded { .. } => "token_limit_exceeded",
            Completion::ServiceError(_) => "service_error",
        }
    }
}

pub struct SurveyAssistant {
    service: Box<dyn CompletionService>,
    counter: TokenCounter,
    model: String,
    prompt_token_limit: usize,
}

impl SurveyAssistant {
    pub fn new(
        service: Box<dyn CompletionService>,
        model: impl Into<String>,
        prompt_token_limit: usize,
    ) -> Result<Self, ClientError> {
        let model = model.into();
        let counter = TokenCounter::for_model(&model)?;
        Ok(Self {
            service,
            counter,
            model,
            prompt_token_limit,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask whether a README describes a ZKP project (free text answer)
    pub async fn classify_readme(&self, readme: &str) -> Completion {
        self.request(classification_prompt(readme), None).await
    }

    /// Ask for `count` candidate comparison dimensions for one project
    pub async fn propose_dimensions(&self, readme: &str, count: usize) -> Completion {
        self.request(mining_prompt(readme, count), Some(dimensions_schema()))
            .await
    }

    /// Ask for `count` dimension names shared across all candidates
    pub async fn reconcile_dimensions(&self, combined: &str, count: usize) -> Completion {
        self.request(
            reconcile_prompt(combined, count),
            Some(common_dimensions_schema()),
        )
        .await
    }

    /// Ask for the values of the agreed dimensions for one project
    pub async fn extract_dimensions(
        &self,
        readme: &str,
        count: usize,
        agreed: &CommonDimensions,
    ) -> Completion {
        self.request(
            extraction_prompt(readme, count, agreed),
            Some(extract_dimensions_schema()),
        )
        .await
    }

    async fn request(&self, prompt: String, schema: Option<ResponseSchema>) -> Completion {
        let tokens = self.counter.count(&prompt);
        if tokens > self.prompt_token_limit {
            warn!(tokens, limit = self.prompt_token_limit, "Prompt over token budget, not sent");
            return Completion::TokenLimitExceeded {
                tokens,
                limit: self.prompt_token_limit,
            };
        }

        let mut request = CompletionRequest::new(self.model.as_str(), prompt);
        if let Some(schema) = schema {
            request = request.with_schema(schema);
        }

        debug!(tokens, model = %self.model, "Requesting completion");
        match self.service.complete(&request).await {
            Ok(response) => Completion::Text(response.content),
            Err(e) => {
                warn!(error = %e, "Completion request failed");
                Completion::ServiceError(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for SurveyAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyAssistant")
            .field("model", &self.model)
            .field("prompt_token_limit", &self.prompt_token_limit)
            .finish_non_exhaustive()
    }
}
