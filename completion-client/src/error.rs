//! Error types for the completion client

/// Errors raised while talking to a completion endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Client configuration error: {message}")]
    Config { message: String },

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Model refused the request: {message}")]
    Refusal { message: String },

    #[error("Response does not match schema '{schema}': {message}")]
    SchemaViolation { schema: String, message: String },

    #[error("Tokenizer unavailable: {message}")]
    Tokenizer { message: String },
}
