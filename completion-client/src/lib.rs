//! Async client for OpenAI-compatible chat completions.
//!
//! The crate exposes one seam, [`CompletionService`], so callers can hold a
//! single client for the whole process and swap in a scripted implementation
//! under test. [`OpenAiClient`] is the HTTP implementation.
//!
//! # Example
//!
//! ```no_run
//! use completion_client::{ClientConfig, CompletionRequest, CompletionService, OpenAiClient};
//!
//! # async fn example() -> Result<(), completion_client::ClientError> {
//! let client = OpenAiClient::new(ClientConfig::from_env()?)?;
//! let request = CompletionRequest::new("gpt-4o", "Is this README about ZKPs? ...");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod schema;
pub mod tokens;
pub mod types;

pub use client::{ClientConfig, CompletionService, OpenAiClient};
pub use error::ClientError;
pub use schema::validate_structured;
pub use tokens::TokenCounter;
pub use types::{CompletionRequest, CompletionResponse, ResponseSchema, TokenUsage};
