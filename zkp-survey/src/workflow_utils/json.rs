//! JSON helpers for model output stored in artifacts

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Parse JSON text into a typed structure, quoting the start of the input on failure
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text.trim()).with_context(|| {
        let preview: String = text.chars().take(80).collect();
        format!("Failed to parse JSON (starts with {:?})", preview)
    })
}
