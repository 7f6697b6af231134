//! Structured-output validation

use crate::error::ClientError;
use crate::types::ResponseSchema;
use jsonschema::JSONSchema;
use serde_json::Value;

/// Parse `content` as JSON and check it against `schema`.
///
/// Returns the parsed document so callers can avoid parsing twice.
pub fn validate_structured(content: &str, schema: &ResponseSchema) -> Result<Value, ClientError> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| ClientError::SchemaViolation {
            schema: schema.name.clone(),
            message: format!("content is not JSON: {}", e),
        })?;

    let compiled = JSONSchema::compile(&schema.schema).map_err(|e| ClientError::SchemaViolation {
        schema: schema.name.clone(),
        message: format!("invalid schema: {}", e),
    })?;

    let violations: Vec<String> = match compiled.validate(&document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };

    if !violations.is_empty() {
        return Err(ClientError::SchemaViolation {
            schema: schema.name.clone(),
            message: violations.join("; "),
        });
    }

    Ok(document)
}
