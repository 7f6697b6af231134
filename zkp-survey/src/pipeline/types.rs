//! Data structures exchanged with the completion service
//!
//! Each structured request has a matching response type and JSON schema:
//!
//! | Request      | Type                  | Entry fields               |
//! |--------------|-----------------------|----------------------------|
//! | mining       | [`Dimensions`]        | `dimension`, `description` |
//! | reconcile    | [`CommonDimensions`]  | `dimension`                |
//! | extraction   | [`ExtractDimensions`] | `dimension`, `details`     |

use completion_client::ResponseSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Column names used by the pipeline artifacts
pub mod columns {
    pub const FULL_NAME: &str = "full_name";
    pub const README: &str = "readme";
    pub const LABEL: &str = "label";
    pub const RAW_LABEL: &str = "raw_label";
    pub const DIMENSIONS_RAW: &str = "dimensions_raw";
    pub const EXTRACTED_DIMENSIONS: &str = "extracted_dimensions";
    pub const PROJECT_NAME: &str = "project_name";
}

/// Candidate dimension proposed for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub dimension: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub dimensions: Vec<Dimension>,
}

/// Dimension name chosen for cross-project comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonDimension {
    pub dimension: String,
}

/// The agreed dimension set produced by reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonDimensions {
    pub dimensions: Vec<CommonDimension>,
}

impl CommonDimensions {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimensions: names
                .into_iter()
                .map(|name| CommonDimension {
                    dimension: name.into(),
                })
                .collect(),
        }
    }

    /// The first `count` names, in the order the model returned them
    pub fn names(&self, count: usize) -> Vec<String> {
        self.dimensions
            .iter()
            .take(count)
            .map(|d| d.dimension.clone())
            .collect()
    }

    /// Serialised form used in prompts and artifacts
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"dimensions\":[]}"))
    }
}

/// Concrete value of an agreed dimension for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractDimension {
    pub dimension: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractDimensions {
    pub dimensions: Vec<ExtractDimension>,
}

fn list_schema(name: &str, fields: &[&str]) -> ResponseSchema {
    let properties: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "string" })))
        .collect();

    ResponseSchema::new(
        name,
        json!({
            "type": "object",
            "properties": {
                "dimensions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": properties,
                        "required": fields,
                        "additionalProperties": false
                    }
                }
            },
            "required": ["dimensions"],
            "additionalProperties": false
        }),
    )
}

pub fn dimensions_schema() -> ResponseSchema {
    list_schema("Dimensions", &["dimension", "description"])
}

pub fn common_dimensions_schema() -> ResponseSchema {
    list_schema("CommonDimensions", &["dimension"])
}

pub fn extract_dimensions_schema() -> ResponseSchema {
    list_schema("ExtractDimensions", &["dimension", "details"])
}
