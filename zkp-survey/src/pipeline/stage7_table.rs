//! Stage 7: Build the project comparison table
//!
//! Turns the per-project extraction answers into one flat table with a
//! `project_name` column and one column per agreed dimension, then writes:
//!
//! - `project_comparison_dimensions.{parquet,xlsx}`: every project
//! - `project_comparison_dimensions_filtered.{parquet,xlsx}`: projects with at
//!   least one dimension value
//! - `zkp_comparison.json`: the filtered table as an array of objects

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use zkp_survey_sdk::{log_artifact, log_file_saved};

use crate::pipeline::rows::project_names;
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::{columns, ExtractDimensions};
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::{
    read_parquet, string_column, string_frame, write_parquet, write_xlsx,
};
use crate::workflow_utils::{parse_json, StageOutcome};

/// One project with the agreed dimensions it has values for
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub project_name: String,
    /// `(dimension, details)` in agreed order
    pub values: Vec<(String, String)>,
}

impl ComparisonRow {
    /// Keep the agreed dimensions present in an extraction answer.
    ///
    /// An answer that is missing or does not parse contributes nothing.
    /// When a dimension appears twice, the last occurrence wins.
    pub fn from_extraction(project_name: String, agreed: &[String], extracted: Option<&str>) -> Self {
        let details: HashMap<String, String> = extracted
            .and_then(|text| parse_json::<ExtractDimensions>(text).ok())
            .map(|parsed| {
                parsed
                    .dimensions
                    .into_iter()
                    .map(|d| (d.dimension, d.details))
                    .collect()
            })
            .unwrap_or_default();

        let values = agreed
            .iter()
            .filter_map(|name| details.get(name).map(|value| (name.clone(), value.clone())))
            .collect();

        Self {
            project_name,
            values,
        }
    }

    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, value)| value.as_str())
    }

    /// Non-null fields, counting `project_name`
    pub fn populated_fields(&self) -> usize {
        1 + self.values.len()
    }
}

impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.populated_fields()))?;
        map.serialize_entry(columns::PROJECT_NAME, &self.project_name)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    /// Agreed dimension names, one column each
    pub dimensions: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Build from the extraction artifact.
    ///
    /// Repeated names in `agreed` collapse to their first occurrence.
    pub fn build(agreed: &[String], extracted: &DataFrame) -> Result<Self> {
        let mut dimensions: Vec<String> = Vec::with_capacity(agreed.len());
        for name in agreed {
            if name != columns::PROJECT_NAME && !dimensions.contains(name) {
                dimensions.push(name.clone());
            }
        }

        let answers = string_column(extracted, columns::EXTRACTED_DIMENSIONS)?;
        let rows = project_names(extracted)
            .into_iter()
            .zip(answers)
            .map(|(name, answer)| ComparisonRow::from_extraction(name, &dimensions, answer.as_deref()))
            .collect();

        Ok(Self { dimensions, rows })
    }

    /// Rows with more than one non-null field
    pub fn filtered(&self) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row.populated_fields() > 1)
                .cloned()
                .collect(),
        }
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.dimensions.len() + 1);
        frame_columns.push((
            columns::PROJECT_NAME.to_string(),
            self.rows
                .iter()
                .map(|row| Some(row.project_name.clone()))
                .collect(),
        ));
        for name in &self.dimensions {
            frame_columns.push((
                name.clone(),
                self.rows
                    .iter()
                    .map(|row| row.get(name).map(str::to_string))
                    .collect(),
            ));
        }
        string_frame(frame_columns)
    }

    /// Pretty-printed JSON array, one object per row
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.rows).context("Failed to serialise comparison table")
    }
}

pub async fn build_comparison_table(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    let input = ctx.paths.extracted_dimensions();
    if !input.exists() {
        return Ok(StageOutcome::skipped(format!(
            "{} not found",
            input.display()
        )));
    }
    let Some(agreed) = state.comparison_dimensions.as_ref() else {
        return Ok(StageOutcome::skipped("no agreed comparison dimensions"));
    };

    let extracted = read_parquet(&input)?;
    let table = ComparisonTable::build(&agreed.names(state.dimension_count), &extracted)?;
    let filtered = table.filtered();
    let stage = Stage::BuildTable.number();

    let mut full = table.to_frame()?;
    write_parquet(&mut full, &ctx.paths.comparison_table())?;
    write_xlsx(&full, &ctx.paths.comparison_sheet())?;
    log_artifact!(stage, ctx.paths.comparison_table().display(), "Comparison table");

    let mut kept = filtered.to_frame()?;
    write_parquet(&mut kept, &ctx.paths.filtered_table())?;
    write_xlsx(&kept, &ctx.paths.filtered_sheet())?;
    log_artifact!(
        stage,
        ctx.paths.filtered_table().display(),
        "Comparison table without empty rows"
    );

    let json_path = ctx.paths.comparison_json();
    tokio::fs::write(&json_path, filtered.to_json()?)
        .await
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    log_file_saved!(json_path.display());
    log_artifact!(stage, json_path.display(), "Comparison table as JSON");

    Ok(StageOutcome::completed(format!(
        "{} projects compared on {} dimensions ({} with values)",
        table.rows.len(),
        table.dimensions.len(),
        filtered.rows.len()
    )))
}
