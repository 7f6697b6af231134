//! Row-level accessors shared by the stages

use anyhow::Result;
use polars::prelude::DataFrame;

use crate::pipeline::types::columns;
use crate::workflow_utils::table::string_column;

/// Project identifier per row: `full_name`, or `row <n>` when absent
pub fn project_names(df: &DataFrame) -> Vec<String> {
    let names = string_column(df, columns::FULL_NAME).ok();
    (0..df.height())
        .map(|idx| {
            names
                .as_ref()
                .and_then(|names| names.get(idx).cloned().flatten())
                .unwrap_or_else(|| format!("row {}", idx + 1))
        })
        .collect()
}

/// Text column with nulls read as empty strings
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(string_column(df, name)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
