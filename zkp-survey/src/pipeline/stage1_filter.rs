//! Stage 1: Keep the projects that have no label yet

use anyhow::Result;
use polars::prelude::DataFrame;
use zkp_survey_sdk::{log_artifact, log_file_saved};

use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::columns;
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::{filter_rows, string_column, write_parquet};
use crate::workflow_utils::StageOutcome;

/// Rows whose `label` is null, columns unchanged
pub fn select_unlabelled(dataset: &DataFrame) -> Result<DataFrame> {
    let mask: Vec<bool> = string_column(dataset, columns::LABEL)?
        .iter()
        .map(Option::is_none)
        .collect();
    filter_rows(dataset, &mask)
}

pub async fn filter_unlabelled(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    let Some(dataset) = state.dataset.as_ref() else {
        return Ok(StageOutcome::skipped("no dataset loaded"));
    };

    let mut unlabelled = select_unlabelled(dataset)?;
    let output = ctx.paths.unlabelled();
    write_parquet(&mut unlabelled, &output)?;
    log_file_saved!(output.display());
    log_artifact!(
        Stage::Filter.number(),
        output.display(),
        "Projects without a label"
    );

    Ok(StageOutcome::completed(format!(
        "{} of {} projects unlabelled",
        unlabelled.height(),
        dataset.height()
    )))
}
