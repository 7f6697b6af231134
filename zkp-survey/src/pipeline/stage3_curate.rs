//! Stage 3: Reduce free-text classifications to a label

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;

use crate::pipeline::assistant::NA;
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::columns;
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::{string_column, with_string_column};
use crate::workflow_utils::{run_batched, BatchContext, BatchJob, BatchTransform, StageOutcome};

/// Label for one raw answer: the text before the first comma, trimmed and
/// lowercased.
///
/// Colons are not separators, so `"NO: reason"` becomes `"no: reason"`.
pub fn curate_label(raw: &str) -> String {
    let mut segments: Vec<&str> = raw.split(',').collect();
    // split() yields at least one segment, so neither fallback below is taken
    if segments.is_empty() {
        segments = raw.split(':').collect();
    }
    match segments.first() {
        Some(first) => first.trim().to_lowercase(),
        None => NA.to_string(),
    }
}

struct Curator;

#[async_trait]
impl BatchTransform for Curator {
    async fn transform(&self, batch: DataFrame, _ctx: BatchContext) -> Result<DataFrame> {
        let labels = string_column(&batch, columns::RAW_LABEL)?
            .into_iter()
            .map(|raw| Some(raw.map_or_else(|| NA.to_string(), |raw| curate_label(&raw))))
            .collect();
        with_string_column(batch, columns::LABEL, labels)
    }
}

pub async fn curate_predictions(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    if state.dataset.is_none() {
        return Ok(StageOutcome::skipped("no dataset loaded"));
    }
    let input = ctx.paths.predictions();
    if !input.exists() {
        return Ok(StageOutcome::skipped(format!(
            "{} not found",
            input.display()
        )));
    }

    let job = BatchJob {
        stage: Stage::Curate.number(),
        input,
        partials: ctx.paths.curation_partials(),
        output: ctx.paths.curated(),
        batch_size: state.batch_size,
        delay: ctx.config.batch_delay,
        description: "Curated ZKP labels".to_string(),
    };
    let summary = run_batched(&job, &Curator).await?;

    Ok(StageOutcome::completed(format!(
        "Curated {} labels",
        summary.rows_out
    )))
}
