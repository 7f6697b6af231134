//! Stage 4: Ask each ZKP project for candidate comparison dimensions
//!
//! Only rows curated as `yes` are sent. The structured answer is stored as
//! JSON text in `dimensions_raw`.

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use zkp_survey_sdk::log_item_degraded;

use crate::pipeline::assistant::{SurveyAssistant, NA};
use crate::pipeline::rows::{project_names, text_column};
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::columns;
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::{filter_rows, string_column, with_string_column};
use crate::workflow_utils::{run_batched, BatchContext, BatchJob, BatchTransform, StageOutcome};

/// Label that marks a project as in scope for comparison
pub const ZKP_LABEL: &str = "yes";

/// Rows labelled `yes`
pub fn select_zkp_projects(batch: &DataFrame) -> Result<DataFrame> {
    let mask: Vec<bool> = string_column(batch, columns::LABEL)?
        .iter()
        .map(|label| label.as_deref() == Some(ZKP_LABEL))
        .collect();
    filter_rows(batch, &mask)
}

struct Miner<'a> {
    assistant: &'a SurveyAssistant,
    dimension_count: usize,
}

#[async_trait]
impl<'a> BatchTransform for Miner<'a> {
    async fn transform(&self, batch: DataFrame, ctx: BatchContext) -> Result<DataFrame> {
        let projects = select_zkp_projects(&batch)?;
        let names = project_names(&projects);
        let readmes = text_column(&projects, columns::README)?;

        let mut proposals = Vec::with_capacity(readmes.len());
        for (name, readme) in names.iter().zip(&readmes) {
            let answer = self
                .assistant
                .propose_dimensions(readme, self.dimension_count)
                .await;
            if answer.text().is_none() {
                log_item_degraded!(ctx.stage, name, answer.kind());
            }
            proposals.push(Some(answer.into_artifact_value(NA)));
        }

        with_string_column(projects, columns::DIMENSIONS_RAW, proposals)
    }
}

pub async fn mine_dimensions(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    if state.dataset.is_none() {
        return Ok(StageOutcome::skipped("no dataset loaded"));
    }
    let input = ctx.paths.curated();
    if !input.exists() {
        return Ok(StageOutcome::skipped(format!(
            "{} not found",
            input.display()
        )));
    }

    let job = BatchJob {
        stage: Stage::Mine.number(),
        input,
        partials: ctx.paths.mining_partials(),
        output: ctx.paths.mined_dimensions(),
        batch_size: state.batch_size,
        delay: ctx.config.batch_delay,
        description: "Candidate dimensions per ZKP project".to_string(),
    };
    let miner = Miner {
        assistant: ctx.assistant,
        dimension_count: state.dimension_count,
    };
    let summary = run_batched(&job, &miner).await?;

    Ok(StageOutcome::completed(format!(
        "Mined dimensions for {} of {} projects",
        summary.rows_out, summary.rows_in
    )))
}
