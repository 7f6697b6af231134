//! Stage 2: Ask the model whether each unlabelled project is a ZKP project
//!
//! The answer is free text and lands verbatim in `raw_label`; curation into
//! a clean label happens in stage 3.

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use zkp_survey_sdk::log_item_degraded;

use crate::pipeline::assistant::{SurveyAssistant, NA};
use crate::pipeline::rows::{project_names, text_column};
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::columns;
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::with_string_column;
use crate::workflow_utils::{run_batched, BatchContext, BatchJob, BatchTransform, StageOutcome};

struct Classifier<'a> {
    assistant: &'a SurveyAssistant,
}

#[async_trait]
impl<'a> BatchTransform for Classifier<'a> {
    async fn transform(&self, batch: DataFrame, ctx: BatchContext) -> Result<DataFrame> {
        let names = project_names(&batch);
        let readmes = text_column(&batch, columns::README)?;

        let mut raw_labels = Vec::with_capacity(readmes.len());
        for (name, readme) in names.iter().zip(&readmes) {
            let answer = self.assistant.classify_readme(readme).await;
            if answer.text().is_none() {
                log_item_degraded!(ctx.stage, name, answer.kind());
            }
            raw_labels.push(Some(answer.into_artifact_value(NA)));
        }

        with_string_column(batch, columns::RAW_LABEL, raw_labels)
    }
}

pub async fn classify_projects(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    if state.dataset.is_none() {
        return Ok(StageOutcome::skipped("no dataset loaded"));
    }
    let input = ctx.paths.unlabelled();
    if !input.exists() {
        return Ok(StageOutcome::skipped(format!(
            "{} not found",
            input.display()
        )));
    }

    let job = BatchJob {
        stage: Stage::Classify.number(),
        input,
        partials: ctx.paths.classification_partials(),
        output: ctx.paths.predictions(),
        batch_size: state.batch_size,
        delay: ctx.config.classify_delay,
        description: "Raw ZKP classifications".to_string(),
    };
    let summary = run_batched(&job, &Classifier { assistant: ctx.assistant }).await?;

    Ok(StageOutcome::completed(format!(
        "Classified {} projects in {} batches",
        summary.rows_out, summary.batches
    )))
}
