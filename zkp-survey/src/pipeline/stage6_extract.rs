//! Stage 6: Fill in the agreed dimensions for every mined project
//!
//! Reads the mining artifact, which already holds only `yes` rows when
//! stage 4 produced it. Labels are not checked again here.

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use zkp_survey_sdk::log_item_degraded;

use crate::pipeline::assistant::{SurveyAssistant, NA};
use crate::pipeline::rows::{project_names, text_column};
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::{columns, CommonDimensions};
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::table::with_string_column;
use crate::workflow_utils::{run_batched, BatchContext, BatchJob, BatchTransform, StageOutcome};

struct Extractor<'a> {
    assistant: &'a SurveyAssistant,
    agreed: &'a CommonDimensions,
    dimension_count: usize,
}

#[async_trait]
impl<'a> BatchTransform for Extractor<'a> {
    async fn transform(&self, batch: DataFrame, ctx: BatchContext) -> Result<DataFrame> {
        let names = project_names(&batch);
        let readmes = text_column(&batch, columns::README)?;

        let mut extracted = Vec::with_capacity(readmes.len());
        for (name, readme) in names.iter().zip(&readmes) {
            let answer = self
                .assistant
                .extract_dimensions(readme, self.dimension_count, self.agreed)
                .await;
            if answer.text().is_none() {
                log_item_degraded!(ctx.stage, name, answer.kind());
            }
            extracted.push(Some(answer.into_artifact_value(NA)));
        }

        with_string_column(batch, columns::EXTRACTED_DIMENSIONS, extracted)
    }
}

pub async fn extract_dimensions(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    let input = ctx.paths.mined_dimensions();
    if !input.exists() {
        return Ok(StageOutcome::skipped(format!(
            "{} not found",
            input.display()
        )));
    }
    let Some(agreed) = state.comparison_dimensions.as_ref() else {
        return Ok(StageOutcome::skipped("no agreed comparison dimensions"));
    };

    let job = BatchJob {
        stage: Stage::Extract.number(),
        input,
        partials: ctx.paths.extraction_partials(),
        output: ctx.paths.extracted_dimensions(),
        batch_size: state.batch_size,
        delay: ctx.config.batch_delay,
        description: "Agreed dimension values per project".to_string(),
    };
    let extractor = Extractor {
        assistant: ctx.assistant,
        agreed,
        dimension_count: state.dimension_count,
    };
    let summary = run_batched(&job, &extractor).await?;

    Ok(StageOutcome::completed(format!(
        "Extracted dimensions for {} projects",
        summary.rows_out
    )))
}
