//! Stage 0: Load the source dataset
//!
//! Reads `case_study_data.parquet` into memory. Every later stage that needs
//! the dataset checks for it and skips itself when loading did not succeed.

use anyhow::Result;
use zkp_survey_sdk::log_info;

use crate::pipeline::state::WorkflowState;
use crate::pipeline::workflow::StageContext;
use crate::workflow_utils::table::read_parquet;
use crate::workflow_utils::StageOutcome;

pub async fn load_dataset(
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    let source = ctx.paths.source();
    if !source.exists() {
        return Ok(StageOutcome::skipped(format!(
            "source dataset {} not found",
            source.display()
        )));
    }

    let dataset = read_parquet(&source)?;
    let rows = dataset.height();
    log_info!("Loaded {} projects from {}", rows, source.display());
    state.dataset = Some(dataset);

    Ok(StageOutcome::completed(format!("Loaded {} rows", rows)))
}
