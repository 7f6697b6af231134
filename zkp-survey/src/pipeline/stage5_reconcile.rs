//! Stage 5: Agree on one set of comparison dimensions across all projects
//!
//! All candidate sets are concatenated into one prompt and the model picks
//! the shared dimension names. The result lives in
//! [`WorkflowState::comparison_dimensions`] and in `comparison_dimensions.json`.

use anyhow::{anyhow, Context, Result};
use zkp_survey_sdk::{log_artifact, log_file_saved, log_info};

use crate::pipeline::assistant::{Completion, TOKEN_LIMIT_EXCEEDED};
use crate::pipeline::state::WorkflowState;
use crate::pipeline::types::{columns, CommonDimensions, Dimensions};
use crate::pipeline::workflow::{Stage, StageContext};
use crate::workflow_utils::parse_json;
use crate::workflow_utils::table::{read_parquet, string_column};
use crate::workflow_utils::StageOutcome;

/// Join every candidate blob with no separator, skipping nulls
pub fn combine_candidates(candidates: &[Option<String>]) -> String {
    candidates.iter().flatten().map(String::as_str).collect()
}

/// Number of candidate dimensions across the blobs that parse as [`Dimensions`]
pub fn count_candidates(candidates: &[Option<String>]) -> usize {
    candidates
        .iter()
        .flatten()
        .filter_map(|text| parse_json::<Dimensions>(text).ok())
        .map(|parsed| parsed.dimensions.len())
        .sum()
}

pub async fn reconcile_dimensions(
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

    let mined = read_parquet(&input)?;
    let candidates = string_column(&mined, columns::DIMENSIONS_RAW)?;
    let combined = combine_candidates(&candidates);
    log_info!(
        "Reconciling {} candidates from {} projects into {} dimensions",
        count_candidates(&candidates),
        mined.height(),
        state.dimension_count
    );

    let text = match ctx
        .assistant
        .reconcile_dimensions(&combined, state.dimension_count)
        .await
    {
        Completion::Text(text) => text,
        other => {
            return Err(anyhow!(
                "reconciliation returned {}",
                other.into_artifact_value(TOKEN_LIMIT_EXCEEDED)
            ))
        }
    };

    let agreed: CommonDimensions =
        parse_json(&text).context("Reconciled dimensions are not valid CommonDimensions")?;

    let output = ctx.paths.comparison_dimensions();
    let json = serde_json::to_string_pretty(&agreed)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log_file_saved!(output.display());
    log_artifact!(
        Stage::Reconcile.number(),
        output.display(),
        "Agreed comparison dimensions"
    );

    let names = agreed.names(state.dimension_count).join(", ");
    state.comparison_dimensions = Some(agreed);

    Ok(StageOutcome::completed(format!("Agreed on: {}", names)))
}
