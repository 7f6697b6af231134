//! Workflow orchestration for the survey pipeline
//!
//! [`run_pipeline`] runs the eight stages in order against one data
//! directory. A stage that fails or lacks its input is recorded and the run
//! moves on; later stages decide for themselves whether they can proceed.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use zkp_survey_sdk::log_info;

use crate::pipeline::{
    assistant::{SurveyAssistant, DEFAULT_MODEL, DEFAULT_PROMPT_TOKEN_LIMIT},
    paths::ArtifactPaths,
    report::PipelineReport,
    stage0_load::load_dataset,
    stage1_filter::filter_unlabelled,
    stage2_classify::classify_projects,
    stage3_curate::curate_predictions,
    stage4_mine::mine_dimensions,
    stage5_reconcile::reconcile_dimensions,
    stage6_extract::extract_dimensions,
    stage7_table::build_comparison_table,
    state::{WorkflowState, DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION_COUNT},
};
use crate::workflow_utils::{execute_stage, StageInfo, StageOutcome};

/// Configuration for one pipeline run
///
/// # Examples
///
/// ```no_run
/// use zkp_survey::pipeline::PipelineConfig;
///
/// let config = PipelineConfig {
///     data_dir: "./survey".into(),
///     dimension_count: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the source dataset and every artifact
    pub data_dir: PathBuf,
    /// Dimensions to mine, agree on and extract
    pub dimension_count: usize,
    /// Rows per batch
    pub batch_size: usize,
    pub model: String,
    /// Pause after each classification batch
    pub classify_delay: Duration,
    /// Pause after each curation, mining and extraction batch
    pub batch_delay: Duration,
    pub prompt_token_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            dimension_count: DEFAULT_DIMENSION_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            model: DEFAULT_MODEL.to_string(),
            classify_delay: Duration::from_secs(3),
            batch_delay: Duration::from_secs(2),
            prompt_token_limit: DEFAULT_PROMPT_TOKEN_LIMIT,
        }
    }
}

/// The pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Load,
    Filter,
    Classify,
    Curate,
    Mine,
    Reconcile,
    Extract,
    BuildTable,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Load,
        Stage::Filter,
        Stage::Classify,
        Stage::Curate,
        Stage::Mine,
        Stage::Reconcile,
        Stage::Extract,
        Stage::BuildTable,
    ];

    pub fn number(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Load => "Loader",
            Stage::Filter => "Filter",
            Stage::Classify => "Classifier",
            Stage::Curate => "Label Curator",
            Stage::Mine => "Dimension Miner",
            Stage::Reconcile => "Dimension Reconciler",
            Stage::Extract => "Dimension Extractor",
            Stage::BuildTable => "Table Builder",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Load => "Load the source dataset",
            Stage::Filter => "Select projects without a label",
            Stage::Classify => "Classify READMEs as ZKP or not",
            Stage::Curate => "Reduce classifications to labels",
            Stage::Mine => "Propose comparison dimensions per ZKP project",
            Stage::Reconcile => "Agree on a common dimension set",
            Stage::Extract => "Extract agreed dimensions per project",
            Stage::BuildTable => "Build the comparison table",
        }
    }

    fn info(self) -> StageInfo<'static> {
        StageInfo {
            number: self.number(),
            name: self.name(),
            description: self.description(),
            total_stages: Stage::ALL.len(),
        }
    }
}

/// Shared, read-only inputs handed to every stage
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub config: &'a PipelineConfig,
    pub paths: &'a ArtifactPaths,
    pub assistant: &'a SurveyAssistant,
}

/// Final state and report of a run
#[derive(Debug)]
pub struct PipelineRun {
    pub state: WorkflowState,
    pub report: PipelineReport,
}

async fn run_stage(
    stage: Stage,
    state: &mut WorkflowState,
    ctx: &StageContext<'_>,
) -> Result<StageOutcome> {
    match stage {
        Stage::Load => load_dataset(state, ctx).await,
        Stage::Filter => filter_unlabelled(state, ctx).await,
        Stage::Classify => classify_projects(state, ctx).await,
        Stage::Curate => curate_predictions(state, ctx).await,
        Stage::Mine => mine_dimensions(state, ctx).await,
        Stage::Reconcile => reconcile_dimensions(state, ctx).await,
        Stage::Extract => extract_dimensions(state, ctx).await,
        Stage::BuildTable => build_comparison_table(state, ctx).await,
    }
}

/// Run every stage in order and write `pipeline_report.yaml`.
///
/// Stage failures are recorded in the report, not returned; only failing to
/// write the report itself is an error.
pub async fn run_pipeline(
    config: &PipelineConfig,
    assistant: &SurveyAssistant,
) -> Result<PipelineRun> {
    let paths = ArtifactPaths::new(&config.data_dir);
    let ctx = StageContext {
        config,
        paths: &paths,
        assistant,
    };
    let mut state = WorkflowState::new(config.batch_size, config.dimension_count);
    let mut report = PipelineReport::start(config);

    println!("{}", "=".repeat(80));
    println!("ZKP SURVEY PIPELINE");
    println!("{}", "=".repeat(80));
    log_info!(
        "Data directory: {} | dimensions: {} | batch size: {} | model: {}",
        paths.root().display(),
        config.dimension_count,
        config.batch_size,
        assistant.model()
    );

    for stage in Stage::ALL {
        let outcome = execute_stage(stage.info(), run_stage(stage, &mut state, &ctx)).await;
        report.record(stage, outcome);
    }

    report.finish(&paths);
    report.save(&paths.report()).await?;

    println!("{}", "=".repeat(80));
    println!("{}", report.summary_line());
    println!("{}", "=".repeat(80));

    Ok(PipelineRun { state, report })
}
