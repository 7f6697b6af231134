//! Run report written to `pipeline_report.yaml`

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;
use zkp_survey_sdk::log_file_saved;

use crate::pipeline::paths::ArtifactPaths;
use crate::pipeline::workflow::{PipelineConfig, Stage};
use crate::workflow_utils::StageOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub number: usize,
    pub name: String,
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub data_dir: String,
    pub model: String,
    pub dimension_count: usize,
    pub batch_size: usize,
    pub classify_delay_secs: u64,
    pub batch_delay_secs: u64,
    pub prompt_token_limit: usize,
    pub stages: Vec<StageRecord>,
    /// Consolidated artifacts present when the run finished
    pub artifacts: Vec<String>,
}

impl PipelineReport {
    pub fn start(config: &PipelineConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
            finished_at: None,
            data_dir: config.data_dir.display().to_string(),
            model: config.model.clone(),
            dimension_count: config.dimension_count,
            batch_size: config.batch_size,
            classify_delay_secs: config.classify_delay.as_secs(),
            batch_delay_secs: config.batch_delay.as_secs(),
            prompt_token_limit: config.prompt_token_limit,
            stages: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        self.stages.push(StageRecord {
            number: stage.number(),
            name: stage.name().to_string(),
            outcome,
        });
    }

    pub fn finish(&mut self, paths: &ArtifactPaths) {
        self.finished_at = Some(Local::now());
        self.artifacts = [
            paths.unlabelled(),
            paths.predictions(),
            paths.curated(),
            paths.mined_dimensions(),
            paths.comparison_dimensions(),
            paths.extracted_dimensions(),
            paths.comparison_table(),
            paths.comparison_sheet(),
            paths.filtered_table(),
            paths.filtered_sheet(),
            paths.comparison_json(),
        ]
        .iter()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
        .collect();
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|record| record.number == stage.number())
            .map(|record| &record.outcome)
    }

    pub fn summary_line(&self) -> String {
        let (mut completed, mut skipped, mut failed) = (0, 0, 0);
        for record in &self.stages {
            match record.outcome {
                StageOutcome::Completed { .. } => completed += 1,
                StageOutcome::Skipped { .. } => skipped += 1,
                StageOutcome::Failed { .. } => failed += 1,
            }
        }
        format!(
            "Run {}: {} completed, {} skipped, {} failed",
            self.run_id, completed, skipped, failed
        )
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialise run report")?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log_file_saved!(path.display());
        Ok(())
    }
}
