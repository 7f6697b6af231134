//! Stage execution with automatic logging

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::error;
use zkp_survey_sdk::{
    log_stage_complete, log_stage_complete_console, log_stage_failed, log_stage_skipped,
    log_stage_start, log_stage_start_console, log_warning,
};

/// How a stage ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Completed { summary: String },
    /// Input was missing; the stage did nothing
    Skipped { reason: String },
    /// The stage hit an error and left its state untouched
    Failed { error: String },
}

impl StageOutcome {
    pub fn completed(summary: impl Into<String>) -> Self {
        Self::Completed {
            summary: summary.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Identity of a stage for logging
#[derive(Debug, Clone, Copy)]
pub struct StageInfo<'a> {
    pub number: usize,
    pub name: &'a str,
    pub description: &'a str,
    pub total_stages: usize,
}

/// Run one stage, logging start and end.
///
/// Errors never escape: they are logged and turned into
/// [`StageOutcome::Failed`] so the pipeline can move on.
pub async fn execute_stage<Fut>(info: StageInfo<'_>, work: Fut) -> StageOutcome
where
    Fut: Future<Output = Result<StageOutcome>>,
{
    log_stage_start!(info.number, info.name, info.total_stages);
    log_stage_start_console!(info.number, info.name, info.description);

    match work.await {
        Ok(StageOutcome::Skipped { reason }) => {
            log_warning!("{} skipped: {}", info.name, reason);
            log_stage_skipped!(info.number, info.name, &reason);
            StageOutcome::Skipped { reason }
        }
        Ok(outcome) => {
            log_stage_complete!(info.number, info.name);
            log_stage_complete_console!(info.number);
            outcome
        }
        Err(e) => {
            let message = format!("{:#}", e);
            error!(stage = info.number, error = %message, "Stage failed");
            eprintln!("Error in {}: {}", info.name, message);
            log_stage_failed!(info.number, info.name, &message);
            StageOutcome::Failed { error: message }
        }
    }
}
