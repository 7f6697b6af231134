//! Stage events and console logging shared by the zkp-survey pipeline.
//!
//! Two kinds of output are provided:
//! - [`StageLog`] events, emitted to stderr as single JSON lines prefixed with
//!   [`EVENT_PREFIX`] so that a supervising process can follow a run.
//! - Coloured console macros for the human reading the terminal.

use serde::{Deserialize, Serialize};

/// Prefix marking a structured event line on stderr
pub const EVENT_PREFIX: &str = "__ZKP_EVENT__:";

/// Structured logging events emitted by pipeline stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageLog {
    /// Stage started
    StageStarted {
        stage: usize,
        name: String,
        total_stages: usize,
    },
    /// Stage completed
    StageCompleted { stage: usize, name: String },
    /// Stage did nothing because its input was unavailable
    StageSkipped {
        stage: usize,
        name: String,
        reason: String,
    },
    /// Stage aborted; the pipeline carries on with the next stage
    StageFailed {
        stage: usize,
        name: String,
        error: String,
    },
    /// Batch of rows started
    BatchStarted {
        stage: usize,
        batch: usize,
        total_batches: usize,
        rows: usize,
    },
    /// Batch of rows written to its partial file
    BatchCompleted {
        stage: usize,
        batch: usize,
        file_path: String,
    },
    /// A single row got a sentinel instead of a model answer
    ItemDegraded {
        stage: usize,
        item: String,
        outcome: String,
    },
    /// Artifact written to disk
    ArtifactWritten {
        stage: usize,
        file_path: String,
        description: String,
    },
}

impl StageLog {
    /// Render the event as a prefixed JSON line
    pub fn to_line(&self) -> Option<String> {
        serde_json::to_string(self)
            .ok()
            .map(|json| format!("{}{}", EVENT_PREFIX, json))
    }

    /// Parse a line previously produced by [`StageLog::to_line`]
    pub fn parse_line(line: &str) -> Option<StageLog> {
        let json = line.trim().strip_prefix(EVENT_PREFIX)?;
        serde_json::from_str(json).ok()
    }

    /// Emit this event to stderr
    pub fn emit(&self) {
        if let Some(line) = self.to_line() {
            use std::io::Write;
            eprintln!("{}", line);
            let _ = std::io::stderr().flush();
        }
    }
}

#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $name:expr, $total:expr) => {
        $crate::StageLog::StageStarted {
            stage: $stage,
            name: $name.to_string(),
            total_stages: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $name:expr) => {
        $crate::StageLog::StageCompleted {
            stage: $stage,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_skipped {
    ($stage:expr, $name:expr, $reason:expr) => {
        $crate::StageLog::StageSkipped {
            stage: $stage,
            name: $name.to_string(),
            reason: $reason.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_failed {
    ($stage:expr, $name:expr, $error:expr) => {
        $crate::StageLog::StageFailed {
            stage: $stage,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_batch_start {
    ($stage:expr, $batch:expr, $total:expr, $rows:expr) => {
        $crate::StageLog::BatchStarted {
            stage: $stage,
            batch: $batch,
            total_batches: $total,
            rows: $rows,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_batch_complete {
    ($stage:expr, $batch:expr, $path:expr) => {
        $crate::StageLog::BatchCompleted {
            stage: $stage,
            batch: $batch,
            file_path: $path.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_item_degraded {
    ($stage:expr, $item:expr, $outcome:expr) => {
        $crate::StageLog::ItemDegraded {
            stage: $stage,
            item: $item.to_string(),
            outcome: $outcome.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_artifact {
    ($stage:expr, $path:expr, $desc:expr) => {
        $crate::StageLog::ArtifactWritten {
            stage: $stage,
            file_path: $path.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Coloured output for the operator, complementing the StageLog events above.
// ============================================================================

/// Logs the start of a stage with a header and description.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_stage_start_console;
/// log_stage_start_console!(2, "Classifier", "Classify unlabelled READMEs");
/// ```
///
/// Outputs:
/// ```text
/// ═══ STAGE 2: Classifier ═══
/// Classify unlabelled READMEs
/// ```
#[macro_export]
macro_rules! log_stage_start_console {
    ($stage:expr, $title:expr, $description:expr) => {
        println!("\x1b[1;36m═══ STAGE {}: {} ═══\x1b[0m", $stage, $title);
        println!("\x1b[36m{}\x1b[0m", $description);
    };
}

/// Logs the completion of a stage.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_stage_complete_console;
/// log_stage_complete_console!(2);
/// ```
#[macro_export]
macro_rules! log_stage_complete_console {
    ($stage:expr) => {
        println!("\x1b[32m✓ Stage {} complete\x1b[0m", $stage);
    };
}

/// Logs progress of a batched operation.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_progress;
/// log_progress!(3, 5, "batches");
/// ```
///
/// Outputs:
/// ```text
/// Progress: 3/5 batches
/// ```
#[macro_export]
macro_rules! log_progress {
    ($current:expr, $total:expr, $item_type:expr) => {
        println!(
            "\x1b[36mProgress: {}/{} {}\x1b[0m",
            $current, $total, $item_type
        );
    };
}

/// Logs an informational message.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_info;
/// log_info!("Loading case_study_data.parquet");
/// let rows = 42;
/// log_info!("Loaded {} rows", rows);
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_warning;
/// log_warning!("No agreed dimensions, skipping extraction");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use zkp_survey_sdk::log_file_saved;
/// log_file_saved!("./zkp_comparison.json");
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}
