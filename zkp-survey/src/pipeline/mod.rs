//! ZKP survey pipeline
//!
//! Classifies project READMEs as zero-knowledge-proof projects or not, mines
//! comparison dimensions from the ZKP projects, agrees on a common set and
//! builds a comparison table. Stages run in order against one data
//! directory and communicate through the artifacts they write there.

pub mod assistant;
pub mod cli;
pub mod paths;
pub mod prompts;
pub mod report;
pub mod rows;
pub mod stage0_load;
pub mod stage1_filter;
pub mod stage2_classify;
pub mod stage3_curate;
pub mod stage4_mine;
pub mod stage5_reconcile;
pub mod stage6_extract;
pub mod stage7_table;
pub mod state;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use assistant::{Completion, SurveyAssistant};
pub use paths::ArtifactPaths;
pub use report::PipelineReport;
pub use state::WorkflowState;
pub use types::{CommonDimensions, Dimensions, ExtractDimensions};
pub use workflow::{run_pipeline, PipelineConfig, PipelineRun, Stage};
