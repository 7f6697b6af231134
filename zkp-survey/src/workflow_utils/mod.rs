//! Workflow utilities shared by the pipeline stages
//!
//! - **batch**: sequential batched passes over Parquet artifacts
//! - **stage**: stage-level logging and outcome capture
//! - **table**: Parquet/XLSX I/O and column helpers
//! - **json**: parsing model output stored as JSON text

pub mod batch;
pub mod json;
pub mod stage;
pub mod table;

pub use batch::{run_batched, BatchContext, BatchJob, BatchSummary, BatchTransform, PartialFiles};
pub use json::parse_json;
pub use stage::{execute_stage, StageInfo, StageOutcome};
