//! State carried from stage to stage within one run

use polars::prelude::DataFrame;

use crate::pipeline::types::CommonDimensions;

/// Rows per batch for every batched stage
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Dimensions mined and agreed on when none is configured
pub const DEFAULT_DIMENSION_COUNT: usize = 6;

/// Mutable carrier passed through every stage.
///
/// Nothing here is persisted; durable state lives in the artifacts.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    /// Source dataset, unset when loading failed
    pub dataset: Option<DataFrame>,
    pub batch_size: usize,
    pub dimension_count: usize,
    /// Agreed dimension set, set by the reconciler
    pub comparison_dimensions: Option<CommonDimensions>,
}

impl WorkflowState {
    pub fn new(batch_size: usize, dimension_count: usize) -> Self {
        Self {
            dataset: None,
            batch_size,
            dimension_count,
            comparison_dimensions: None,
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION_COUNT)
    }
}

/// Accept a dimension count only when it is a positive integer literal
pub fn parse_dimension_count(input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse::<usize>().ok().filter(|count| *count > 0)
}
