// Survey pipeline module
pub mod pipeline;

// Shared batch, stage and table utilities
pub mod workflow_utils;
