//! Sequential batch execution over a Parquet artifact
//!
//! Every row-wise stage follows the same shape: read the input artifact, cut
//! it into fixed-size batches, transform each batch, write one partial file
//! per batch, pause, and finally concatenate the partial files into one
//! consolidated artifact. Batches run strictly one after another.

use anyhow::Result;
use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zkp_survey_sdk::{log_artifact, log_batch_complete, log_batch_start, log_progress};

use crate::workflow_utils::table::{batches, concat, read_parquet, write_parquet};

/// Context provided to each batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchContext {
    /// Stage number (for logging)
    pub stage: usize,
    /// Batch number (1-indexed)
    pub batch_number: usize,
    /// Total number of batches in this run
    pub total_batches: usize,
}

/// Per-batch work of a stage
#[async_trait]
pub trait BatchTransform: Send + Sync {
    async fn transform(&self, batch: DataFrame, ctx: BatchContext) -> Result<DataFrame>;
}

/// Naming scheme for the per-batch partial files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFiles {
    pub dir: PathBuf,
    pub prefix: String,
}

impl PartialFiles {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the partial file for a 1-indexed batch
    pub fn path(&self, batch_number: usize) -> PathBuf {
        self.dir
            .join(format!("{}{}.parquet", self.prefix, batch_number))
    }
}

/// One batched pass over an artifact
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub stage: usize,
    pub input: PathBuf,
    pub partials: PartialFiles,
    pub output: PathBuf,
    pub batch_size: usize,
    /// Pause after every batch
    pub delay: Duration,
    pub description: String,
}

/// What a batched pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub batches: usize,
    pub rows_in: usize,
    pub rows_out: usize,
    pub partial_files: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Run `transform` over every batch of `job.input`.
///
/// Fails on the first batch error; rows that merely got a sentinel answer are
/// not errors and are handled inside the transform.
pub async fn run_batched<T>(job: &BatchJob, transform: &T) -> Result<BatchSummary>
where
    T: BatchTransform + ?Sized,
{
    let input = read_parquet(&job.input)?;
    let rows_in = input.height();
    let slices = batches(&input, job.batch_size);
    let total = slices.len();
    let mut partial_files = Vec::with_capacity(total);

    for (idx, slice) in slices.into_iter().enumerate() {
        let ctx = BatchContext {
            stage: job.stage,
            batch_number: idx + 1,
            total_batches: total,
        };

        log_batch_start!(job.stage, ctx.batch_number, total, slice.height());
        log_progress!(ctx.batch_number, total, "batches");

        let mut output = transform.transform(slice, ctx).await?;
        let partial = job.partials.path(ctx.batch_number);
        write_parquet(&mut output, &partial)?;
        log_batch_complete!(job.stage, ctx.batch_number, partial.display());
        partial_files.push(partial);

        if !job.delay.is_zero() {
            tokio::time::sleep(job.delay).await;
        }
    }

    let mut combined = concat_partials(&partial_files)?;
    write_parquet(&mut combined, &job.output)?;
    log_artifact!(job.stage, job.output.display(), &job.description);

    Ok(BatchSummary {
        batches: total,
        rows_in,
        rows_out: combined.height(),
        partial_files,
        output: job.output.clone(),
    })
}

/// Read partial files back from disk and stack them in the given order
pub fn concat_partials(paths: &[PathBuf]) -> Result<DataFrame> {
    let frames = paths
        .iter()
        .map(|path| read_parquet(Path::new(path)))
        .collect::<Result<Vec<_>>>()?;
    concat(frames)
}
