//! CLI argument parsing for the survey pipeline

use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::assistant::{DEFAULT_MODEL, DEFAULT_PROMPT_TOKEN_LIMIT};
use crate::pipeline::state::{parse_dimension_count, DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION_COUNT};
use crate::pipeline::workflow::PipelineConfig;

/// ZKP survey CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "zkp-survey",
    about = "Classify project READMEs as ZKP or not and build a comparison table of the ZKP projects"
)]
pub struct Args {
    /// Directory holding case_study_data.parquet; all artifacts are written here
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Number of comparison dimensions (positive integer, anything else means 6)
    #[arg(short = 'n', long)]
    pub dimensions: Option<String>,

    /// Rows per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Model identifier (falls back to OPENAI_MODEL, then gpt-4o)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Seconds to pause after each classification batch
    #[arg(long, default_value_t = 3)]
    pub classify_delay_secs: u64,

    /// Seconds to pause after each curation, mining and extraction batch
    #[arg(long, default_value_t = 2)]
    pub batch_delay_secs: u64,

    /// Prompts above this many tokens are not sent
    #[arg(long, default_value_t = DEFAULT_PROMPT_TOKEN_LIMIT)]
    pub token_limit: usize,

    /// Never ask for the dimension count on stdin
    #[arg(long)]
    pub no_prompt: bool,
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        let model = args
            .model
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            data_dir: args.dir,
            dimension_count: resolve_dimension_count(args.dimensions.as_deref()),
            batch_size: args.batch_size.max(1),
            model,
            classify_delay: Duration::from_secs(args.classify_delay_secs),
            batch_delay: Duration::from_secs(args.batch_delay_secs),
            prompt_token_limit: args.token_limit,
        }
    }
}

/// Parsed dimension count, or the default for missing or invalid input
pub fn resolve_dimension_count(input: Option<&str>) -> usize {
    input
        .and_then(parse_dimension_count)
        .unwrap_or(DEFAULT_DIMENSION_COUNT)
}

/// Ask once for the dimension count and return the raw answer
pub fn ask_dimension_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Option<String> {
    write!(
        output,
        "Number of comparison dimensions [{}]: ",
        DEFAULT_DIMENSION_COUNT
    )
    .ok()?;
    output.flush().ok()?;

    let mut line = String::new();
    input.read_line(&mut line).ok()?;
    Some(line)
}
