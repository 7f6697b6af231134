/*
┌─────────────────────────────────────────────────────────────────────────────┐
│                           ZKP SURVEY PIPELINE                                │
└─────────────────────────────────────────────────────────────────────────────┘

  Stage 0: LOAD          case_study_data.parquet -> memory
  Stage 1: FILTER        rows without a label -> unlabelled_data.parquet
  Stage 2: CLASSIFY      README -> raw_label (batched, 3s pause)
                         -> final_zkp_predictions.parquet
  Stage 3: CURATE        raw_label -> label (batched, 2s pause)
                         -> curated_zkp_predictions.parquet
  Stage 4: MINE          label == yes -> dimensions_raw (batched, 2s pause)
                         -> zkp_projects_dimensions.parquet
  Stage 5: RECONCILE     all candidates -> one agreed set
                         -> comparison_dimensions.json
  Stage 6: EXTRACT       agreed set per project (batched, 2s pause)
                         -> zkp_predictions_extracted_dimensions.parquet
  Stage 7: TABLE         project_comparison_dimensions[_filtered].{parquet,xlsx}
                         zkp_comparison.json

  A stage whose input is missing is skipped; a stage that fails is recorded
  and the run moves on. Every run ends with pipeline_report.yaml.

ENVIRONMENT:

  OPENAI_API_KEY    required
  OPENAI_BASE_URL   optional, defaults to https://api.openai.com/v1
  OPENAI_MODEL      optional, overridden by --model
  RUST_LOG          tracing filter, defaults to warn

EXAMPLE COMMANDS:

  # Full run in ./survey, asking for the dimension count
  cargo run -- --dir ./survey

  # Non-interactive run with four dimensions
  cargo run -- --dir ./survey -n 4 --no-prompt

*/

use std::io::IsTerminal;

use clap::Parser;
use completion_client::{ClientConfig, OpenAiClient};
use tracing_subscriber::EnvFilter;
use zkp_survey::pipeline::{
    cli::{ask_dimension_count, Args},
    run_pipeline, PipelineConfig, SurveyAssistant,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = Args::parse();

    // The dimension count is settled once, before any stage runs
    if args.dimensions.is_none() && !args.no_prompt && std::io::stdin().is_terminal() {
        args.dimensions = ask_dimension_count(&mut std::io::stdin().lock(), &mut std::io::stdout());
    }

    let config: PipelineConfig = args.into();
    let client = OpenAiClient::new(ClientConfig::from_env()?)?;
    let assistant =
        SurveyAssistant::new(Box::new(client), config.model.clone(), config.prompt_token_limit)?;

    run_pipeline(&config, &assistant).await?;
    Ok(())
}
