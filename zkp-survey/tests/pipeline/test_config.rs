//! Tests for CLI configuration

use clap::Parser;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use zkp_survey::pipeline::cli::{ask_dimension_count, resolve_dimension_count, Args};
use zkp_survey::pipeline::PipelineConfig;

#[test]
fn test_full_flag_set() {
    let args = Args::parse_from([
        "zkp-survey",
        "--dir",
        "survey",
        "--dimensions",
        "3",
        "--batch-size",
        "50",
        "--model",
        "gpt-4o-mini",
        "--classify-delay-secs",
        "0",
        "--batch-delay-secs",
        "1",
        "--token-limit",
        "4096",
        "--no-prompt",
    ]);
    assert!(args.no_prompt);

    let config = PipelineConfig::from(args);
    assert_eq!(config.data_dir, PathBuf::from("survey"));
    assert_eq!(config.dimension_count, 3);
    assert_eq!(config.batch_size, 50);
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.classify_delay, Duration::ZERO);
    assert_eq!(config.batch_delay, Duration::from_secs(1));
    assert_eq!(config.prompt_token_limit, 4096);
}

#[test]
fn test_non_numeric_dimensions_use_default() {
    let args = Args::parse_from(["zkp-survey", "-n", "many", "--model", "gpt-4o"]);
    assert_eq!(PipelineConfig::from(args).dimension_count, 6);
}

#[test]
fn test_zero_batch_size_is_raised_to_one() {
    let args = Args::parse_from(["zkp-survey", "--batch-size", "0", "--model", "gpt-4o"]);
    assert_eq!(PipelineConfig::from(args).batch_size, 1);
}

#[test]
fn test_prompted_answer_resolves_like_flag() {
    let mut output = Vec::new();
    let answer = ask_dimension_count(&mut Cursor::new("  8 \n"), &mut output);
    assert_eq!(resolve_dimension_count(answer.as_deref()), 8);

    let empty = ask_dimension_count(&mut Cursor::new(""), &mut output);
    assert_eq!(resolve_dimension_count(empty.as_deref()), 6);
}
