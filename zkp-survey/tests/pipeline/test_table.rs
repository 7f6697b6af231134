//! Tests for the comparison table outputs

use super::common::{assistant, strings, test_config, FakeModel};
use calamine::{open_workbook, Reader, Xlsx};
use zkp_survey::pipeline::stage7_table::{build_comparison_table, ComparisonTable};
use zkp_survey::pipeline::workflow::StageContext;
use zkp_survey::pipeline::{ArtifactPaths, CommonDimensions, WorkflowState};
use zkp_survey::workflow_utils::table::{
    column_names, read_parquet, string_column, string_frame, write_parquet,
};
use zkp_survey::workflow_utils::StageOutcome;

const FULL_ANSWER: &str = r#"{"dimensions":[{"dimension":"language","details":"Rust"},{"dimension":"proof_system","details":"Groth16"}]}"#;
const PARTIAL_ANSWER: &str = r#"{"dimensions":[{"dimension":"license","details":"MIT"},{"dimension":"proof_system","details":"STARK"}]}"#;

fn write_extracted(paths: &ArtifactPaths) {
    let mut extracted = string_frame(vec![
        (
            "full_name".to_string(),
            strings(&[Some("a/full"), Some("b/partial"), Some("c/failed"), Some("d/unrelated")]),
        ),
        (
            "extracted_dimensions".to_string(),
            strings(&[
                Some(FULL_ANSWER),
                Some(PARTIAL_ANSWER),
                Some("error"),
                Some(r#"{"dimensions":[{"dimension":"license","details":"MIT"}]}"#),
            ]),
        ),
    ])
    .unwrap();
    write_parquet(&mut extracted, &paths.extracted_dimensions()).unwrap();
}

async fn build(dir: &std::path::Path, agreed: &[&str], count: usize) -> StageOutcome {
    let model = FakeModel::new(&[]);
    let assistant = assistant(&model);
    let config = test_config(dir, count);
    let paths = ArtifactPaths::new(dir);
    let ctx = StageContext {
        config: &config,
        paths: &paths,
        assistant: &assistant,
    };
    let mut state = WorkflowState::new(config.batch_size, count);
    state.comparison_dimensions = Some(CommonDimensions::from_names(agreed.iter().copied()));
    build_comparison_table(&mut state, &ctx).await.unwrap()
}

#[tokio::test]
async fn test_table_columns_are_project_name_and_agreed_names() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_extracted(&paths);

    let outcome = build(dir.path(), &["language", "proof_system", "consensus"], 2).await;
    assert!(outcome.is_completed());

    let table = read_parquet(&paths.comparison_table()).unwrap();
    assert_eq!(
        column_names(&table),
        vec!["project_name", "language", "proof_system"]
    );
    assert_eq!(table.height(), 4);
    assert_eq!(
        string_column(&table, "proof_system").unwrap(),
        strings(&[Some("Groth16"), Some("STARK"), None, None])
    );
}

#[tokio::test]
async fn test_filtered_rows_have_more_than_one_field() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_extracted(&paths);

    build(dir.path(), &["language", "proof_system"], 2).await;

    let filtered = read_parquet(&paths.filtered_table()).unwrap();
    assert_eq!(
        string_column(&filtered, "project_name").unwrap(),
        strings(&[Some("a/full"), Some("b/partial")])
    );
    for idx in 0..filtered.height() {
        let populated = column_names(&filtered)
            .iter()
            .filter(|name| string_column(&filtered, name).unwrap()[idx].is_some())
            .count();
        assert!(populated > 1);
    }

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.comparison_json()).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "project_name": "a/full", "language": "Rust", "proof_system": "Groth16" },
            { "project_name": "b/partial", "proof_system": "STARK" }
        ])
    );
}

#[tokio::test]
async fn test_workbooks_mirror_parquet_tables() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_extracted(&paths);

    build(dir.path(), &["language", "proof_system"], 2).await;

    let mut workbook: Xlsx<_> = open_workbook(paths.filtered_sheet()).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    assert_eq!(rows[0], vec!["project_name", "language", "proof_system"]);
    assert_eq!(rows[1], vec!["a/full", "Rust", "Groth16"]);
    assert_eq!(rows[2], vec!["b/partial", "", "STARK"]);
    assert_eq!(rows.len(), 3);

    let mut full: Xlsx<_> = open_workbook(paths.comparison_sheet()).unwrap();
    let full_range = full.worksheet_range("Sheet1").unwrap();
    assert_eq!(full_range.rows().count(), 5);
}

#[tokio::test]
async fn test_fewer_agreed_names_than_requested() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_extracted(&paths);

    let outcome = build(dir.path(), &["proof_system"], 6).await;
    assert!(outcome.is_completed());

    let table = read_parquet(&paths.comparison_table()).unwrap();
    assert_eq!(column_names(&table), vec!["project_name", "proof_system"]);
}

#[tokio::test]
async fn test_table_skips_without_agreed_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_extracted(&paths);
    let model = FakeModel::new(&[]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 2);
    let ctx = StageContext {
        config: &config,
        paths: &paths,
        assistant: &assistant,
    };
    let mut state = WorkflowState::default();

    let outcome = build_comparison_table(&mut state, &ctx).await.unwrap();

    assert_eq!(outcome, StageOutcome::skipped("no agreed comparison dimensions"));
    assert!(!paths.comparison_table().exists());
}

#[test]
fn test_table_from_frame_without_answers_column_fails() {
    let frame = string_frame(vec![("full_name".to_string(), strings(&[Some("a/a")]))]).unwrap();
    assert!(ComparisonTable::build(&["language".to_string()], &frame).is_err());
}
