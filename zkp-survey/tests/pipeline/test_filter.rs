//! Tests for loading and filtering

use super::common::{assistant, strings, test_config, write_source, FakeModel};
use zkp_survey::pipeline::stage0_load::load_dataset;
use zkp_survey::pipeline::stage1_filter::{filter_unlabelled, select_unlabelled};
use zkp_survey::pipeline::workflow::StageContext;
use zkp_survey::pipeline::{ArtifactPaths, WorkflowState};
use zkp_survey::workflow_utils::table::{column_names, read_parquet, string_column, string_frame};
use zkp_survey::workflow_utils::StageOutcome;

#[test]
fn test_filter_output_has_only_null_labels() {
    let dataset = string_frame(vec![
        (
            "full_name".to_string(),
            strings(&[Some("a/a"), Some("b/b"), Some("c/c"), Some("d/d")]),
        ),
        ("readme".to_string(), strings(&[Some("x"), None, Some("y"), Some("z")])),
        (
            "label".to_string(),
            strings(&[None, Some("no"), None, Some("yes")]),
        ),
    ])
    .unwrap();

    let unlabelled = select_unlabelled(&dataset).unwrap();

    assert_eq!(column_names(&unlabelled), column_names(&dataset));
    assert!(string_column(&unlabelled, "label")
        .unwrap()
        .iter()
        .all(Option::is_none));
    assert_eq!(
        string_column(&unlabelled, "full_name").unwrap(),
        strings(&[Some("a/a"), Some("c/c")])
    );
}

#[tokio::test]
async fn test_load_then_filter_writes_unlabelled_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());
    let model = FakeModel::new(&["language"]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 1);
    let paths = ArtifactPaths::new(dir.path());
    let ctx = StageContext {
        config: &config,
        paths: &paths,
        assistant: &assistant,
    };
    let mut state = WorkflowState::default();

    let loaded = load_dataset(&mut state, &ctx).await.unwrap();
    assert!(loaded.is_completed());
    assert_eq!(state.dataset.as_ref().unwrap().height(), 4);

    let filtered = filter_unlabelled(&mut state, &ctx).await.unwrap();
    assert!(filtered.is_completed());

    let unlabelled = read_parquet(&paths.unlabelled()).unwrap();
    assert_eq!(unlabelled.height(), 3);
    assert_eq!(
        string_column(&unlabelled, "full_name").unwrap(),
        strings(&[Some("alice/snark"), Some("bob/plonk"), Some("carol/web")])
    );
}

#[tokio::test]
async fn test_filter_skips_without_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::new(&[]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 1);
    let paths = ArtifactPaths::new(dir.path());
    let ctx = StageContext {
        config: &config,
        paths: &paths,
        assistant: &assistant,
    };
    let mut state = WorkflowState::default();

    let loaded = load_dataset(&mut state, &ctx).await.unwrap();
    assert!(matches!(loaded, StageOutcome::Skipped { .. }));

    let outcome = filter_unlabelled(&mut state, &ctx).await.unwrap();
    assert_eq!(outcome, StageOutcome::skipped("no dataset loaded"));
    assert!(!paths.unlabelled().exists());
}

#[tokio::test]
async fn test_unreadable_source_fails_and_leaves_dataset_unset() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("case_study_data.parquet"), b"not parquet").unwrap();
    let model = FakeModel::new(&[]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 1);
    let paths = ArtifactPaths::new(dir.path());
    let ctx = StageContext {
        config: &config,
        paths: &paths,
        assistant: &assistant,
    };
    let mut state = WorkflowState::default();

    assert!(load_dataset(&mut state, &ctx).await.is_err());
    assert!(state.dataset.is_none());
}
