//! Tests for label curation

use super::common::{assistant, strings, test_config, FakeModel};
use zkp_survey::pipeline::stage3_curate::{curate_label, curate_predictions};
use zkp_survey::pipeline::workflow::StageContext;
use zkp_survey::pipeline::{ArtifactPaths, WorkflowState};
use zkp_survey::workflow_utils::table::{read_parquet, string_column, string_frame, write_parquet};
use zkp_survey::workflow_utils::StageOutcome;

#[test]
fn test_curate_label_examples() {
    assert_eq!(curate_label("yes, blah"), "yes");
    assert_eq!(curate_label("NO: reason"), "no: reason");
    assert_eq!(curate_label("Yes"), "yes");
    assert_eq!(curate_label("na"), "na");
    assert_eq!(curate_label("error"), "error");
}

#[tokio::test]
async fn test_curation_preserves_batch_order() {
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

    let mut predictions = string_frame(vec![
        (
            "full_name".to_string(),
            strings(&[Some("a/a"), Some("b/b"), Some("c/c")]),
        ),
        ("label".to_string(), strings(&[None, None, None])),
        (
            "raw_label".to_string(),
            strings(&[Some("yes, blah"), Some("NO: reason"), None]),
        ),
    ])
    .unwrap();
    write_parquet(&mut predictions, &paths.predictions()).unwrap();

    let mut state = WorkflowState::new(2, 1);
    state.dataset = Some(predictions);

    let outcome = curate_predictions(&mut state, &ctx).await.unwrap();
    assert!(outcome.is_completed());

    assert!(paths.curation_partials().path(1).exists());
    assert!(paths.curation_partials().path(2).exists());
    assert!(!paths.curation_partials().path(3).exists());

    let curated = read_parquet(&paths.curated()).unwrap();
    assert_eq!(
        string_column(&curated, "full_name").unwrap(),
        strings(&[Some("a/a"), Some("b/b"), Some("c/c")])
    );
    assert_eq!(
        string_column(&curated, "label").unwrap(),
        strings(&[Some("yes"), Some("no: reason"), Some("na")])
    );
    assert!(model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_curation_skips_without_predictions() {
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
    state.dataset = Some(string_frame(vec![("label".to_string(), strings(&[None]))]).unwrap());

    let outcome = curate_predictions(&mut state, &ctx).await.unwrap();

    assert!(matches!(outcome, StageOutcome::Skipped { .. }));
    assert!(!paths.curated().exists());
}
