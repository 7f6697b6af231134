//! End-to-end runs and stage interplay

use super::common::{
    assistant, assistant_with_limit, strings, test_config, write_source, FakeModel, RequestKind,
};
use zkp_survey::pipeline::stage6_extract::extract_dimensions;
use zkp_survey::pipeline::workflow::StageContext;
use zkp_survey::pipeline::{run_pipeline, ArtifactPaths, CommonDimensions, Stage, WorkflowState};
use zkp_survey::workflow_utils::table::{read_parquet, string_column, string_frame, write_parquet};
use zkp_survey::workflow_utils::StageOutcome;

#[tokio::test]
async fn test_full_run_builds_comparison_of_zkp_projects() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());
    let model = FakeModel::new(&["language", "proof_system", "license"]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 2);
    let paths = ArtifactPaths::new(dir.path());

    let run = run_pipeline(&config, &assistant).await.unwrap();

    for stage in Stage::ALL {
        assert!(
            run.report.outcome(stage).unwrap().is_completed(),
            "{} did not complete: {:?}",
            stage.name(),
            run.report.outcome(stage)
        );
    }

    let curated = read_parquet(&paths.curated()).unwrap();
    assert_eq!(
        string_column(&curated, "label").unwrap(),
        strings(&[Some("yes"), Some("yes"), Some("no")])
    );

    assert_eq!(
        run.state.comparison_dimensions.as_ref().unwrap().names(2),
        vec!["language", "proof_system"]
    );
    assert!(paths.comparison_dimensions().exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.comparison_json()).unwrap()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.as_object().unwrap().len(), 3);
    }
    assert_eq!(rows[0]["project_name"], "alice/snark");
    assert_eq!(rows[1]["project_name"], "bob/plonk");

    assert_eq!(model.count(RequestKind::Classify), 3);
    assert_eq!(model.count(RequestKind::Mine), 2);
    assert_eq!(model.count(RequestKind::Reconcile), 1);
    assert_eq!(model.count(RequestKind::Extract), 2);

    assert!(paths.report().exists());
    assert_eq!(run.report.stages.len(), 8);
    assert!(run
        .report
        .artifacts
        .contains(&paths.comparison_json().display().to_string()));
}

#[tokio::test]
async fn test_rerun_produces_identical_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());
    let model = FakeModel::new(&["language", "proof_system"]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 2);
    let paths = ArtifactPaths::new(dir.path());

    run_pipeline(&config, &assistant).await.unwrap();
    let table = std::fs::read(paths.comparison_table()).unwrap();
    let filtered = std::fs::read(paths.filtered_table()).unwrap();
    let json = std::fs::read(paths.comparison_json()).unwrap();

    run_pipeline(&config, &assistant).await.unwrap();

    assert_eq!(std::fs::read(paths.comparison_table()).unwrap(), table);
    assert_eq!(std::fs::read(paths.filtered_table()).unwrap(), filtered);
    assert_eq!(std::fs::read(paths.comparison_json()).unwrap(), json);
}

#[tokio::test]
async fn test_missing_source_skips_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let model = FakeModel::new(&["language"]);
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 2);

    let run = run_pipeline(&config, &assistant).await.unwrap();

    for stage in Stage::ALL {
        assert!(matches!(
            run.report.outcome(stage),
            Some(StageOutcome::Skipped { .. })
        ));
    }
    assert!(model.requests.lock().unwrap().is_empty());
    assert!(run.state.dataset.is_none());
    assert!(ArtifactPaths::new(dir.path()).report().exists());
}

#[tokio::test]
async fn test_invalid_reconciliation_skips_later_stages() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());
    let model = FakeModel::new(&[]).with_reconcile_reply("these are the dimensions");
    let assistant = assistant(&model);
    let config = test_config(dir.path(), 2);
    let paths = ArtifactPaths::new(dir.path());

    let run = run_pipeline(&config, &assistant).await.unwrap();

    assert!(matches!(
        run.report.outcome(Stage::Reconcile),
        Some(StageOutcome::Failed { .. })
    ));
    assert!(run.state.comparison_dimensions.is_none());
    assert!(matches!(
        run.report.outcome(Stage::Extract),
        Some(StageOutcome::Skipped { .. })
    ));
    assert!(matches!(
        run.report.outcome(Stage::BuildTable),
        Some(StageOutcome::Skipped { .. })
    ));
    assert!(!paths.comparison_dimensions().exists());
    assert_eq!(model.count(RequestKind::Extract), 0);
}

#[tokio::test]
async fn test_over_budget_prompts_degrade_to_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());
    let model = FakeModel::new(&["language"]);
    let assistant = assistant_with_limit(&model, 5);
    let config = test_config(dir.path(), 2);
    let paths = ArtifactPaths::new(dir.path());

    let run = run_pipeline(&config, &assistant).await.unwrap();

    assert!(model.requests.lock().unwrap().is_empty());
    let predictions = read_parquet(&paths.predictions()).unwrap();
    assert_eq!(
        string_column(&predictions, "raw_label").unwrap(),
        strings(&[Some("na"), Some("na"), Some("na")])
    );
    assert!(run.report.outcome(Stage::Mine).unwrap().is_completed());
    assert_eq!(read_parquet(&paths.mined_dimensions()).unwrap().height(), 0);

    match run.report.outcome(Stage::Reconcile) {
        Some(StageOutcome::Failed { error }) => assert!(error.contains("token_limit_exceeded")),
        other => panic!("unexpected reconcile outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_extraction_does_not_recheck_labels() {
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

    let mut mined = string_frame(vec![
        ("full_name".to_string(), strings(&[Some("a/a"), Some("b/b")])),
        ("readme".to_string(), strings(&[Some("zk"), Some("web")])),
        ("label".to_string(), strings(&[Some("yes"), Some("no")])),
    ])
    .unwrap();
    write_parquet(&mut mined, &paths.mined_dimensions()).unwrap();

    let mut state = WorkflowState::new(config.batch_size, 1);
    state.comparison_dimensions = Some(CommonDimensions::from_names(["language"]));

    let outcome = extract_dimensions(&mut state, &ctx).await.unwrap();
    assert!(outcome.is_completed());

    let extracted = read_parquet(&paths.extracted_dimensions()).unwrap();
    assert_eq!(extracted.height(), 2);
    assert_eq!(model.count(RequestKind::Extract), 2);
}
