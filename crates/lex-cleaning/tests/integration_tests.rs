//! Integration tests for the cleaning pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline on CSV fixtures
//! and generated datasets.

use lex_cleaning::{
    ActionType, CellValue, CleaningConfig, CleaningError, CleaningStage, Dataset, Pipeline,
    ProgressUpdate, ReportGenerator, Row, SampleGenerator, clean, io,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> Dataset {
    io::read_csv(fixtures_path().join(filename)).expect("Failed to read CSV fixture")
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn column(dataset: &Dataset, name: &str) -> Vec<CellValue> {
    dataset.column_values(name).cloned().collect()
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn test_age_department_scenario() {
    let data = load_csv("age_department.csv");
    assert_eq!(data.len(), 10);
    assert_eq!(data.missing_in_column("age"), 3);
    assert_eq!(data.missing_in_column("dept"), 1);

    let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["dept"])).unwrap();

    // Lower median of [20, 30, 40, 50, 60, 70, 80]
    let ages = column(&result.cleaned, "age");
    assert_eq!(ages[1], CellValue::Number(50.0));
    assert_eq!(ages[4], CellValue::Number(50.0));
    assert_eq!(ages[7], CellValue::Number(50.0));

    let depts = column(&result.cleaned, "dept");
    assert_eq!(depts[2], CellValue::from("Sales"));

    assert!(result.dropped_columns.is_empty());
    assert_eq!(result.cleaned.len(), 10);
    assert_eq!(result.cleaned.columns(), vec!["age", "dept"]);

    let stats = &result.stats;
    assert_eq!(stats.missing_count_before, 4);
    assert_eq!(stats.missing_count_after, 0);
    assert_eq!(stats.completeness_before, 80.0);
    assert_eq!(stats.completeness_after, 100.0);
    assert!(result.fully_imputed());
}

#[test]
fn test_sparse_column_is_dropped() {
    let data = load_csv("sparse_column.csv");
    let result = clean(&data, 0.5, &strings(&["salary"]), &strings(&["city"])).unwrap();

    assert_eq!(result.dropped_columns, vec!["notes"]);
    for row in result.cleaned.rows() {
        assert!(!row.contains_key("notes"));
    }
    assert_eq!(result.stats.column_count_before, 4);
    assert_eq!(result.stats.column_count_after, 3);

    // Exactly half missing is kept and imputed
    assert!(result.cleaned.has_column("salary"));
    assert_eq!(result.cleaned.missing_in_column("salary"), 0);
    assert_eq!(column(&result.cleaned, "salary")[1], CellValue::Number(58000.0));
    assert_eq!(column(&result.cleaned, "city")[4], CellValue::from("Tokyo"));

    let removed: Vec<_> = result
        .actions
        .iter()
        .filter(|a| a.action_type == ActionType::ColumnRemoved)
        .map(|a| a.target.as_str())
        .collect();
    assert_eq!(removed, vec!["notes"]);
}

#[test]
fn test_rows_identical_after_imputation_collapse() {
    let data = load_csv("duplicates.csv");
    let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

    let expected = Dataset::from_records(
        &["age", "city"],
        vec![
            vec![30.0.into(), "Tokyo".into()],
            vec![40.0.into(), "Berlin".into()],
            vec![40.0.into(), "Tokyo".into()],
        ],
    )
    .unwrap();

    assert_eq!(result.cleaned, expected);
    assert_eq!(result.stats.row_count_before, 5);
    assert_eq!(result.stats.row_count_after, 3);
    assert!(
        result
            .actions
            .iter()
            .any(|a| a.action_type == ActionType::DuplicatesRemoved)
    );
}

#[test]
fn test_keep_duplicates_config() {
    let data = load_csv("duplicates.csv");
    let config = CleaningConfig::builder()
        .numeric_columns(["age"])
        .categorical_columns(["city"])
        .remove_duplicates(false)
        .build()
        .unwrap();

    let result = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(&data)
        .unwrap();

    assert_eq!(result.cleaned.len(), 5);
    assert_eq!(result.stats.missing_count_after, 0);
}

// ============================================================================
// All-Missing Columns
// ============================================================================

#[test]
fn test_all_missing_column_pruned_before_imputation() {
    let data = load_csv("all_missing.csv");
    let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

    assert_eq!(result.dropped_columns, vec!["age"]);
    assert!(!result.cleaned.has_column("age"));
    assert!(
        !result
            .actions
            .iter()
            .any(|a| a.action_type == ActionType::ImputationSkipped)
    );
    assert_eq!(column(&result.cleaned, "city")[2], CellValue::from("Tokyo"));
}

#[test]
fn test_all_missing_column_skipped_above_full_threshold() {
    let data = load_csv("all_missing.csv");
    let result = clean(&data, 1.5, &strings(&["age"]), &strings(&["city"])).unwrap();

    assert!(result.dropped_columns.is_empty());
    assert_eq!(result.cleaned.missing_in_column("age"), 4);
    assert!(!result.fully_imputed());

    let skipped: Vec<_> = result
        .actions
        .iter()
        .filter(|a| a.action_type == ActionType::ImputationSkipped)
        .map(|a| a.target.as_str())
        .collect();
    assert_eq!(skipped, vec!["age"]);
    assert!(result.warnings.iter().any(|w| w.contains("'age'")));
}

#[test]
fn test_every_column_over_threshold_leaves_empty_schema() {
    let data = io::read_csv_str("age,city\n,\n30,\n,Lima\n").unwrap();
    let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

    assert_eq!(result.dropped_columns, vec!["age", "city"]);
    assert_eq!(result.cleaned.column_count(), 0);
    assert_eq!(result.cleaned.len(), 1);
    assert_eq!(result.stats.column_count_after, 0);
    assert_eq!(result.stats.missing_count_after, 0);
    assert_eq!(result.stats.completeness_after, 100.0);
    assert!(result.fully_imputed());
}

// ============================================================================
// Numeric Columns Read as Text
// ============================================================================

#[test]
fn test_numeric_column_read_as_text_is_imputed() {
    let data = io::read_csv_str("age,city\n10,A\nunknown,B\n,A\n30,A\n").unwrap();
    let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

    let ages = column(&result.cleaned, "age");
    assert_eq!(ages[2], CellValue::Number(30.0));
    assert_eq!(ages[1], CellValue::from("unknown"));
    assert_eq!(result.cleaned.missing_in_column("age"), 0);

    assert!(!result.warnings.iter().any(|w| w.contains("no observed values")));
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("'age'") && w.contains("non-numeric"))
    );
}

// ============================================================================
// Input Validation
// ============================================================================

#[test]
fn test_empty_dataset_rejected() {
    let data = io::read_csv_str("age,dept\n").unwrap();
    let err = clean(&data, 0.5, &strings(&["age"]), &strings(&["dept"])).unwrap_err();

    assert!(err.is_empty_dataset());
    assert_eq!(err.error_code(), "EMPTY_DATASET");
}

#[test]
fn test_ragged_dataset_rejected() {
    let mut first = Row::new();
    first.insert("age".into(), 30.0.into());
    first.insert("dept".into(), "IT".into());
    let mut second = Row::new();
    second.insert("age".into(), 40.0.into());

    let data = Dataset::from_rows(vec![first, second]);
    let err = clean(&data, 0.5, &strings(&["age"]), &strings(&["dept"])).unwrap_err();

    assert!(matches!(err, CleaningError::SchemaMismatch { row: 1, .. }));
}

#[test]
fn test_invalid_threshold_rejected() {
    let data = load_csv("age_department.csv");
    let err = clean(&data, -0.1, &strings(&["age"]), &strings(&["dept"])).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

#[test]
fn test_input_is_not_modified() {
    let data = load_csv("age_department.csv");
    let before = data.clone();

    let _ = clean(&data, 0.5, &strings(&["age"]), &strings(&["dept"])).unwrap();

    assert_eq!(data, before);
}

// ============================================================================
// Progress Reporting Tests
// ============================================================================

#[test]
fn test_pipeline_progress_stages_reported() {
    let data = load_csv("age_department.csv");
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    let config = CleaningConfig::builder()
        .numeric_columns(["age"])
        .categorical_columns(["dept"])
        .build()
        .unwrap();

    Pipeline::builder()
        .config(config)
        .on_progress(move |update| {
            sink.lock().unwrap().push(update);
        })
        .build()
        .unwrap()
        .process(&data)
        .unwrap();

    let updates = updates.lock().unwrap();
    let stages: Vec<CleaningStage> = updates.iter().map(|u| u.stage).collect();
    assert_eq!(
        stages,
        vec![
            CleaningStage::Initializing,
            CleaningStage::Analyzing,
            CleaningStage::Pruning,
            CleaningStage::Imputation,
            CleaningStage::Imputation,
            CleaningStage::Deduplication,
            CleaningStage::Comparison,
            CleaningStage::Complete,
        ]
    );

    for pair in updates.windows(2) {
        assert!(pair[1].progress >= pair[0].progress);
    }
    assert_eq!(updates[3].sub_stage.as_deref(), Some("Column: age"));
    assert_eq!(updates[3].items_processed, Some(1));
    assert_eq!(updates[4].items_processed, Some(2));
    assert_eq!(updates[4].items_total, Some(2));
}

#[test]
fn test_pipeline_progress_failed_stage() {
    let data = Dataset::new();
    let stages: Arc<Mutex<Vec<CleaningStage>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stages);

    let result = Pipeline::builder()
        .on_progress(move |update| {
            sink.lock().unwrap().push(update.stage);
        })
        .build()
        .unwrap()
        .process(&data);

    assert!(result.is_err());
    assert_eq!(stages.lock().unwrap().last(), Some(&CleaningStage::Failed));
}

#[test]
fn test_pipeline_shared_across_threads() {
    let pipeline = Arc::new(Pipeline::builder().build().unwrap());
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                let data = SampleGenerator::new(40).with_seed(seed).generate();
                pipeline.process(&data).map(|r| r.stats.row_count_before)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 40);
    }
}

// ============================================================================
// Sample Dataset Tests
// ============================================================================

#[test]
fn test_sample_dataset_default_run() {
    let data = SampleGenerator::default().generate();
    let result = Pipeline::builder()
        .build()
        .unwrap()
        .process(&data)
        .unwrap();

    // performance is 60% missing
    assert_eq!(result.dropped_columns, vec!["performance"]);
    assert_eq!(result.stats.column_count_after, 7);
    assert!(result.fully_imputed());
    assert_eq!(result.stats.completeness_after, 100.0);
    assert!(result.stats.completeness_before < 100.0);
    // id is unique so nothing collapses
    assert_eq!(result.stats.row_count_after, 50);
}

#[test]
fn test_same_input_same_output() {
    let data = SampleGenerator::new(60).with_seed(11).generate();
    let pipeline = Pipeline::builder().build().unwrap();

    let a = pipeline.process(&data).unwrap();
    let b = pipeline.process(&data).unwrap();

    assert_eq!(a.cleaned, b.cleaned);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.dropped_columns, b.dropped_columns);
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_cleaned_csv_and_report_written() {
    let dir = TempDir::new().unwrap();
    let data = load_csv("sparse_column.csv");
    let result = clean(&data, 0.5, &strings(&["salary"]), &strings(&["city"])).unwrap();

    let generator = ReportGenerator::new(dir.path().to_path_buf(), Some("sparse".to_string()));
    let csv_path = generator.write_dataset(&result.cleaned).unwrap();
    assert!(csv_path.ends_with("sparse.csv"));

    let reloaded = io::read_csv(&csv_path).unwrap();
    assert_eq!(reloaded, result.cleaned);

    let report = ReportGenerator::build_report(
        "sparse_column.csv",
        csv_path.to_str(),
        &result,
    );
    let report_path = generator.write_report_to_file(&report, "sparse_column").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();

    assert_eq!(json["comparison"]["dropped_columns"][0], "notes");
    assert_eq!(json["summary"]["columns_removed"], 1);
    assert_eq!(json["missing_before"]["notes"]["count"], 8);
}
