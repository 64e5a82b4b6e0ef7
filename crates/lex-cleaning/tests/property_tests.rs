//! Property-based tests for the cleaning pipeline.
//!
//! These tests use proptest to generate small datasets with missing cells
//! and repeated values, and verify that cleaning keeps its invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p lex-cleaning --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p lex-cleaning --test property_tests
//! ```

use proptest::prelude::*;

use lex_cleaning::imputers::{lower_median, mode};
use lex_cleaning::{
    CellValue, CleaningConfig, CleaningResult, ColumnPruner, Dataset, Pipeline, clean,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Small integer domain so repeated values and duplicate rows are common.
fn number_cell() -> impl Strategy<Value = CellValue> {
    prop::option::weighted(0.6, 18i64..24).prop_map(CellValue::from)
}

fn city_cell() -> impl Strategy<Value = CellValue> {
    prop::option::weighted(0.7, prop::sample::select(vec!["Tokyo", "Berlin", "Lima"]))
        .prop_map(CellValue::from)
}

/// Datasets with columns `age`, `city` and `score`.
fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((number_cell(), city_cell(), number_cell()), 1..30).prop_map(
        |records| {
            let records = records
                .into_iter()
                .map(|(age, city, score)| vec![age, city, score])
                .collect();
            Dataset::from_records(&["age", "city", "score"], records)
                .expect("records match the header")
        },
    )
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn observed(data: &Dataset, column: &str) -> Vec<CellValue> {
    data.column_values(column)
        .filter(|v| !v.is_missing())
        .cloned()
        .collect()
}

/// Clean with duplicates kept so rows line up with the input.
fn clean_keeping_rows(data: &Dataset) -> CleaningResult {
    let config = CleaningConfig::builder()
        .numeric_columns(["age"])
        .categorical_columns(["city"])
        .remove_duplicates(false)
        .build()
        .unwrap();
    Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(data)
        .unwrap()
}

/// Cells of `column` in `cleaned` at the rows where `original` was missing.
fn filled_cells(original: &Dataset, cleaned: &Dataset, column: &str) -> Vec<CellValue> {
    original
        .column_values(column)
        .zip(cleaned.column_values(column))
        .filter(|(before, _)| before.is_missing())
        .map(|(_, after)| after.clone())
        .collect()
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    #[test]
    fn clean_is_deterministic(data in dataset()) {
        let numeric = strings(&["age"]);
        let categorical = strings(&["city"]);

        let a = clean(&data, 0.5, &numeric, &categorical).unwrap();
        let b = clean(&data, 0.5, &numeric, &categorical).unwrap();

        prop_assert_eq!(a.cleaned, b.cleaned);
        prop_assert_eq!(a.stats, b.stats);
        prop_assert_eq!(a.dropped_columns, b.dropped_columns);
    }

    #[test]
    fn input_is_untouched(data in dataset()) {
        let before = data.clone();
        let _ = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();
        prop_assert_eq!(data, before);
    }
}

// =============================================================================
// Pruning
// =============================================================================

proptest! {
    #[test]
    fn pruning_boundary_is_strict(rows in 1usize..40, missing in 0usize..40) {
        prop_assume!(missing <= rows);

        let records = (0..rows)
            .map(|i| {
                let x = if i < missing { CellValue::Missing } else { CellValue::from(i as i64) };
                vec![CellValue::from(i as i64), x]
            })
            .collect();
        let data = Dataset::from_records(&["id", "x"], records).unwrap();

        let result = clean(&data, 0.5, &strings(&["x"]), &[]).unwrap();
        let dropped = result.dropped_columns.iter().any(|c| c == "x");

        prop_assert_eq!(dropped, 2 * missing > rows);
        prop_assert_eq!(ColumnPruner::default().should_drop(missing, rows), 2 * missing > rows);
        prop_assert_eq!(result.cleaned.has_column("x"), !dropped);
    }

    #[test]
    fn surviving_columns_keep_their_order(data in dataset()) {
        let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

        let expected: Vec<String> = data
            .columns()
            .into_iter()
            .filter(|c| !result.dropped_columns.contains(c))
            .collect();
        prop_assert_eq!(result.cleaned.columns(), expected);
    }
}

// =============================================================================
// Deduplication
// =============================================================================

proptest! {
    #[test]
    fn no_duplicate_rows_remain(data in dataset()) {
        let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();
        let rows = result.cleaned.rows();

        for (i, a) in rows.iter().enumerate() {
            for b in &rows[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn rows_never_increase(data in dataset()) {
        let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();
        prop_assert!(result.stats.row_count_after <= result.stats.row_count_before);
        prop_assert_eq!(result.stats.row_count_before, data.len());
    }
}

// =============================================================================
// Imputation
// =============================================================================

proptest! {
    #[test]
    fn fill_values_come_from_observed_cells(data in dataset()) {
        let result = clean(&data, 0.5, &strings(&["age"]), &strings(&["city"])).unwrap();

        for column in ["age", "city"] {
            if !result.cleaned.has_column(column) {
                continue;
            }
            let seen = observed(&data, column);
            for value in result.cleaned.column_values(column) {
                prop_assert!(value.is_missing() || seen.contains(value));
            }
        }
    }

    #[test]
    fn numeric_fill_is_the_lower_median(data in dataset()) {
        let result = clean_keeping_rows(&data);
        prop_assume!(result.cleaned.has_column("age"));

        let numbers: Vec<f64> = data
            .column_values("age")
            .filter_map(CellValue::as_number)
            .collect();
        let median = lower_median(&numbers).unwrap();

        for cell in filled_cells(&data, &result.cleaned, "age") {
            prop_assert_eq!(cell, CellValue::Number(median));
        }
    }

    #[test]
    fn categorical_fill_has_the_highest_count(data in dataset()) {
        let result = clean_keeping_rows(&data);
        prop_assume!(result.cleaned.has_column("city"));

        let seen = observed(&data, "city");
        let count = |value: &CellValue| seen.iter().filter(|v| *v == value).count();
        let top = seen.iter().map(count).max().unwrap();
        let expected = mode(&seen).unwrap();
        prop_assert_eq!(count(&expected), top);

        // Ties go to the value seen first.
        let first_top = seen.iter().find(|v| count(*v) == top).unwrap();
        prop_assert_eq!(&expected, first_top);

        for cell in filled_cells(&data, &result.cleaned, "city") {
            prop_assert_eq!(&cell, &expected);
        }
    }

    #[test]
    fn completeness_never_decreases_when_every_column_is_declared(data in dataset()) {
        let result = clean(&data, 0.5, &strings(&["age", "score"]), &strings(&["city"])).unwrap();

        prop_assert_eq!(result.stats.missing_count_after, 0);
        prop_assert!(result.stats.completeness_after >= result.stats.completeness_before);
        prop_assert!(result.fully_imputed());
    }
}
