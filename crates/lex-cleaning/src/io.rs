//! CSV input and output.
//!
//! Conversion between [`Dataset`] and polars `DataFrame`, plus CSV reading
//! and writing on top of polars. The cleaning core never calls into this
//! module; it is used by the binary and by report generation.

use crate::dataset::{CellValue, Dataset, Row};
use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::{DtypeCategory, get_dtype_category, is_integral};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rows inspected by polars when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

// =============================================================================
// Reading
// =============================================================================

/// Read a CSV file with a header row.
///
/// Empty fields become `Missing`. Tries a standard quoted read first and
/// falls back to reading pre-cleaned content.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();

    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => return dataset_from_dataframe(&df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    let content = std::fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    read_csv_str(&clean_csv_content(&content))
}

/// Parse CSV text with a header row.
pub fn read_csv_str(content: &str) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(Cursor::new(content.to_string()))
        .finish()
        .context("Parsing CSV content")?;

    dataset_from_dataframe(&df)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a `DataFrame` into a [`Dataset`].
///
/// Numeric columns become `Number`, booleans become `Text("true"/"false")`,
/// everything else is cast to string. Nulls become `Missing`.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let mut names = Vec::with_capacity(df.width());
    let mut columns: Vec<Vec<CellValue>> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        names.push(column.name().to_string());
        columns.push(series_to_cells(series)?);
    }

    let rows = (0..df.height())
        .map(|i| {
            names
                .iter()
                .zip(&columns)
                .map(|(name, cells)| (name.clone(), cells[i].clone()))
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset::from_rows(rows))
}

fn series_to_cells(series: &Series) -> Result<Vec<CellValue>> {
    let cells: Vec<CellValue> = match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(CellValue::from)
            .collect(),
        DtypeCategory::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| CellValue::from(v.map(|b| b.to_string())))
            .collect(),
        DtypeCategory::Text => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(CellValue::from)
            .collect(),
    };
    Ok(cells)
}

// =============================================================================
// Writing
// =============================================================================

/// Convert a [`Dataset`] into a `DataFrame` in schema order.
///
/// Columns whose non-missing cells are all integral numbers become Int64,
/// other all-number columns Float64, and anything else String.
pub fn dataset_to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let columns = dataset
        .columns()
        .iter()
        .map(|name| Column::from(column_to_series(dataset, name)))
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

fn column_to_series(dataset: &Dataset, name: &str) -> Series {
    let values: Vec<&CellValue> = dataset.column_values(name).collect();
    let present = || values.iter().filter(|v| !v.is_missing());

    if present().all(|v| v.as_number().is_some_and(is_integral)) {
        let data: Vec<Option<i64>> = values
            .iter()
            .map(|v| v.as_number().map(|n| n as i64))
            .collect();
        Series::new(name.into(), data)
    } else if present().all(|v| v.as_number().is_some()) {
        let data: Vec<Option<f64>> = values.iter().map(|v| v.as_number()).collect();
        Series::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values
            .iter()
            .map(|v| (!v.is_missing()).then(|| v.to_string()))
            .collect();
        Series::new(name.into(), data)
    }
}

/// Render a dataset as CSV text: header in schema order, `Missing` as an
/// empty field. A dataset without columns renders as an empty document.
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv_to(dataset, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| CleaningError::Internal(e.to_string()))
}

/// Write a dataset as CSV to `path`.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file =
        std::fs::File::create(path).context(format!("Creating {}", path.display()))?;
    write_csv_to(dataset, &mut file)
}

fn write_csv_to<W: std::io::Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    if dataset.column_count() == 0 {
        return Ok(());
    }

    let mut df = dataset_to_dataframe(dataset)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Writing CSV")?;
    Ok(())
}
