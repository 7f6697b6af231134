//! Tabular artifact I/O: Parquet through polars, XLSX through rust_xlsxwriter
//!
//! Stages never touch polars directly for I/O; they read and write whole
//! frames through these helpers and pull string columns out as owned values.

use anyhow::{Context, Result};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::path::Path;

/// Read a Parquet file into memory
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    ParquetReader::new(file)
        .finish()
        .with_context(|| format!("Failed to decode Parquet file {}", path.display()))
}

/// Write a frame as Parquet, creating parent directories as needed
pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    ParquetWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write Parquet file {}", path.display()))?;
    Ok(())
}

/// Write a frame as a single-sheet XLSX workbook with a header row.
///
/// Every column is rendered as text; nulls become empty cells.
pub fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_idx, name) in column_names(df).iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string(0, col, name.as_str())?;
        for (row_idx, value) in string_column(df, name)?.iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_string(row_idx as u32 + 1, col, value.as_str())?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook {}", path.display()))?;
    Ok(())
}

/// Column names in frame order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Owned string values of a column, casting non-string columns to text
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Missing column '{}'", name))?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as text", name))?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

/// Add or replace a string column
pub fn with_string_column(
    mut df: DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<DataFrame> {
    df.with_column(Series::new(name.into(), values))
        .with_context(|| format!("Failed to set column '{}'", name))?;
    Ok(df)
}

/// Keep the rows whose mask entry is true
pub fn filter_rows(df: &DataFrame, mask: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("mask".into(), mask);
    df.filter(&mask).context("Failed to filter rows")
}

/// Split a frame into consecutive slices of at most `batch_size` rows.
///
/// An empty frame yields a single empty slice so that downstream
/// concatenation still sees the frame's schema.
pub fn batches(df: &DataFrame, batch_size: usize) -> Vec<DataFrame> {
    let batch_size = batch_size.max(1);
    if df.height() == 0 {
        return vec![df.clone()];
    }
    (0..df.height())
        .step_by(batch_size)
        .map(|offset| df.slice(offset as i64, batch_size))
        .collect()
}

/// Stack frames with identical schemas, in order
pub fn concat(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut frames = frames.into_iter();
    let mut combined = frames.next().unwrap_or_default();
    for frame in frames {
        combined
            .vstack_mut(&frame)
            .context("Partial files have mismatched schemas")?;
    }
    Ok(combined)
}

/// Build an all-string frame from named columns
pub fn string_frame(columns: Vec<(String, Vec<Option<String>>)>) -> Result<DataFrame> {
    let columns: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    DataFrame::new(columns).context("Failed to build table")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
