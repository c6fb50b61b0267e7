//! CSV loading and writing through polars.
//!
//! polars does the CSV parsing and type detection; cells are then converted
//! to the engine's [`Cell`] model so every operation sees the same shape
//! regardless of where the data came from.

use crate::error::{CleaningError, Result, ResultExt};
use crate::types::{Cell, Dataset};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV file with a header row.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let df = read_csv_frame(path)?;
    dataframe_to_dataset(&df)
}

/// Load a CSV file into a polars `DataFrame` without converting cells.
pub fn read_csv_frame(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))
}

/// Load CSV from any reader, e.g. stdin or an upload body.
pub fn read_csv_from<R: Read>(mut reader: R) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| CleaningError::from(e).with_context("Failed to read CSV input"))?;
    read_csv_bytes(bytes)
}

/// Load CSV from in-memory bytes.
pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("Failed to parse CSV input")?;

    dataframe_to_dataset(&df)
}

/// Convert a polars `DataFrame` into a [`Dataset`].
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let header: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let columns: Vec<&Series> = df
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series())
        .collect();

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = columns
            .iter()
            .map(|series| series.get(i).map(any_value_to_cell))
            .collect::<PolarsResult<Vec<Cell>>>()?;
        rows.push(row);
    }

    debug!("Converted DataFrame {:?} to dataset", df.shape());
    Dataset::new(header, rows)
}

/// Converts a polars `AnyValue` to a [`Cell`].
///
/// | Polars type  | Cell                 |
/// |--------------|----------------------|
/// | Null         | `Null`               |
/// | Int / UInt   | `Number`             |
/// | Float        | `Number` (NaN: Null) |
/// | String       | `Text`               |
/// | Boolean      | `Text("True"/"False")` |
/// | Other        | `Text` via Display   |
fn any_value_to_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => Cell::Null,

        AnyValue::Boolean(b) => Cell::text(if b { "True" } else { "False" }),

        AnyValue::Int8(i) => Cell::Number(i as f64),
        AnyValue::Int16(i) => Cell::Number(i as f64),
        AnyValue::Int32(i) => Cell::Number(i as f64),
        AnyValue::Int64(i) => Cell::Number(i as f64),
        AnyValue::UInt8(u) => Cell::Number(u as f64),
        AnyValue::UInt16(u) => Cell::Number(u as f64),
        AnyValue::UInt32(u) => Cell::Number(u as f64),
        AnyValue::UInt64(u) => Cell::Number(u as f64),

        AnyValue::Float32(f) => Cell::from(f as f64),
        AnyValue::Float64(f) => Cell::from(f),

        AnyValue::String(s) => Cell::text(s),
        AnyValue::StringOwned(s) => Cell::text(s.as_str()),

        other => Cell::Text(other.to_string()),
    }
}

/// Write a dataset as CSV with a header row.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let columns: Vec<Column> = dataset
        .header()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<String>> = dataset
                .column(idx)
                .map(|cell| match cell {
                    Cell::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Series::new(name.as_str().into(), values).into()
        })
        .collect();

    let mut df = DataFrame::new(columns).context("Failed to build DataFrame")?;
    write_csv_frame(&mut df, writer)
}

/// Write a polars `DataFrame` as CSV with a header row.
pub fn write_csv_frame<W: Write>(df: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context("Failed to write CSV")?;

    debug!("Wrote {} row(s) as CSV", df.height());
    Ok(())
}
