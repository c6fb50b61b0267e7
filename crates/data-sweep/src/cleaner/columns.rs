//! Column removal and duplicate-row removal.
//!
//! Both run in polars. A [`Dataset`] is turned into a key frame first: a
//! column holding only numbers stays `Float64`, any other column becomes a
//! `String` column whose values carry a type tag, so `1` and `"1"` never
//! compare equal. A row index rides along so the surviving rows can be
//! picked out of the original dataset afterwards.

use crate::error::{CleaningError, Result};
use crate::types::{Cell, Dataset};
use polars::prelude::*;
use tracing::{debug, info};

/// Drop repeated rows, keeping the first occurrence.
pub fn drop_duplicate_rows(dataset: Dataset) -> Result<Dataset> {
    let before = dataset.height();
    let dataset = sweep(dataset, &[])?;
    debug!("Removed {} duplicate row(s)", before - dataset.height());
    Ok(dataset)
}

/// Drop duplicate rows, then drop the named columns.
///
/// Column names must match exactly.
pub fn remove_columns(dataset: Dataset, columns: &[String]) -> Result<Dataset> {
    let columns = requested_columns(columns, |name| dataset.column_index(name).is_some())?;

    let (height, width) = (dataset.height(), dataset.width());
    let dataset = sweep(dataset, &columns)?;

    info!(
        "Removed {} column(s) and {} duplicate row(s); {} column(s) remain",
        width - dataset.width(),
        height - dataset.height(),
        dataset.width()
    );
    Ok(dataset)
}

/// [`remove_columns`] for a frame loaded straight from CSV.
///
/// Every polars column has a single dtype, so rows are compared as loaded.
pub fn remove_columns_frame(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    let columns = requested_columns(columns, |name| df.get_column_index(name).is_some())?;

    let result = df
        .unique_stable(None, UniqueKeepStrategy::First, None)?
        .drop_many(columns.iter().copied());

    info!(
        "Removed {} column(s) and {} duplicate row(s); {} column(s) remain",
        df.width() - result.width(),
        df.height() - result.height(),
        result.width()
    );
    Ok(result)
}

/// Non-empty requested names; fails when none are left or one is unknown.
fn requested_columns<'a>(
    columns: &'a [String],
    exists: impl Fn(&str) -> bool,
) -> Result<Vec<&'a str>> {
    let columns: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect();
    if columns.is_empty() {
        return Err(CleaningError::NoColumnsSpecified);
    }

    if let Some(missing) = columns.iter().find(|name| !exists(name)) {
        return Err(CleaningError::ColumnNotFound(missing.to_string()));
    }
    Ok(columns)
}

/// Dedup on every original column, then drop `columns`.
fn sweep(dataset: Dataset, columns: &[&str]) -> Result<Dataset> {
    if dataset.width() == 0 {
        return Ok(dataset);
    }

    let row_index = row_index_name(dataset.header());
    let frame = key_frame(&dataset)?.with_row_index(row_index.as_str().into(), None)?;

    let swept = frame
        .unique_stable(Some(dataset.header()), UniqueKeepStrategy::First, None)?
        .drop_many(columns.iter().copied());

    let rows: Vec<usize> = swept
        .column(&row_index)?
        .as_materialized_series()
        .idx()?
        .into_no_null_iter()
        .map(|i| i as usize)
        .collect();
    let kept: Vec<usize> = swept
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != row_index)
        .filter_map(|name| dataset.column_index(name))
        .collect();

    Ok(dataset.select(&rows, &kept))
}

fn row_index_name(header: &[String]) -> String {
    let mut name = String::from("__row");
    while header.iter().any(|h| *h == name) {
        name.push('_');
    }
    name
}

fn key_frame(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .header()
        .iter()
        .enumerate()
        .map(|(idx, name)| key_column(name, dataset.column(idx).collect()))
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn key_column(name: &str, cells: Vec<&Cell>) -> Column {
    let numeric = cells.iter().all(|cell| !matches!(cell, Cell::Text(_)));

    if numeric {
        // fold -0.0 into 0.0
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Number(n) => Some(n + 0.0),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values).into()
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Null => None,
                Cell::Number(n) => Some(format!("n{:x}", (n + 0.0).to_bits())),
                Cell::Text(s) => Some(format!("t{s}")),
            })
            .collect();
        Series::new(name.into(), values).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn load(value: serde_json::Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_drop_duplicate_rows_keeps_first() {
        let dataset = load(json!([["a", "b"], [1, "x"], [2, "y"], [1, "x"], [null, "z"], [null, "z"]]));
        let result = drop_duplicate_rows(dataset).unwrap();
        assert_eq!(
            result,
            load(json!([["a", "b"], [1, "x"], [2, "y"], [null, "z"]]))
        );
    }

    #[test]
    fn test_number_and_text_are_distinct() {
        let dataset = load(json!([["a"], [1], ["1"], [1], [null]]));
        let result = drop_duplicate_rows(dataset).unwrap();
        assert_eq!(result, load(json!([["a"], [1], ["1"], [null]])));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let dataset = load(json!([["a"], [0.0], [-0.0]]));
        assert_eq!(drop_duplicate_rows(dataset).unwrap().height(), 1);
    }

    #[test]
    fn test_header_named_like_row_index() {
        let dataset = load(json!([["__row", "x"], [1, "a"], [2, "a"], [1, "a"]]));
        let result = remove_columns(dataset, &["x".to_string()]).unwrap();
        assert_eq!(result, load(json!([["__row"], [1], [2]])));
    }

    #[test]
    fn test_remove_columns() {
        let dataset = load(json!([["id", "name", "note"], [1, "a", "x"], [1, "a", "x"], [2, "b", "y"]]));
        let result = remove_columns(dataset, &["note".to_string()]).unwrap();
        assert_eq!(result, load(json!([["id", "name"], [1, "a"], [2, "b"]])));
    }

    #[test]
    fn test_dedup_happens_before_drop() {
        // rows differ only in the dropped column, so both survive
        let dataset = load(json!([["id", "note"], [1, "x"], [1, "y"]]));
        let result = remove_columns(dataset, &["note".to_string()]).unwrap();
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_remove_columns_validation() {
        let dataset = load(json!([["id"], [1]]));
        assert!(matches!(
            remove_columns(dataset.clone(), &[]).unwrap_err(),
            CleaningError::NoColumnsSpecified
        ));
        assert!(matches!(
            remove_columns(dataset.clone(), &[String::new()]).unwrap_err(),
            CleaningError::NoColumnsSpecified
        ));
        assert!(matches!(
            remove_columns(dataset, &["ID".to_string()]).unwrap_err(),
            CleaningError::ColumnNotFound(_)
        ));
    }

    #[test]
    fn test_remove_columns_frame() {
        let df = df!(
            "id" => [1i64, 1, 2, 1],
            "name" => ["a", "a", "b", "a"],
            "note" => ["x", "x", "y", "z"]
        )
        .unwrap();

        let result = remove_columns_frame(&df, &["note".to_string()]).unwrap();
        let expected = df!(
            "id" => [1i64, 2, 1],
            "name" => ["a", "b", "a"]
        )
        .unwrap();
        assert!(result.equals(&expected));

        assert!(matches!(
            remove_columns_frame(&df, &["Note".to_string()]).unwrap_err(),
            CleaningError::ColumnNotFound(_)
        ));
    }
}
