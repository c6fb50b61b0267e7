//! Missing-value handling for numeric columns.
//!
//! The column is first coerced to numbers; anything that does not parse is
//! treated as missing. Mean and median come from a polars `Series`; the mode
//! is only defined when a single value has the highest count.

use super::RemediationAction;
use crate::error::{CleaningError, Result};
use crate::types::{Cell, Dataset};
use crate::utils::{coerce_numeric, parse_float};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Statistics over the non-missing values of a numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
}

/// Imputation for columns classified as numeric.
pub struct NumericImputer;

impl NumericImputer {
    /// Coerce a column to numbers; unparseable cells become `None`.
    pub fn coerce(dataset: &Dataset, idx: usize) -> Vec<Option<f64>> {
        dataset.column(idx).map(coerce_numeric).collect()
    }

    /// Mean, median and unique mode of the non-missing values.
    pub fn statistics(name: &str, values: &[Option<f64>]) -> ColumnStatistics {
        let series = Series::new(name.into(), values);
        ColumnStatistics {
            count: values.iter().flatten().count(),
            mean: series.mean(),
            median: series.median(),
            mode: unique_mode(values.iter().flatten().copied()),
        }
    }

    /// Apply `action` to the column at `idx`.
    ///
    /// Afterwards the column holds only numbers and nulls.
    pub fn resolve(
        mut dataset: Dataset,
        idx: usize,
        action: &RemediationAction,
    ) -> Result<Dataset> {
        let name = dataset
            .header()
            .get(idx)
            .cloned()
            .ok_or_else(|| CleaningError::Internal(format!("column index {idx} out of range")))?;

        let fill = match action {
            RemediationAction::Custom(value) | RemediationAction::FillWith(value) => Some(
                parse_float(value)
                    .filter(|v| !v.is_nan())
                    .ok_or_else(|| CleaningError::InvalidFillValue {
                        column: name.clone(),
                        value: value.clone(),
                    })?,
            ),
            RemediationAction::Mean
            | RemediationAction::Median
            | RemediationAction::Mode => {
                let stats = Self::statistics(&name, &Self::coerce(&dataset, idx));
                debug!("Column '{}' statistics: {:?}", name, stats);
                let value = match action {
                    RemediationAction::Mean => stats.mean,
                    RemediationAction::Median => stats.median,
                    _ => stats.mode,
                };
                if value.is_none() {
                    warn!(
                        "No {} available for column '{}'; missing values left as-is",
                        action.label(),
                        name
                    );
                }
                value
            }
            RemediationAction::RemoveRows | RemediationAction::LeaveBlank => None,
        };

        let mut filled = 0usize;
        dataset.update_column(idx, |cell| {
            let value = coerce_numeric(cell);
            if value.is_none() && fill.is_some() {
                filled += 1;
            }
            *cell = Cell::from(value.or(fill));
        });

        if *action == RemediationAction::RemoveRows {
            let before = dataset.height();
            dataset.retain_rows(|row| !matches!(row.get(idx), Some(Cell::Null) | None));
            debug!(
                "Removed {} row(s) with missing '{}'",
                before - dataset.height(),
                name
            );
        } else {
            debug!("Filled {} missing cell(s) in '{}'", filled, name);
        }

        Ok(dataset)
    }
}

/// The most frequent value, or `None` when the top count is shared.
fn unique_mode(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for value in values {
        let entry = counts.entry((value + 0.0).to_bits()).or_insert((value, 0));
        entry.1 += 1;
    }

    let max = counts.values().map(|(_, count)| *count).max()?;
    let mut top = counts.values().filter(|(_, count)| *count == max);
    let (value, _) = top.next()?;
    if top.next().is_some() {
        None
    } else {
        Some(*value)
    }
}
