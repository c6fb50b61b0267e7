//! Missing-value handling for text, categorical and other non-numeric columns.

use super::RemediationAction;
use crate::error::{CleaningError, Result};
use crate::types::{Cell, Dataset};
use tracing::debug;

/// Imputation for columns not classified as numeric.
pub struct TextImputer;

impl TextImputer {
    /// Apply `action` to the column at `idx`. Null and empty-string cells
    /// count as missing.
    pub fn resolve(
        mut dataset: Dataset,
        idx: usize,
        action: &RemediationAction,
    ) -> Result<Dataset> {
        match action {
            RemediationAction::RemoveRows => {
                let before = dataset.height();
                dataset.retain_rows(|row| !row.get(idx).is_none_or(Cell::is_null_or_empty));
                debug!("Removed {} row(s)", before - dataset.height());
            }
            RemediationAction::FillWith(value) | RemediationAction::Custom(value) => {
                let mut filled = 0usize;
                dataset.update_column(idx, |cell| {
                    if cell.is_null_or_empty() {
                        *cell = Cell::text(value.as_str());
                        filled += 1;
                    }
                });
                debug!("Filled {} cell(s) with '{}'", filled, value);
            }
            RemediationAction::LeaveBlank => {}
            RemediationAction::Mean | RemediationAction::Median | RemediationAction::Mode => {
                return Err(CleaningError::UnsupportedAction(format!(
                    "{} (column is not numeric)",
                    action.label()
                )));
            }
        }
        Ok(dataset)
    }
}
