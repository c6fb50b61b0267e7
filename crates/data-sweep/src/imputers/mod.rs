//! Missing-value resolution for a single column.
//!
//! The column's classification selects the variant:
//! - numeric columns: mean, median, mode, custom number, drop or leave
//! - everything else: literal fill, drop or leave

mod numeric;
mod text;

pub use numeric::{ColumnStatistics, NumericImputer};
pub use text::TextImputer;

use crate::error::{CleaningError, Result};
use crate::types::{ColumnClassification, Dataset};
use std::fmt;
use tracing::info;

/// One user-selected strategy for missing values in a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationAction {
    /// Drop rows whose cell in the column is missing.
    RemoveRows,
    /// Fill missing cells with a literal value.
    FillWith(String),
    Mean,
    Median,
    Mode,
    /// Fill missing cells with a caller-supplied value.
    Custom(String),
    /// Keep missing cells.
    LeaveBlank,
}

impl RemediationAction {
    /// Parse a front-end action label.
    ///
    /// Accepts `Remove Rows`, `Leave Blank`, and `Fill/Replace with`,
    /// `Fill with` or `Replace with` followed by `Mean`, `Median`, `Mode`,
    /// `Custom Value` or `Value`. `Fill with <text>` carries its value in the
    /// label when `value` is absent. Matching ignores ASCII case.
    pub fn from_label(label: &str, value: Option<&str>) -> Result<Self> {
        let label = label.trim();
        let lower = label.to_ascii_lowercase();

        match lower.as_str() {
            "remove rows" => return Ok(Self::RemoveRows),
            "leave blank" => return Ok(Self::LeaveBlank),
            _ => {}
        }

        let rest_at = ["fill/replace with", "fill with", "replace with"]
            .iter()
            .find(|prefix| {
                lower.starts_with(*prefix)
                    && lower[prefix.len()..]
                        .chars()
                        .next()
                        .is_none_or(char::is_whitespace)
            })
            .map(|prefix| prefix.len())
            .ok_or_else(|| CleaningError::UnsupportedAction(label.to_string()))?;

        let rest = label[rest_at..].trim();
        let required = || {
            value
                .map(str::to_string)
                .ok_or_else(|| CleaningError::MissingParameter("value".to_string()))
        };

        match rest.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "custom value" | "custom" => Ok(Self::Custom(required()?)),
            "value" | "" => Ok(Self::FillWith(required()?)),
            _ => Ok(Self::FillWith(
                value.map_or_else(|| rest.to_string(), str::to_string),
            )),
        }
    }

    /// Short description for logs and messages.
    pub fn label(&self) -> String {
        match self {
            Self::RemoveRows => "Remove Rows".to_string(),
            Self::FillWith(v) => format!("Fill with {v}"),
            Self::Mean => "Fill/Replace with Mean".to_string(),
            Self::Median => "Fill/Replace with Median".to_string(),
            Self::Mode => "Fill/Replace with Mode".to_string(),
            Self::Custom(v) => format!("Fill/Replace with Custom Value ({v})"),
            Self::LeaveBlank => "Leave Blank".to_string(),
        }
    }
}

impl fmt::Display for RemediationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Applies a remediation action to one column, choosing the numeric or
/// text variant from the column's classification.
pub struct MissingValueResolver;

impl MissingValueResolver {
    pub fn resolve(
        dataset: Dataset,
        classifications: &[ColumnClassification],
        column: &str,
        action: &RemediationAction,
    ) -> Result<Dataset> {
        dataset.check_classifications(classifications)?;
        let idx = dataset.require_column(column)?;
        let numeric = classifications.get(idx).is_some_and(|c| c.numeric);

        info!(
            "Resolving missing values in '{}' ({}) with {}",
            column,
            if numeric { "numeric" } else { "non-numeric" },
            action
        );

        if numeric {
            NumericImputer::resolve(dataset, idx, action)
        } else {
            TextImputer::resolve(dataset, idx, action)
        }
    }

    /// Statistics for a numeric column, for display next to the actions.
    pub fn statistics(dataset: &Dataset, column: &str) -> Result<ColumnStatistics> {
        let idx = dataset.require_column(column)?;
        let values = NumericImputer::coerce(dataset, idx);
        Ok(NumericImputer::statistics(column, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use serde_json::json;

    // ========================================================================
    // Action labels
    // ========================================================================

    #[test]
    fn test_from_label_statistics() {
        for label in ["Fill/Replace with Mean", "fill with mean", "Replace with MEAN"] {
            assert_eq!(
                RemediationAction::from_label(label, None).unwrap(),
                RemediationAction::Mean
            );
        }
        assert_eq!(
            RemediationAction::from_label("Fill/Replace with Median", None).unwrap(),
            RemediationAction::Median
        );
        assert_eq!(
            RemediationAction::from_label("Fill/Replace with Mode", None).unwrap(),
            RemediationAction::Mode
        );
    }

    #[test]
    fn test_from_label_simple_actions() {
        assert_eq!(
            RemediationAction::from_label("Remove Rows", None).unwrap(),
            RemediationAction::RemoveRows
        );
        assert_eq!(
            RemediationAction::from_label(" leave blank ", None).unwrap(),
            RemediationAction::LeaveBlank
        );
    }

    #[test]
    fn test_from_label_values() {
        assert_eq!(
            RemediationAction::from_label("Fill/Replace with Custom Value", Some("42")).unwrap(),
            RemediationAction::Custom("42".to_string())
        );
        assert_eq!(
            RemediationAction::from_label("Fill with Value", Some("n/a")).unwrap(),
            RemediationAction::FillWith("n/a".to_string())
        );
        assert_eq!(
            RemediationAction::from_label("Fill with Unknown", None).unwrap(),
            RemediationAction::FillWith("Unknown".to_string())
        );
    }

    #[test]
    fn test_from_label_errors() {
        assert!(matches!(
            RemediationAction::from_label("Fill/Replace with Custom Value", None).unwrap_err(),
            CleaningError::MissingParameter(_)
        ));
        assert!(matches!(
            RemediationAction::from_label("Interpolate", None).unwrap_err(),
            CleaningError::UnsupportedAction(_)
        ));
        assert!(matches!(
            RemediationAction::from_label("Fill withMean", None).unwrap_err(),
            CleaningError::UnsupportedAction(_)
        ));
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn dataset() -> Dataset {
        serde_json::from_value(json!([
            ["Score", "City"],
            [10, "Oslo"],
            [null, ""],
            [20, null],
            ["bad", "Rome"]
        ]))
        .unwrap()
    }

    fn classes() -> [ColumnClassification; 2] {
        [ColumnClassification::numeric(), ColumnClassification::text()]
    }

    #[test]
    fn test_numeric_column_uses_statistics() {
        let result =
            MissingValueResolver::resolve(dataset(), &classes(), "score", &RemediationAction::Mean)
                .unwrap();
        let scores: Vec<&Cell> = result.column(0).collect();
        assert_eq!(
            scores,
            vec![
                &Cell::Number(10.0),
                &Cell::Number(15.0),
                &Cell::Number(20.0),
                &Cell::Number(15.0)
            ]
        );
        // other column untouched
        assert_eq!(result.rows()[1][1], Cell::text(""));
    }

    #[test]
    fn test_text_column_fill_case_insensitive() {
        let result = MissingValueResolver::resolve(
            dataset(),
            &classes(),
            "CITY",
            &RemediationAction::FillWith("Unknown".to_string()),
        )
        .unwrap();
        assert_eq!(result.rows()[1][1], Cell::text("Unknown"));
        assert_eq!(result.rows()[2][1], Cell::text("Unknown"));
        assert_eq!(result.rows()[1][0], Cell::Null);
    }

    #[test]
    fn test_unknown_column() {
        let err = MissingValueResolver::resolve(
            dataset(),
            &classes(),
            "Age",
            &RemediationAction::LeaveBlank,
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(_)));
    }

    #[test]
    fn test_imputation_is_idempotent() {
        for action in [
            RemediationAction::Mean,
            RemediationAction::Median,
            RemediationAction::RemoveRows,
            RemediationAction::Custom("1".to_string()),
        ] {
            let once =
                MissingValueResolver::resolve(dataset(), &classes(), "Score", &action).unwrap();
            let twice =
                MissingValueResolver::resolve(once.clone(), &classes(), "Score", &action).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_statistics() {
        let stats = MissingValueResolver::statistics(&dataset(), "Score").unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(15.0));
        assert_eq!(stats.mode, None);
    }
}
