use crate::dates::DateNormalizer;
use crate::error::Result;
use crate::types::{Cell, ColumnClassification, Dataset};
use crate::utils::is_numeric_cell;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A data-quality problem reported for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "Missing Values")]
    MissingValues,
    #[serde(rename = "Non-Numeric Values")]
    NonNumericValues,
    #[serde(rename = "Invalid Dates")]
    InvalidDates,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingValues => "Missing Values",
            IssueKind::NonNumericValues => "Non-Numeric Values",
            IssueKind::InvalidDates => "Invalid Dates",
        }
    }
}

/// Column name to issue labels, in header order. Columns without issues are absent.
pub type IssueReport = IndexMap<String, Vec<IssueKind>>;

/// Raw counts behind the issue labels of one column.
///
/// `non_numeric` is only computed for numeric columns and `invalid_dates`
/// only for date columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIssueCounts {
    pub missing: usize,
    pub non_numeric: Option<usize>,
    pub invalid_dates: Option<usize>,
}

impl ColumnIssueCounts {
    /// Labels for this column.
    ///
    /// Missing and non-numeric values are reported only when non-zero. A date
    /// column always reports invalid dates, even with a zero count; the front
    /// end has always received it that way.
    pub fn issues(&self) -> Vec<IssueKind> {
        let mut issues = Vec::new();
        if self.missing > 0 {
            issues.push(IssueKind::MissingValues);
        }
        if self.non_numeric.is_some_and(|n| n > 0) {
            issues.push(IssueKind::NonNumericValues);
        }
        if self.invalid_dates.is_some() {
            issues.push(IssueKind::InvalidDates);
        }
        issues
    }
}

/// Scans columns and reports quality problems.
#[derive(Debug, Clone, Default)]
pub struct IssueDetector {
    dates: DateNormalizer,
}

impl IssueDetector {
    pub fn new(dates: DateNormalizer) -> Self {
        Self { dates }
    }

    /// Count missing, non-numeric and invalid-date cells for every column.
    pub fn count_issues(
        &self,
        dataset: &Dataset,
        classifications: &[ColumnClassification],
    ) -> Result<IndexMap<String, ColumnIssueCounts>> {
        dataset.check_classifications(classifications)?;

        let mut counts = IndexMap::with_capacity(dataset.width());
        for (idx, (name, class)) in dataset.header().iter().zip(classifications).enumerate() {
            let column_counts = self.count_column(dataset.column(idx), class);
            debug!("Column '{}': {:?}", name, column_counts);
            counts.insert(name.clone(), column_counts);
        }
        Ok(counts)
    }

    /// Build the issue report: column name to the labels present for it.
    pub fn detect(
        &self,
        dataset: &Dataset,
        classifications: &[ColumnClassification],
    ) -> Result<IssueReport> {
        let report: IssueReport = self
            .count_issues(dataset, classifications)?
            .into_iter()
            .map(|(name, counts)| (name, counts.issues()))
            .filter(|(_, issues)| !issues.is_empty())
            .collect();

        info!(
            "Detected issues in {} of {} column(s)",
            report.len(),
            dataset.width()
        );
        Ok(report)
    }

    fn count_column<'a>(
        &self,
        cells: impl Iterator<Item = &'a Cell>,
        class: &ColumnClassification,
    ) -> ColumnIssueCounts {
        let mut counts = ColumnIssueCounts {
            missing: 0,
            non_numeric: class.numeric.then_some(0),
            invalid_dates: class.date.then_some(0),
        };

        for cell in cells {
            if cell.is_missing() {
                counts.missing += 1;
                continue;
            }
            if let Some(n) = counts.non_numeric.as_mut()
                && !is_numeric_cell(cell)
            {
                *n += 1;
            }
            if let Some(n) = counts.invalid_dates.as_mut()
                && !cell.as_text().is_some_and(|t| self.dates.is_valid_date(t))
            {
                *n += 1;
            }
        }
        counts
    }
}
