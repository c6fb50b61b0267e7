//! Data quality detection.
//!
//! This module scans each column, guided by its classification, and reports
//! missing values, non-numeric values and invalid dates.

mod detector;

pub use detector::{ColumnIssueCounts, IssueDetector, IssueKind, IssueReport};
