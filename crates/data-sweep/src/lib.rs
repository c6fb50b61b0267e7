//! Tabular Data Cleaning Library
//!
//! Cleans user-uploaded tables (a header row plus data rows) one operation at
//! a time. Every operation takes the dataset by value and returns the cleaned
//! copy, so requests never share state.
//!
//! # Overview
//!
//! - **Issue Detection**: Missing values, non-numeric values in numeric
//!   columns, invalid dates in date columns
//! - **Date Normalization**: Rewrites dates into `mm/dd/yyyy`, `dd/mm/yyyy` or
//!   `yyyy/mm/dd`, first matching candidate pattern wins
//! - **Categorical Mapping**: Replaces raw category values with a standard
//!   vocabulary
//! - **Missing-Value Resolution**: Mean, median, mode, custom value, literal
//!   fill, row removal or leave-as-is, chosen per column
//! - **Text Casing**: UPPERCASE, lowercase, Title Case or Sentence case per
//!   column
//! - **Column Removal**: Drops duplicate rows and the named columns
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_sweep::{ColumnClassification, DateFormat, DateNormalizer, Dataset, IssueDetector};
//!
//! let dataset: Dataset = serde_json::from_str(r#"[["Age", "Joined"], [30, "2020/01/15"]]"#)?;
//! let classes = [ColumnClassification::numeric(), ColumnClassification::date()];
//!
//! let report = IssueDetector::default().detect(&dataset, &classes)?;
//! let dataset = DateNormalizer::default().apply_format(dataset, &classes, DateFormat::MonthDayYear)?;
//! ```
//!
//! # Request Boundary
//!
//! Front ends talk to the engine through [`Service`], which takes a tagged
//! JSON [`Request`] and returns a [`Response`] envelope:
//!
//! ```rust,ignore
//! use data_sweep::Service;
//!
//! let response = Service::default().handle_json(r#"{
//!     "operation": "apply_casing",
//!     "data": [["name"], ["ada lovelace"]],
//!     "casing": ["Title Case"]
//! }"#);
//! assert_eq!(response.status_code(), 200);
//! ```
//!
//! # Configuration
//!
//! Only the candidate date pattern lists are configurable:
//!
//! ```rust,ignore
//! use data_sweep::{CleaningConfig, Service};
//!
//! let config = CleaningConfig::builder()
//!     .reformat_formats(["%Y/%m/%d", "%m/%d/%Y"])
//!     .build()?;
//! let service = Service::new(&config)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod dates;
pub mod error;
pub mod imputers;
pub mod io;
pub mod quality;
pub mod service;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    CasingMode, CasingNormalizer, CategoricalMapper, drop_duplicate_rows, remove_columns,
    remove_columns_frame,
};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use dates::{DateFormat, DateNormalizer};
pub use error::{CleaningError, Result, ResultExt};
pub use imputers::{ColumnStatistics, MissingValueResolver, RemediationAction};
pub use quality::{ColumnIssueCounts, IssueDetector, IssueKind, IssueReport};
pub use service::{Payload, Request, Response, Rows, Service};
pub use types::{Cell, ColumnClassification, Dataset};

