//! Request boundary for front ends.
//!
//! A [`Request`] names one operation and carries the dataset plus that
//! operation's parameters. [`Service::handle`] validates it, runs the
//! operation and wraps the outcome in a [`Response`] envelope:
//!
//! ```json
//! {"status": "success", "data": ...}
//! {"status": "error", "error": {"code": "...", "message": "..."}}
//! ```
//!
//! Panics inside an operation are caught here and reported as
//! [`CleaningError::Internal`].

use crate::cleaner::{CasingMode, CasingNormalizer, CategoricalMapper, remove_columns};
use crate::config::CleaningConfig;
use crate::dates::{DateFormat, DateNormalizer};
use crate::error::{CleaningError, Result};
use crate::imputers::{ColumnStatistics, MissingValueResolver, RemediationAction};
use crate::quality::{IssueDetector, IssueReport};
use crate::types::{Cell, ColumnClassification, Dataset};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};

/// Raw wire rows, header first. Checked into a [`Dataset`] when the request
/// runs, so shape errors keep their own codes.
pub type Rows = Vec<Vec<Cell>>;

/// One cleaning operation with its inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    DetectIssues {
        data: Rows,
        classifications: Vec<ColumnClassification>,
    },
    ReformatDates {
        data: Rows,
        column: String,
        date_format: String,
    },
    ApplyDateFormat {
        data: Rows,
        classifications: Vec<ColumnClassification>,
        date_format: String,
    },
    MapCategories {
        data: Rows,
        column: String,
        unique_values: Vec<String>,
        standard_format: Vec<String>,
    },
    ResolveMissing {
        data: Rows,
        classifications: Vec<ColumnClassification>,
        column: String,
        action: String,
        #[serde(default)]
        value: Option<String>,
    },
    ApplyCasing {
        data: Rows,
        casing: Vec<Option<CasingMode>>,
    },
    RemoveColumns {
        data: Rows,
        columns: Vec<String>,
    },
    ColumnStatistics {
        data: Rows,
        column: String,
    },
}

impl Request {
    /// The operation name as it appears on the wire.
    pub fn operation(&self) -> &'static str {
        match self {
            Request::DetectIssues { .. } => "detect_issues",
            Request::ReformatDates { .. } => "reformat_dates",
            Request::ApplyDateFormat { .. } => "apply_date_format",
            Request::MapCategories { .. } => "map_categories",
            Request::ResolveMissing { .. } => "resolve_missing",
            Request::ApplyCasing { .. } => "apply_casing",
            Request::RemoveColumns { .. } => "remove_columns",
            Request::ColumnStatistics { .. } => "column_statistics",
        }
    }
}

/// Result data of a successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Dataset(Dataset),
    Issues(IssueReport),
    Statistics(ColumnStatistics),
}

/// Envelope returned to the caller.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success { data: Payload },
    Error { error: CleaningError },
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// HTTP-style status: 200, 400 for invalid input, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            Response::Success { .. } => 200,
            Response::Error { error } => error.status_code(),
        }
    }
}

impl From<Result<Payload>> for Response {
    fn from(result: Result<Payload>) -> Self {
        match result {
            Ok(data) => Response::Success { data },
            Err(error) => Response::Error { error },
        }
    }
}

/// Runs requests against a configured set of cleaning components.
#[derive(Debug, Clone, Default)]
pub struct Service {
    dates: DateNormalizer,
    detector: IssueDetector,
}

impl Service {
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        let dates = DateNormalizer::new(config)?;
        Ok(Self {
            detector: IssueDetector::new(dates.clone()),
            dates,
        })
    }

    /// Run one request. Never panics; failures become an error response.
    pub fn handle(&self, request: Request) -> Response {
        let operation = request.operation();
        info!("Handling '{}' request", operation);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request)));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(CleaningError::Internal(message))
            }
        };

        if let Err(e) = &result {
            if e.is_validation() {
                info!("'{}' rejected: {}", operation, e);
            } else {
                error!("'{}' failed: {}", operation, e);
            }
        }
        result.into()
    }

    /// Parse a JSON request and run it. Malformed JSON is an error response.
    pub fn handle_json(&self, body: &str) -> Response {
        match serde_json::from_str::<Request>(body) {
            Ok(request) => self.handle(request),
            Err(e) => {
                info!("Rejected malformed request: {}", e);
                Response::Error { error: e.into() }
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Payload> {
        match request {
            Request::DetectIssues {
                data,
                classifications,
            } => {
                let data = Dataset::try_from(data)?;
                Ok(Payload::Issues(
                    self.detector.detect(&data, &classifications)?,
                ))
            }

            Request::ReformatDates {
                data,
                column,
                date_format,
            } => {
                let data = Dataset::try_from(data)?;
                let target: DateFormat = date_format.parse()?;
                Ok(Payload::Dataset(
                    self.dates.reformat_column(data, &column, target)?,
                ))
            }

            Request::ApplyDateFormat {
                data,
                classifications,
                date_format,
            } => {
                let data = Dataset::try_from(data)?;
                let target: DateFormat = date_format.parse()?;
                Ok(Payload::Dataset(self.dates.apply_format(
                    data,
                    &classifications,
                    target,
                )?))
            }

            Request::MapCategories {
                data,
                column,
                unique_values,
                standard_format,
            } => Ok(Payload::Dataset(CategoricalMapper::apply(
                Dataset::try_from(data)?,
                &column,
                &unique_values,
                &standard_format,
            ))),

            Request::ResolveMissing {
                data,
                classifications,
                column,
                action,
                value,
            } => {
                let data = Dataset::try_from(data)?;
                let action = RemediationAction::from_label(&action, value.as_deref())?;
                Ok(Payload::Dataset(MissingValueResolver::resolve(
                    data,
                    &classifications,
                    &column,
                    &action,
                )?))
            }

            Request::ApplyCasing { data, casing } => {
                let data = Dataset::try_from(data)?;
                let modes: Vec<CasingMode> =
                    casing.into_iter().map(Option::unwrap_or_default).collect();
                Ok(Payload::Dataset(CasingNormalizer::apply(data, &modes)?))
            }

            Request::RemoveColumns { data, columns } => Ok(Payload::Dataset(remove_columns(
                Dataset::try_from(data)?,
                &columns,
            )?)),

            Request::ColumnStatistics { data, column } => Ok(Payload::Statistics(
                MissingValueResolver::statistics(&Dataset::try_from(data)?, &column)?,
            )),
        }
    }
}

static_assertions::assert_impl_all!(Service: Send, Sync);
static_assertions::assert_impl_all!(Request: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(request: serde_json::Value) -> serde_json::Value {
        let response = Service::default().handle_json(&request.to_string());
        serde_json::to_value(&response).unwrap()
    }

    // ========================================================================
    // Success envelopes
    // ========================================================================

    #[test]
    fn test_detect_issues() {
        let out = run(json!({
            "operation": "detect_issues",
            "data": [["Age", "Joined"], [30, "2020-01-15"], [null, "not a date"]],
            "classifications": [[1, 0, 0, 0], [0, 0, 0, 1]]
        }));
        assert_eq!(
            out,
            json!({
                "status": "success",
                "data": {
                    "Age": ["Missing Values"],
                    "Joined": ["Invalid Dates"]
                }
            })
        );
    }

    #[test]
    fn test_reformat_dates() {
        let out = run(json!({
            "operation": "reformat_dates",
            "data": [["when"], ["2020/01/15"], ["garbage"]],
            "column": "WHEN",
            "date_format": "dd/mm/yyyy"
        }));
        assert_eq!(
            out,
            json!({"status": "success", "data": [["when"], ["15/01/2020"], ["garbage"]]})
        );
    }

    #[test]
    fn test_map_categories() {
        let out = run(json!({
            "operation": "map_categories",
            "data": [["Smoker"], ["Y"], ["N"], ["maybe"]],
            "column": "smoker",
            "unique_values": ["Y", "N"],
            "standard_format": ["Yes", "No"]
        }));
        assert_eq!(out["data"], json!([["Smoker"], ["Yes"], ["No"], [null]]));
    }

    #[test]
    fn test_resolve_missing_mean() {
        let out = run(json!({
            "operation": "resolve_missing",
            "data": [["Score"], [10], [null], [20], ["bad"]],
            "classifications": [{"numeric": true}],
            "column": "Score",
            "action": "Fill/Replace with Mean"
        }));
        assert_eq!(out["data"], json!([["Score"], [10.0], [15.0], [20.0], [15.0]]));
    }

    #[test]
    fn test_apply_casing_with_unselected_columns() {
        let out = run(json!({
            "operation": "apply_casing",
            "data": [["a", "b"], ["hello world", "KEEP"]],
            "casing": ["Title Case", null]
        }));
        assert_eq!(out["data"], json!([["a", "b"], ["Hello World", "KEEP"]]));
    }

    #[test]
    fn test_column_statistics() {
        let out = run(json!({
            "operation": "column_statistics",
            "data": [["v"], [1], [2], [2]],
            "column": "v"
        }));
        assert_eq!(out["data"]["count"], json!(3));
        assert_eq!(out["data"]["mode"], json!(2.0));
    }

    // ========================================================================
    // Error envelopes
    // ========================================================================

    #[test]
    fn test_unsupported_date_format() {
        let service = Service::default();
        let request: Request = serde_json::from_value(json!({
            "operation": "apply_date_format",
            "data": [["d"], ["2020-01-15"]],
            "classifications": [[0, 0, 0, 1]],
            "date_format": "yyyy-dd-mm"
        }))
        .unwrap();

        let response = service.handle(request);
        assert!(!response.is_success());
        assert_eq!(response.status_code(), 400);

        let Response::Error { error } = response else {
            panic!("expected error response");
        };
        assert!(matches!(error, CleaningError::UnsupportedDateFormat(_)));
        assert!(error.to_string().starts_with("Unsupported date format"));
    }

    #[test]
    fn test_remove_columns_without_columns() {
        let out = run(json!({
            "operation": "remove_columns",
            "data": [["a"], [1]],
            "columns": []
        }));
        assert_eq!(
            out,
            json!({
                "status": "error",
                "error": {
                    "code": "NO_COLUMNS_SPECIFIED",
                    "message": "No columns specified to remove"
                }
            })
        );
    }

    #[test]
    fn test_classification_length_mismatch() {
        let out = run(json!({
            "operation": "detect_issues",
            "data": [["a", "b"], [1, 2]],
            "classifications": [[1, 0, 0, 0]]
        }));
        assert_eq!(out["error"]["code"], json!("CLASSIFICATION_MISMATCH"));
    }

    #[test]
    fn test_malformed_request() {
        let response = Service::default().handle_json("{\"operation\": \"explode\"}");
        assert_eq!(response.status_code(), 400);
        let response = Service::default().handle_json("not json");
        assert!(!response.is_success());
    }

    #[test]
    fn test_ragged_dataset_rejected() {
        let out = run(json!({
            "operation": "remove_columns",
            "data": [["a", "b"], [1]],
            "columns": ["a"]
        }));
        assert_eq!(
            out,
            json!({
                "status": "error",
                "error": {
                    "code": "RAGGED_ROW",
                    "message": "Row 1 has 1 cells but the header has 2"
                }
            })
        );
    }

    #[test]
    fn test_dataset_shape_errors_keep_their_codes() {
        let out = run(json!({
            "operation": "apply_casing",
            "data": [["a", "a"], ["x", "y"]],
            "casing": ["UPPERCASE", null]
        }));
        assert_eq!(out["error"]["code"], json!("DUPLICATE_COLUMN"));

        let out = run(json!({
            "operation": "column_statistics",
            "data": [],
            "column": "a"
        }));
        assert_eq!(out["error"]["code"], json!("EMPTY_DATASET"));

        let out = run(json!({
            "operation": "detect_issues",
            "data": [["a", null], [1, 2]],
            "classifications": [[1, 0, 0, 0], [1, 0, 0, 0]]
        }));
        assert_eq!(out["error"]["code"], json!("INVALID_HEADER"));

        let response = Service::default().handle_json(
            &json!({"operation": "remove_columns", "data": [["a"]], "columns": "a"}).to_string(),
        );
        assert_eq!(response.status_code(), 400);
        let Response::Error { error } = response else {
            panic!("expected error");
        };
        assert_eq!(error.error_code(), "JSON_ERROR");
    }
}
