//! Custom error types for the cleaning engine.
//!
//! All failures surface through [`CleaningError`], built with `thiserror`.
//! Errors are serializable so the request boundary can hand them to the
//! front end as `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning engine.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Column was not found in the dataset header.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Header contains the same column name twice.
    #[error("Duplicate column name '{0}' in header")]
    DuplicateColumn(String),

    /// Dataset has no header row.
    #[error("Dataset is empty: a header row is required")]
    EmptyDataset,

    /// A data row does not match the header width.
    #[error("Row {row} has {found} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Header cell is not a string.
    #[error("Header cell {0} is not a column name")]
    InvalidHeader(usize),

    /// Classification list does not line up with the header.
    #[error("Expected {expected} column classifications, got {found}")]
    ClassificationMismatch { expected: usize, found: usize },

    /// Casing selection list does not line up with the header.
    #[error("Expected {expected} casing selections, got {found}")]
    SelectionMismatch { expected: usize, found: usize },

    /// Date format selector outside the supported set.
    #[error("Unsupported date format: '{0}'")]
    UnsupportedDateFormat(String),

    /// Remediation action label not recognised, or not valid for the column kind.
    #[error("Unsupported action: '{0}'")]
    UnsupportedAction(String),

    /// Fill value for a numeric column is not a number.
    #[error("Invalid fill value '{value}' for numeric column '{column}'")]
    InvalidFillValue { column: String, value: String },

    /// A required request field was absent.
    #[error("Missing required field: {0}")]
    MissingParameter(String),

    /// Column removal requested with no columns.
    #[error("No columns specified to remove")]
    NoColumnsSpecified,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::RaggedRow { .. } => "RAGGED_ROW",
            Self::InvalidHeader(_) => "INVALID_HEADER",
            Self::ClassificationMismatch { .. } => "CLASSIFICATION_MISMATCH",
            Self::SelectionMismatch { .. } => "SELECTION_MISMATCH",
            Self::UnsupportedDateFormat(_) => "UNSUPPORTED_DATE_FORMAT",
            Self::UnsupportedAction(_) => "UNSUPPORTED_ACTION",
            Self::InvalidFillValue { .. } => "INVALID_FILL_VALUE",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::NoColumnsSpecified => "NO_COLUMNS_SPECIFIED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the caller sent something invalid (4xx) rather than the engine failing (5xx).
    pub fn is_validation(&self) -> bool {
        match self {
            Self::ColumnNotFound(_)
            | Self::DuplicateColumn(_)
            | Self::EmptyDataset
            | Self::RaggedRow { .. }
            | Self::InvalidHeader(_)
            | Self::ClassificationMismatch { .. }
            | Self::SelectionMismatch { .. }
            | Self::UnsupportedDateFormat(_)
            | Self::UnsupportedAction(_)
            | Self::InvalidFillValue { .. }
            | Self::MissingParameter(_)
            | Self::NoColumnsSpecified
            | Self::InvalidConfig(_)
            | Self::Json(_) => true,
            Self::Internal(_) | Self::Io(_) | Self::Polars(_) => false,
            Self::WithContext { source, .. } => source.is_validation(),
        }
    }

    /// HTTP-style status for the transport layer.
    pub fn status_code(&self) -> u16 {
        if self.is_validation() { 400 } else { 500 }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
