//! Date parsing and normalization.
//!
//! Cells are parsed against an ordered list of candidate patterns and the
//! first pattern that matches wins. Ambiguous inputs such as `01/02/2020`
//! therefore resolve according to list order; downstream behavior depends on
//! that order, so it is part of the contract.
//!
//! Two lists exist:
//! - the reformat list, used when rewriting a column into a target format
//! - the validity list, used by the issue detector
//!
//! Cells that match nothing are left exactly as they were.

mod pattern;

pub use pattern::DatePattern;

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::types::{Cell, ColumnClassification, Dataset};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

static DEFAULT_NORMALIZER: Lazy<DateNormalizer> = Lazy::new(|| {
    DateNormalizer::new(&CleaningConfig::default()).expect("Invalid default date patterns")
});

/// Target output format for date normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateFormat {
    /// `mm/dd/yyyy`
    MonthDayYear,
    /// `dd/mm/yyyy`
    DayMonthYear,
    /// `yyyy/mm/dd`
    YearMonthDay,
}

impl DateFormat {
    /// The selector label, e.g. `mm/dd/yyyy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "mm/dd/yyyy",
            DateFormat::DayMonthYear => "dd/mm/yyyy",
            DateFormat::YearMonthDay => "yyyy/mm/dd",
        }
    }

    /// The strftime pattern used for output.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::YearMonthDay => "%Y/%m/%d",
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

impl FromStr for DateFormat {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self> {
        // exact labels only; no trimming or case folding
        match s {
            "mm/dd/yyyy" => Ok(DateFormat::MonthDayYear),
            "dd/mm/yyyy" => Ok(DateFormat::DayMonthYear),
            "yyyy/mm/dd" => Ok(DateFormat::YearMonthDay),
            _ => Err(CleaningError::UnsupportedDateFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for DateFormat {
    type Error = CleaningError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses and rewrites date cells against ordered candidate patterns.
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    reformat: Vec<DatePattern>,
    validity: Vec<DatePattern>,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        DEFAULT_NORMALIZER.clone()
    }
}

impl DateNormalizer {
    /// Build a normalizer from the configured candidate lists.
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        config.validate()?;
        let compile = |formats: &[String]| {
            formats
                .iter()
                .map(|f| DatePattern::compile(f))
                .collect::<Result<Vec<_>>>()
        };
        let normalizer = Self {
            reformat: compile(&config.reformat_formats)?,
            validity: compile(&config.validity_formats)?,
        };

        let formats = |patterns: &[DatePattern]| {
            patterns
                .iter()
                .map(DatePattern::format)
                .collect::<Vec<_>>()
                .join(", ")
        };
        debug!(
            "Date patterns: reformat [{}], validity [{}]",
            formats(&normalizer.reformat),
            formats(&normalizer.validity)
        );
        Ok(normalizer)
    }

    /// Parse with the reformat list; first matching pattern wins.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        first_match(&self.reformat, text)
    }

    /// Whether `text` matches any pattern of the validity list.
    pub fn is_valid_date(&self, text: &str) -> bool {
        first_match(&self.validity, text).is_some()
    }

    /// Rewrite one cell into `target`. Returns whether the cell changed.
    ///
    /// Non-text and blank cells are skipped; unparseable text is kept as is.
    pub fn normalize_cell(&self, cell: &mut Cell, target: DateFormat) -> bool {
        let Cell::Text(text) = cell else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }
        match self.parse(text) {
            Some(date) => {
                let formatted = target.format_date(date);
                let changed = *text != formatted;
                *text = formatted;
                changed
            }
            None => false,
        }
    }

    /// Reformat every cell of one column. The column is looked up
    /// case-insensitively.
    pub fn reformat_column(
        &self,
        mut dataset: Dataset,
        column: &str,
        target: DateFormat,
    ) -> Result<Dataset> {
        let idx = dataset.require_column(column)?;
        self.reformat_at(&mut dataset, idx, target);
        Ok(dataset)
    }

    /// Reformat every column classified as a date.
    pub fn apply_format(
        &self,
        mut dataset: Dataset,
        classifications: &[ColumnClassification],
        target: DateFormat,
    ) -> Result<Dataset> {
        dataset.check_classifications(classifications)?;

        let date_columns: Vec<usize> = classifications
            .iter()
            .enumerate()
            .filter(|(_, c)| c.date)
            .map(|(i, _)| i)
            .collect();

        info!(
            "Applying date format {} to {} date column(s)",
            target,
            date_columns.len()
        );

        for idx in date_columns {
            self.reformat_at(&mut dataset, idx, target);
        }
        Ok(dataset)
    }

    fn reformat_at(&self, dataset: &mut Dataset, idx: usize, target: DateFormat) {
        let mut changed = 0usize;
        let mut unparsed = 0usize;

        dataset.update_column(idx, |cell| {
            let was_text = matches!(cell, Cell::Text(t) if !t.trim().is_empty());
            if self.normalize_cell(cell, target) {
                changed += 1;
            } else if was_text && cell.as_text().and_then(|t| self.parse(t)).is_none() {
                unparsed += 1;
            }
        });

        let name = dataset.header().get(idx).map(String::as_str).unwrap_or_default();
        debug!(
            "Column '{}': {} cell(s) rewritten to {}, {} left unparsed",
            name, changed, target, unparsed
        );
    }
}

fn first_match(patterns: &[DatePattern], text: &str) -> Option<NaiveDate> {
    patterns.iter().find_map(|p| p.parse(text))
}

static_assertions::assert_impl_all!(DateNormalizer: Send, Sync);
