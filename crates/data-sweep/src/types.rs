//! Shared data model: cells, the tabular dataset and column classifications.

use crate::error::{CleaningError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// Cell
// =============================================================================

/// A single dataset cell.
///
/// Serialized untagged, so JSON `null`, numbers and strings map directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Missing for issue detection: null, empty string or a single space.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty() || s == " ",
            Cell::Number(_) => false,
        }
    }

    /// Missing for imputation: null or the empty string.
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text rendering used for dictionary lookups; `None` for null cells.
    pub fn lookup_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Some(Cow::Owned(format_number(*n))),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Cell::Null
        } else {
            Cell::Number(value)
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::from)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Render a number without a trailing `.0` when it is integral.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Header plus data rows, all of the same width.
///
/// The wire form is an array of arrays whose first array is the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, checking header uniqueness and row widths.
    pub fn new(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(header.len());
        for name in &header {
            if !seen.insert(name.as_str()) {
                return Err(CleaningError::DuplicateColumn(name.clone()));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(CleaningError::RaggedRow {
                    row: i + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Exact-name column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Case-insensitive column lookup; both sides are uppercased.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let target = name.to_uppercase();
        self.header.iter().position(|h| h.to_uppercase() == target)
    }

    /// Like [`Dataset::find_column`] but fails with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .ok_or_else(|| CleaningError::ColumnNotFound(name.to_string()))
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Apply `f` to every cell of a column in place.
    pub(crate) fn update_column(&mut self, idx: usize, mut f: impl FnMut(&mut Cell)) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                f(cell);
            }
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub(crate) fn retain_rows(&mut self, mut keep: impl FnMut(&[Cell]) -> bool) {
        self.rows.retain(|row| keep(row));
    }

    /// Keep the given rows and columns, in the given order.
    ///
    /// Positions must be in range and must not repeat.
    pub(crate) fn select(self, rows: &[usize], columns: &[usize]) -> Self {
        let mut header: Vec<Option<String>> = self.header.into_iter().map(Some).collect();
        let mut source: Vec<Option<Vec<Cell>>> = self.rows.into_iter().map(Some).collect();

        let header = columns
            .iter()
            .filter_map(|&c| header.get_mut(c).and_then(Option::take))
            .collect();
        let rows = rows
            .iter()
            .filter_map(|&r| source.get_mut(r).and_then(Option::take))
            .map(|mut row| {
                columns
                    .iter()
                    .filter_map(|&c| row.get_mut(c).map(std::mem::take))
                    .collect()
            })
            .collect();

        Self { header, rows }
    }

    /// Check that a per-column list lines up with the header.
    pub fn check_classifications(&self, classifications: &[ColumnClassification]) -> Result<()> {
        if classifications.len() != self.width() {
            return Err(CleaningError::ClassificationMismatch {
                expected: self.width(),
                found: classifications.len(),
            });
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.header, self.rows)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Dataset {
    type Error = CleaningError;

    fn try_from(mut value: Vec<Vec<Cell>>) -> Result<Self> {
        if value.is_empty() {
            return Err(CleaningError::EmptyDataset);
        }
        let header_row = value.remove(0);
        let header = header_row
            .into_iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Cell::Text(name) => Ok(name),
                Cell::Number(n) => Ok(format_number(n)),
                Cell::Null => Err(CleaningError::InvalidHeader(i)),
            })
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(header, value)
    }
}

impl From<Dataset> for Vec<Vec<Cell>> {
    fn from(value: Dataset) -> Self {
        let (header, rows) = value.into_parts();
        let mut out = Vec::with_capacity(rows.len() + 1);
        out.push(header.into_iter().map(Cell::Text).collect());
        out.extend(rows);
        out
    }
}

// =============================================================================
// Column classification
// =============================================================================

/// Kind flags for one column, as supplied by the caller.
///
/// Deserializes from either the named object or the positional flag tuple
/// `[numeric, text, other, date]` (booleans or 0/1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClassificationRepr")]
pub struct ColumnClassification {
    pub numeric: bool,
    pub text: bool,
    pub other: bool,
    pub date: bool,
}

impl ColumnClassification {
    pub fn numeric() -> Self {
        Self {
            numeric: true,
            ..Self::default()
        }
    }

    pub fn text() -> Self {
        Self {
            text: true,
            ..Self::default()
        }
    }

    pub fn other() -> Self {
        Self {
            other: true,
            ..Self::default()
        }
    }

    pub fn date() -> Self {
        Self {
            date: true,
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

#[derive(Deserialize)]
struct NamedFlags {
    #[serde(default)]
    numeric: bool,
    #[serde(default)]
    text: bool,
    #[serde(default)]
    other: bool,
    #[serde(default)]
    date: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationRepr {
    Positional(Vec<Flag>),
    Named(NamedFlags),
}

impl TryFrom<ClassificationRepr> for ColumnClassification {
    type Error = String;

    fn try_from(value: ClassificationRepr) -> std::result::Result<Self, Self::Error> {
        match value {
            ClassificationRepr::Positional(flags) => match flags.as_slice() {
                [numeric, text, other, date, ..] => Ok(Self {
                    numeric: numeric.is_set(),
                    text: text.is_set(),
                    other: other.is_set(),
                    date: date.is_set(),
                }),
                _ => Err(format!(
                    "classification needs at least 4 flags, got {}",
                    flags.len()
                )),
            },
            ClassificationRepr::Named(named) => Ok(Self {
                numeric: named.numeric,
                text: named.text,
                other: named.other,
                date: named.date,
            }),
        }
    }
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(ColumnClassification: Send, Sync);
