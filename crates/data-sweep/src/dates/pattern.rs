//! A single strftime-style candidate pattern.
//!
//! chrono is lenient about field widths (`%Y` happily reads `15` as year 15),
//! so every pattern carries an anchored regex guard enforcing strptime widths
//! before chrono does the calendar validation.

use crate::error::{CleaningError, Result};
use chrono::NaiveDate;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct DatePattern {
    format: String,
    guard: Regex,
}

impl DatePattern {
    /// Compile a pattern such as `%m/%d/%Y`.
    pub fn compile(format: &str) -> Result<Self> {
        let guard = Regex::new(&guard_source(format)).map_err(|e| {
            CleaningError::InvalidConfig(format!("date pattern '{format}': {e}"))
        })?;
        Ok(Self {
            format: format.to_string(),
            guard,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse the whole of `text`, or nothing.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        if !self.guard.is_match(text) {
            return None;
        }
        NaiveDate::parse_from_str(text, &self.format).ok()
    }
}

/// Translate a strftime pattern into an anchored regex with strptime widths.
fn guard_source(format: &str) -> String {
    let mut out = String::from("^");
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' => match chars.next() {
                Some('Y') => out.push_str(r"\d{4}"),
                Some('y') => out.push_str(r"\d{2}"),
                Some('m') | Some('d') => out.push_str(r"\d{1,2}"),
                Some('b') => out.push_str(r"[A-Za-z]{3}"),
                Some('B') => out.push_str(r"[A-Za-z]+"),
                Some('%') => out.push('%'),
                // chrono validates anything else
                Some(_) => out.push_str(".+?"),
                None => out.push('%'),
            },
            c if c.is_whitespace() => out.push_str(r"\s+"),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}
