//! Text casing transforms applied per column.

use crate::error::{CleaningError, Result};
use crate::types::{Cell, Dataset};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

// Words are maximal runs of non-whitespace; separators are kept verbatim.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("Invalid regex: word"));

/// Casing transform selected for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CasingMode {
    #[serde(rename = "UPPERCASE")]
    Upper,
    #[serde(rename = "lowercase")]
    Lower,
    #[serde(rename = "Title Case")]
    Title,
    #[serde(rename = "Sentence case")]
    Sentence,
    #[default]
    #[serde(rename = "None", alias = "none", alias = "(none)", alias = "")]
    Unchanged,
}

impl CasingMode {
    /// Transform a string.
    pub fn apply(&self, text: &str) -> String {
        match self {
            CasingMode::Upper => text.to_uppercase(),
            CasingMode::Lower => text.to_lowercase(),
            CasingMode::Title => title_case(text),
            CasingMode::Sentence => capitalize(text),
            CasingMode::Unchanged => text.to_string(),
        }
    }
}

/// First character title-cased, the rest lower-cased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    let mut out = String::with_capacity(text.len());
    if let Some(first) = chars.next() {
        push_titlecase(&mut out, first);
        out.push_str(&chars.as_str().to_lowercase());
    }
    out
}

/// Push the titlecase form of `c`, which differs from its uppercase form for
/// digraphs, Greek letters with iota subscript, `ß` and Latin ligatures.
fn push_titlecase(out: &mut String, c: char) {
    match c {
        '\u{01C4}'..='\u{01C6}' => out.push('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => out.push('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => out.push('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => out.push('\u{01F2}'),
        // lowercase ypogegrammeni to prosgegrammeni
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            out.extend(char::from_u32(c as u32 + 8));
        }
        '\u{1FB3}' => out.push('\u{1FBC}'),
        '\u{1FC3}' => out.push('\u{1FCC}'),
        '\u{1FF3}' => out.push('\u{1FFC}'),
        '\u{1F88}'..='\u{1F8F}'
        | '\u{1F98}'..='\u{1F9F}'
        | '\u{1FA8}'..='\u{1FAF}'
        | '\u{1FBC}'
        | '\u{1FCC}'
        | '\u{1FFC}' => out.push(c),
        '\u{00DF}' => out.push_str("Ss"),
        '\u{FB00}' => out.push_str("Ff"),
        '\u{FB01}' => out.push_str("Fi"),
        '\u{FB02}' => out.push_str("Fl"),
        '\u{FB03}' => out.push_str("Ffi"),
        '\u{FB04}' => out.push_str("Ffl"),
        '\u{FB05}' | '\u{FB06}' => out.push_str("St"),
        _ => out.extend(c.to_uppercase()),
    }
}

/// Capitalize each word; single-character words are upper-cased.
fn title_case(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures<'_>| {
        let word = &caps[0];
        if word.chars().count() == 1 {
            word.to_uppercase()
        } else {
            capitalize(word)
        }
    })
    .into_owned()
}

/// Applies one casing mode per column to text cells.
pub struct CasingNormalizer;

impl CasingNormalizer {
    /// Apply `selections[i]` to column `i`. The header row is never touched
    /// and non-text cells are left as they are.
    pub fn apply(mut dataset: Dataset, selections: &[CasingMode]) -> Result<Dataset> {
        if selections.len() != dataset.width() {
            return Err(CleaningError::SelectionMismatch {
                expected: dataset.width(),
                found: selections.len(),
            });
        }

        for (idx, mode) in selections.iter().enumerate() {
            if *mode == CasingMode::Unchanged {
                continue;
            }
            let mut changed = 0usize;
            dataset.update_column(idx, |cell| {
                if let Cell::Text(text) = cell {
                    let cased = mode.apply(text);
                    if *text != cased {
                        *text = cased;
                        changed += 1;
                    }
                }
            });
            debug!("Column {}: {:?} changed {} cell(s)", idx, mode, changed);
        }

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_case_single_letter_words() {
        assert_eq!(CasingMode::Title.apply("a big test"), "A Big Test");
        assert_eq!(CasingMode::Title.apply("i LOVE rust"), "I Love Rust");
    }

    #[test]
    fn test_title_case_keeps_whitespace() {
        assert_eq!(CasingMode::Title.apply("  new   york "), "  New   York ");
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(
            CasingMode::Sentence.apply("hello WORLD. second SENTENCE"),
            "Hello world. second sentence"
        );
        assert_eq!(CasingMode::Sentence.apply(""), "");
    }

    #[test]
    fn test_first_letter_is_titlecased() {
        assert_eq!(
            CasingMode::Title.apply("\u{01C6}emal bijedi\u{0107}"),
            "\u{01C5}emal Bijedi\u{0107}"
        );
        assert_eq!(CasingMode::Sentence.apply("\u{01C9}ubljana"), "\u{01C8}ubljana");
        assert_eq!(CasingMode::Sentence.apply("\u{01C7}UBLJANA"), "\u{01C8}ubljana");
        assert_eq!(
            CasingMode::Title.apply("\u{1FB3}\u{03B4}\u{03C9}"),
            "\u{1FBC}\u{03B4}\u{03C9}"
        );
        assert_eq!(CasingMode::Title.apply("\u{FB01}nance office"), "Finance Office");
        assert_eq!(CasingMode::Sentence.apply("\u{00DF}tra\u{00DF}e"), "Sstra\u{00DF}e");
    }

    #[test]
    fn test_final_sigma_lowercased() {
        assert_eq!(
            CasingMode::Sentence.apply("\u{039F}\u{0394}\u{039F}\u{03A3}"),
            "\u{039F}\u{03B4}\u{03BF}\u{03C2}"
        );
    }

    #[test]
    fn test_upper_and_lower() {
        assert_eq!(CasingMode::Upper.apply("MiXeD"), "MIXED");
        assert_eq!(CasingMode::Lower.apply("MiXeD"), "mixed");
    }

    #[test]
    fn test_casing_mode_labels() {
        let modes: Vec<CasingMode> = serde_json::from_value(json!([
            "UPPERCASE",
            "lowercase",
            "Title Case",
            "Sentence case",
            "None",
            ""
        ]))
        .unwrap();
        assert_eq!(
            modes,
            vec![
                CasingMode::Upper,
                CasingMode::Lower,
                CasingMode::Title,
                CasingMode::Sentence,
                CasingMode::Unchanged,
                CasingMode::Unchanged
            ]
        );
    }

    #[test]
    fn test_apply_per_column() {
        let dataset: Dataset = serde_json::from_value(json!([
            ["name", "city", "code"],
            ["john smith", "new york", 42],
            ["a b", null, "x1"]
        ]))
        .unwrap();

        let result = CasingNormalizer::apply(
            dataset,
            &[CasingMode::Title, CasingMode::Upper, CasingMode::Unchanged],
        )
        .unwrap();

        assert_eq!(result.header(), &["name", "city", "code"]);
        assert_eq!(result.rows()[0][0], Cell::text("John Smith"));
        assert_eq!(result.rows()[1][0], Cell::text("A B"));
        assert_eq!(result.rows()[0][1], Cell::text("NEW YORK"));
        assert_eq!(result.rows()[1][1], Cell::Null);
        assert_eq!(result.rows()[0][2], Cell::Number(42.0));
        assert_eq!(result.rows()[1][2], Cell::text("x1"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dataset: Dataset =
            serde_json::from_value(json!([["t"], ["the QUICK brown fox"], ["x"]])).unwrap();
        for mode in [
            CasingMode::Upper,
            CasingMode::Lower,
            CasingMode::Title,
            CasingMode::Sentence,
        ] {
            let once = CasingNormalizer::apply(dataset.clone(), &[mode]).unwrap();
            let twice = CasingNormalizer::apply(once.clone(), &[mode]).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_selection_length_checked() {
        let dataset: Dataset = serde_json::from_value(json!([["a", "b"], ["x", "y"]])).unwrap();
        let err = CasingNormalizer::apply(dataset, &[CasingMode::Upper]).unwrap_err();
        assert!(matches!(
            err,
            CleaningError::SelectionMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}
