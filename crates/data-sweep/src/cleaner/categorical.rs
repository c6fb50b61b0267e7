//! Categorical value remapping.

use crate::types::{Cell, Dataset};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Replaces raw category strings with a standard vocabulary.
pub struct CategoricalMapper;

impl CategoricalMapper {
    /// Pair raw values with their replacements position by position.
    pub fn build_mapping(
        unique_values: &[String],
        standard_format: &[String],
    ) -> HashMap<String, String> {
        if unique_values.len() != standard_format.len() {
            warn!(
                "Mapping lists differ in length ({} raw vs {} standard); extra entries ignored",
                unique_values.len(),
                standard_format.len()
            );
        }
        unique_values
            .iter()
            .cloned()
            .zip(standard_format.iter().cloned())
            .collect()
    }

    /// Replace every cell of `column` through the mapping.
    ///
    /// The column is matched by uppercasing both the header names and the
    /// target. Values without an entry become null. When the column does not
    /// exist the dataset is returned unchanged.
    pub fn apply(
        mut dataset: Dataset,
        column: &str,
        unique_values: &[String],
        standard_format: &[String],
    ) -> Dataset {
        let Some(idx) = dataset.find_column(column) else {
            warn!("Column '{}' not found; mapping skipped", column);
            return dataset;
        };

        let mapping = Self::build_mapping(unique_values, standard_format);
        let mut unmapped = 0usize;

        dataset.update_column(idx, |cell| {
            let replacement = cell
                .lookup_key()
                .and_then(|key| mapping.get(key.as_ref()).cloned());
            if replacement.is_none() && !matches!(cell, Cell::Null) {
                unmapped += 1;
            }
            *cell = replacement.map_or(Cell::Null, Cell::Text);
        });

        debug!(
            "Mapped column '{}' with {} entries; {} value(s) had no mapping",
            column,
            mapping.len(),
            unmapped
        );
        dataset
    }
}
