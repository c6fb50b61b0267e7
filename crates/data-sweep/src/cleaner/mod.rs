//! Value-level cleaning operations.
//!
//! This module provides functionality for:
//! - Remapping categorical values to a standard vocabulary
//! - Normalizing text casing per column
//! - Removing columns and duplicate rows

pub mod categorical;
pub mod casing;
pub mod columns;

pub use casing::{CasingMode, CasingNormalizer};
pub use categorical::CategoricalMapper;
pub use columns::{drop_duplicate_rows, remove_columns, remove_columns_frame};
