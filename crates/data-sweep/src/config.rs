//! Configuration for the cleaning engine.
//!
//! The only tunables are the candidate date format lists. Defaults match the
//! formats the front end has always relied on; order matters because parsing
//! stops at the first pattern that matches.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Candidate input formats for reformatting date columns.
pub const DEFAULT_REFORMAT_FORMATS: [&str; 3] = ["%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Candidate input formats for date validity checks.
pub const DEFAULT_VALIDITY_FORMATS: [&str; 8] = [
    "%m-%d-%y",
    "%d-%m-%y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%b %d, %Y",
    "%b. %d, %Y",
    "%B %d, %Y",
];

/// Configuration for the cleaning engine.
///
/// Use [`CleaningConfig::builder()`] for a fluent setup, or deserialize it
/// from JSON.
///
/// # Example
///
/// ```rust,ignore
/// use data_sweep::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .reformat_formats(["%m/%d/%Y", "%Y/%m/%d"])
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Ordered patterns tried when reformatting dates.
    pub reformat_formats: Vec<String>,

    /// Ordered patterns tried when counting invalid dates.
    pub validity_formats: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            reformat_formats: DEFAULT_REFORMAT_FORMATS.iter().map(|f| f.to_string()).collect(),
            validity_formats: DEFAULT_VALIDITY_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_formats("reformat_formats", &self.reformat_formats)?;
        validate_formats("validity_formats", &self.validity_formats)?;
        Ok(())
    }
}

fn validate_formats(field: &str, formats: &[String]) -> Result<(), ConfigValidationError> {
    if formats.is_empty() {
        return Err(ConfigValidationError::EmptyFormatList(field.to_string()));
    }
    for format in formats {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigValidationError::InvalidPattern {
                field: field.to_string(),
                pattern: format.clone(),
            });
        }
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Format list '{0}' must not be empty")]
    EmptyFormatList(String),

    #[error("Invalid date pattern '{pattern}' in '{field}'")]
    InvalidPattern { field: String, pattern: String },
}

impl From<ConfigValidationError> for crate::error::CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    reformat_formats: Option<Vec<String>>,
    validity_formats: Option<Vec<String>>,
}

impl CleaningConfigBuilder {
    /// Set the ordered candidate formats used when reformatting.
    pub fn reformat_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reformat_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Set the ordered candidate formats used for validity checks.
    pub fn validity_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validity_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            reformat_formats: self.reformat_formats.unwrap_or(defaults.reformat_formats),
            validity_formats: self.validity_formats.unwrap_or(defaults.validity_formats),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.reformat_formats.len(), 3);
        assert_eq!(config.reformat_formats[0], "%m/%d/%Y");
        assert_eq!(config.validity_formats.len(), 8);
        assert_eq!(config.validity_formats[0], "%m-%d-%y");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .reformat_formats(["%Y/%m/%d"])
            .build()
            .unwrap();
        assert_eq!(config.reformat_formats, vec!["%Y/%m/%d".to_string()]);
        assert_eq!(config.validity_formats.len(), 8);
    }

    #[test]
    fn test_validation_empty_list() {
        let result = CleaningConfig::builder()
            .validity_formats(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyFormatList(_)
        ));
    }

    #[test]
    fn test_validation_bad_pattern() {
        let result = CleaningConfig::builder().reformat_formats(["%m/%d/%"]).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "reformat_formats": ["%d/%m/%Y"] }"#;
        let config: CleaningConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.reformat_formats, vec!["%d/%m/%Y".to_string()]);
        assert_eq!(config.validity_formats.len(), 8);
    }
}
