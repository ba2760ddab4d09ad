//! Custom error types for Finsight
//!
//! The analytics core never fails; these errors belong to the outer layers
//! (configuration, input loading, export and model validation).

use thiserror::Error;

/// The main error type for Finsight operations
#[derive(Error, Debug)]
pub enum FinsightError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed analysis input
    #[error("Input error: {0}")]
    Input(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl FinsightError {
    /// Create a "not found" error for input files
    pub fn input_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Input file",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FinsightError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinsightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FinsightError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for FinsightError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for Finsight operations
pub type FinsightResult<T> = Result<T, FinsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinsightError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinsightError::input_not_found("march.json");
        assert_eq!(err.to_string(), "Input file not found: march.json");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinsightError = io_err.into();
        assert!(matches!(err, FinsightError::Io(_)));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{ not: a list").unwrap_err();
        let err: FinsightError = yaml_err.into();
        assert!(matches!(err, FinsightError::Yaml(_)));
    }
}
