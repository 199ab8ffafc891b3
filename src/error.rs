//! Error types for planscope.
//!
//! The builders themselves are best-effort and only fail on structurally
//! invalid input; everything else here belongs to the loading, settings and
//! output plumbing around them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for planscope.
#[derive(Debug, Error)]
pub enum PlanscopeError {
    /// Plan document errors.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Settings file errors.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Errors while writing generated assets.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in the plan document handed to the pipeline.
#[derive(Debug, Error)]
pub enum InputError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The plan document could not be parsed.
    #[error("Failed to parse plan: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The plan carries no root configuration module.
    #[error("Plan document has no root configuration module")]
    MissingRootConfig,
}

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file was not found.
    #[error("Settings file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The settings file could not be parsed.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Settings validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// No plan file was given on the command line or in settings.
    #[error("No plan file given (use --plan or set plan_file in settings)")]
    MissingPlanFile,
}

/// Errors while serializing or writing assets.
#[derive(Debug, Error)]
pub enum OutputError {
    /// An asset could not be serialized.
    #[error("Failed to serialize {asset}: {message}")]
    Serialization {
        /// Name of the asset.
        asset: String,
        /// Description of the serialization error.
        message: String,
    },

    /// An asset could not be written.
    #[error("Failed to write {path}: {message}")]
    WriteFailed {
        /// Target path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for planscope operations.
pub type Result<T> = std::result::Result<T, PlanscopeError>;

impl PlanscopeError {
    /// Returns true if the error was caused by the input document rather
    /// than by the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl InputError {
    /// Creates a parse error for the given location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl SettingsError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl OutputError {
    /// Creates a serialization error for the named asset.
    #[must_use]
    pub fn serialization(asset: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            asset: asset.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = PlanscopeError::from(InputError::MissingRootConfig);
        assert!(err.is_input_error());
        assert_eq!(
            err.to_string(),
            "Input error: Plan document has no root configuration module"
        );
    }

    #[test]
    fn test_settings_validation_field() {
        let err = SettingsError::validation("Name cannot be empty", "name");
        match err {
            SettingsError::ValidationError { field, .. } => {
                assert_eq!(field.as_deref(), Some("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
