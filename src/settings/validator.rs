//! Settings validation.

use tracing::debug;

use crate::error::{PlanscopeError, Result, SettingsError};

use super::spec::ViewerSettings;

/// Validator for viewer settings.
#[derive(Debug, Default)]
pub struct SettingsValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl SettingsValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates settings.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, settings: &ViewerSettings) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        if settings.name.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: String::from("Name cannot be empty"),
            });
        } else if !is_valid_name(&settings.name) {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: format!(
                    "Name '{}' is invalid. Must be lowercase alphanumeric with hyphens.",
                    settings.name
                ),
            });
        }

        if settings.output_dir.as_os_str().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("output_dir"),
                message: String::from("Output directory cannot be empty"),
            });
        }

        if settings
            .plan_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            result.errors.push(ValidationError {
                field: String::from("plan_file"),
                message: String::from("Plan file path cannot be empty"),
            });
        }

        if settings.show_sensitive {
            result
                .warnings
                .push(String::from("Sensitive values will be written unredacted"));
        }

        if !settings.config_available {
            result.warnings.push(String::from(
                "Configuration files unavailable, objects are grouped under 'unknown'",
            ));
        }

        if result.errors.is_empty() {
            debug!("Settings validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(PlanscopeError::Settings(SettingsError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }
}

/// Checks a name: lowercase alphanumeric and hyphens, starting with a
/// letter and not ending with a hyphen.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }

    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return false;
    }

    !name.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("planscope"));
        assert!(is_valid_name("staging-network-2"));
        assert!(!is_valid_name("Staging"));
        assert!(!is_valid_name("2-network"));
        assert!(!is_valid_name("network-"));
        assert!(!is_valid_name("net_work"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_default_settings_are_valid() {
        let result = SettingsValidator::new()
            .validate(&ViewerSettings::default())
            .expect("defaults validate");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let settings = ViewerSettings {
            name: String::from("Not Valid"),
            ..ViewerSettings::default()
        };
        let err = SettingsValidator::new()
            .validate(&settings)
            .expect_err("invalid name");
        match err {
            PlanscopeError::Settings(SettingsError::ValidationError { field, .. }) => {
                assert_eq!(field.as_deref(), Some("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        let settings = ViewerSettings {
            plan_file: Some(PathBuf::new()),
            ..ViewerSettings::default()
        };
        assert!(SettingsValidator::new().validate(&settings).is_err());

        let settings = ViewerSettings {
            output_dir: PathBuf::new(),
            ..ViewerSettings::default()
        };
        assert!(SettingsValidator::new().validate(&settings).is_err());
    }

    #[test]
    fn test_warnings() {
        let settings = ViewerSettings {
            show_sensitive: true,
            config_available: false,
            ..ViewerSettings::default()
        };
        let result = SettingsValidator::new()
            .validate(&settings)
            .expect("valid settings");
        assert_eq!(result.warnings.len(), 2);
    }
}
