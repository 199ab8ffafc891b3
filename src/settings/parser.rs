//! Settings loading.
//!
//! Settings come from `planscope.yaml`, then environment variables, then
//! command-line flags, each layer overriding the previous one. The last
//! layer is applied by the CLI.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{PlanscopeError, Result, SettingsError};

use super::spec::ViewerSettings;

/// Environment variable overriding `name`.
pub const ENV_NAME: &str = "PLANSCOPE_NAME";
/// Environment variable overriding `plan_file`.
pub const ENV_PLAN_FILE: &str = "PLANSCOPE_PLAN_FILE";
/// Environment variable overriding `output_dir`.
pub const ENV_OUTPUT_DIR: &str = "PLANSCOPE_OUTPUT_DIR";
/// Environment variable overriding `show_sensitive`.
pub const ENV_SHOW_SENSITIVE: &str = "PLANSCOPE_SHOW_SENSITIVE";

/// Default settings file names to search for.
pub const DEFAULT_SETTINGS_FILES: &[&str] = &["planscope.yaml", "planscope.yml"];

/// Parser for viewer settings.
#[derive(Debug, Default)]
pub struct SettingsParser {
    /// Directory searched for a `.env` file.
    base_path: Option<PathBuf>,
}

impl SettingsParser {
    /// Creates a new settings parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the directory searched for a `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ViewerSettings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(PlanscopeError::Settings(SettingsError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanscopeError::Settings(SettingsError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses settings from a YAML string. An empty document yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ViewerSettings> {
        debug!("Parsing YAML settings");

        if content.trim().is_empty() {
            debug!("Settings file is empty, using defaults");
            return Ok(ViewerSettings::default());
        }

        let settings: ViewerSettings = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PlanscopeError::Settings(SettingsError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Parsed settings for: {}", settings.name);
        Ok(settings)
    }

    /// Loads settings from a file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<ViewerSettings> {
        let mut settings = self.load_file(path)?;
        Self::apply_overrides(&mut settings, |key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides(settings: &mut ViewerSettings, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup(ENV_NAME) {
            debug!("Overriding name from environment");
            settings.name = name;
        }

        if let Some(plan_file) = lookup(ENV_PLAN_FILE) {
            debug!("Overriding plan_file from environment");
            settings.plan_file = Some(PathBuf::from(plan_file));
        }

        if let Some(output_dir) = lookup(ENV_OUTPUT_DIR) {
            debug!("Overriding output_dir from environment");
            settings.output_dir = PathBuf::from(output_dir);
        }

        if let Some(raw) = lookup(ENV_SHOW_SENSITIVE) {
            match parse_flag(&raw) {
                Some(show_sensitive) => {
                    debug!("Overriding show_sensitive from environment");
                    settings.show_sensitive = show_sensitive;
                }
                None => warn!("Ignoring {}: '{}' is not a boolean", ENV_SHOW_SENSITIVE, raw),
            }
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                PlanscopeError::Settings(SettingsError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Finds the settings file in a directory or its parents.
///
/// # Errors
///
/// Returns an error if no settings file is found.
pub fn find_settings_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_SETTINGS_FILES {
            let settings_path = current.join(filename);
            if settings_path.exists() {
                info!("Found settings file: {}", settings_path.display());
                return Ok(settings_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(PlanscopeError::Settings(SettingsError::FileNotFound {
        path: start.join(DEFAULT_SETTINGS_FILES[0]),
    }))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let yaml = r"
name: staging-network
plan_file: plans/staging.json
output_dir: out
show_sensitive: true
config_available: false
";
        let settings = SettingsParser::new()
            .parse_yaml(yaml, None)
            .expect("valid settings");

        assert_eq!(settings.name, "staging-network");
        assert_eq!(settings.plan_file, Some(PathBuf::from("plans/staging.json")));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert!(settings.show_sensitive);
        assert!(!settings.config_available);
    }

    #[test]
    fn test_parse_empty_settings() {
        let settings = SettingsParser::new()
            .parse_yaml("\n", None)
            .expect("empty settings");
        assert_eq!(settings, ViewerSettings::default());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = SettingsParser::new().parse_yaml("name: [unclosed", None);
        assert!(matches!(
            result,
            Err(PlanscopeError::Settings(SettingsError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_NAME, "from-env"),
            (ENV_PLAN_FILE, "env-plan.json"),
            (ENV_SHOW_SENSITIVE, "yes"),
        ]);
        let mut settings = ViewerSettings::default();

        SettingsParser::apply_overrides(&mut settings, |key| {
            env.get(key).map(|value| (*value).to_string())
        });

        assert_eq!(settings.name, "from-env");
        assert_eq!(settings.plan_file, Some(PathBuf::from("env-plan.json")));
        assert_eq!(settings.output_dir, ViewerSettings::default().output_dir);
        assert!(settings.show_sensitive);
    }

    #[test]
    fn test_invalid_flag_override_is_ignored() {
        let mut settings = ViewerSettings::default();
        SettingsParser::apply_overrides(&mut settings, |key| {
            (key == ENV_SHOW_SENSITIVE).then(|| String::from("maybe"))
        });
        assert!(!settings.show_sensitive);
    }

    #[test]
    fn test_find_settings_file_in_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("envs").join("staging");
        std::fs::create_dir_all(&nested).expect("Failed to create dirs");
        let settings_path = temp_dir.path().join("planscope.yml");
        std::fs::write(&settings_path, "name: root\n").expect("Failed to write settings");

        let found = find_settings_file(&nested).expect("settings found");
        assert_eq!(found, settings_path);

        let settings = SettingsParser::new()
            .load_file(&found)
            .expect("settings load");
        assert_eq!(settings.name, "root");
    }

    #[test]
    fn test_load_missing_file() {
        let result = SettingsParser::new().load_file("/nonexistent/planscope.yaml");
        assert!(matches!(
            result,
            Err(PlanscopeError::Settings(SettingsError::FileNotFound { .. }))
        ));
    }
}
