//! Viewer settings types.
//!
//! These map to the `planscope.yaml` file. Every field has a default, so an
//! empty file is a valid settings file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::overview::BuildOptions;

/// Settings of a planscope run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerSettings {
    /// Name recorded in the asset manifest.
    #[serde(default = "default_name")]
    pub name: String,
    /// Plan document to render.
    #[serde(default)]
    pub plan_file: Option<PathBuf>,
    /// Directory the assets are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Keep sensitive values instead of redacting them.
    #[serde(default)]
    pub show_sensitive: bool,
    /// Whether the configuration files are locally available, so that
    /// declaration positions can be trusted.
    #[serde(default = "default_config_available")]
    pub config_available: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            plan_file: None,
            output_dir: default_output_dir(),
            show_sensitive: false,
            config_available: default_config_available(),
        }
    }
}

impl ViewerSettings {
    /// Returns the builder options these settings select.
    #[must_use]
    pub const fn build_options(&self) -> BuildOptions {
        BuildOptions {
            show_sensitive: self.show_sensitive,
            config_available: self.config_available,
        }
    }
}

fn default_name() -> String {
    String::from("planscope")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("planscope-out")
}

const fn default_config_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: ViewerSettings = serde_yaml::from_str("{}").expect("valid settings");
        assert_eq!(settings, ViewerSettings::default());
        assert_eq!(settings.build_options(), BuildOptions::default());
    }

    #[test]
    fn test_build_options() {
        let settings = ViewerSettings {
            show_sensitive: true,
            config_available: false,
            ..ViewerSettings::default()
        };
        let options = settings.build_options();
        assert!(options.show_sensitive);
        assert!(!options.config_available);
    }
}
