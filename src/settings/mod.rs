//! Settings for planscope runs.
//!
//! This module handles:
//! - Parsing `planscope.yaml`
//! - Environment and `.env` overrides
//! - Validation of settings values

mod parser;
mod spec;
mod validator;

pub use parser::{
    DEFAULT_SETTINGS_FILES, ENV_NAME, ENV_OUTPUT_DIR, ENV_PLAN_FILE, ENV_SHOW_SENSITIVE,
    SettingsParser, find_settings_file,
};
pub use spec::ViewerSettings;
pub use validator::{SettingsValidator, ValidationError, ValidationResult};
