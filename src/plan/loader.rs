//! Plan document loading.
//!
//! Reads a plan document that an external `show -json` run already wrote to
//! disk. Producing the plan is not this crate's business.

use std::path::Path;
use tracing::{debug, info};

use crate::error::{InputError, PlanscopeError, Result};

use super::types::PlanDocument;

/// Loader for plan documents stored as JSON.
#[derive(Debug, Default)]
pub struct PlanLoader;

impl PlanLoader {
    /// Creates a new plan loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a plan document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<PlanDocument> {
        let path = path.as_ref();
        info!("Loading plan from: {}", path.display());

        if !path.exists() {
            return Err(PlanscopeError::Input(InputError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanscopeError::Input(InputError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            ))
        })?;

        self.parse_json(&content, Some(path))
    }

    /// Parses a plan document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or does not match the plan
    /// format.
    pub fn parse_json(&self, content: &str, source: Option<&Path>) -> Result<PlanDocument> {
        debug!("Parsing plan JSON");

        let plan: PlanDocument = serde_json::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PlanscopeError::Input(InputError::parse(format!("JSON parse error: {e}"), location))
        })?;

        debug!(
            "Parsed plan with {} resource changes and {} output changes",
            plan.resource_changes.len(),
            plan.output_changes.len()
        );
        Ok(plan)
    }
}
