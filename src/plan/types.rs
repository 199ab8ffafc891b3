//! Plan document and realized state types.
//!
//! These mirror the JSON emitted by the planning engine's `show -json`
//! command. Only the fields used to build the overview are modelled; unknown
//! fields are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::{ConfigModule, Configuration};

/// A complete plan document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Plan format version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// Version of the planning engine that produced the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    /// Root input variable values.
    #[serde(default)]
    pub variables: IndexMap<String, PlanVariable>,
    /// Flat list of per-instance resource changes.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
    /// Root output changes, keyed by output name.
    #[serde(default)]
    pub output_changes: IndexMap<String, Change>,
    /// State before the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_state: Option<StateSnapshot>,
    /// State after the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_values: Option<StateValues>,
    /// Configuration tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
}

/// Value of a root input variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanVariable {
    /// The variable value.
    #[serde(default)]
    pub value: Option<Value>,
}

/// A state snapshot wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// State format version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// State values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<StateValues>,
}

/// Realized values of a state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateValues {
    /// Root output values.
    #[serde(default)]
    pub outputs: IndexMap<String, StateOutput>,
    /// Root module of the state tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_module: Option<StateModule>,
}

/// A realized output value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateOutput {
    /// Whether the value is sensitive.
    #[serde(default)]
    pub sensitive: bool,
    /// The value.
    #[serde(default)]
    pub value: Option<Value>,
}

/// A module in the realized state tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateModule {
    /// Module address, absent for the root module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Realized resource instances of this module.
    #[serde(default)]
    pub resources: Vec<StateResource>,
    /// Child module instances. Module calls that expanded to zero
    /// instances have no entry.
    #[serde(default)]
    pub child_modules: Vec<StateModule>,
}

/// A realized resource instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResource {
    /// Fully qualified instance address.
    pub address: String,
    /// Resource mode.
    #[serde(default)]
    pub mode: ResourceMode,
    /// Resource type.
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Resource name.
    #[serde(default)]
    pub name: String,
    /// Repetition index, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    /// Provider that manages the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Attribute values, present once materialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
}

/// Resource mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// A managed resource.
    #[default]
    Managed,
    /// A data source.
    Data,
}

/// A planned change to one resource instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Fully qualified instance address.
    pub address: String,
    /// Address of the module containing the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_address: Option<String>,
    /// Resource mode.
    #[serde(default)]
    pub mode: ResourceMode,
    /// Resource type.
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Resource name.
    #[serde(default)]
    pub name: String,
    /// Repetition index, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    /// Provider that manages the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// The change itself.
    pub change: Change,
}

/// Before/after snapshot of a resource or output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Change {
    /// Actions the engine will take. More than one action denotes a replace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// Value before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Value after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    /// Parts of the after value unknown until apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_unknown: Option<Value>,
    /// Sensitivity marks of the before value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sensitive: Option<Value>,
    /// Sensitivity marks of the after value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_sensitive: Option<Value>,
}

/// A single planned action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Nothing changes.
    #[serde(rename = "no-op")]
    NoOp,
    /// The object is created.
    Create,
    /// The data source is read.
    Read,
    /// The object is updated in place.
    Update,
    /// The object is destroyed.
    Delete,
}

impl PlanDocument {
    /// Returns the root configuration module, if the plan carries one.
    #[must_use]
    pub fn root_config(&self) -> Option<&ConfigModule> {
        self.configuration.as_ref()?.root_module.as_ref()
    }

    /// Returns the root module of the prior state.
    #[must_use]
    pub fn prior_root(&self) -> Option<&StateModule> {
        self.prior_state.as_ref()?.values.as_ref()?.root_module.as_ref()
    }

    /// Returns the root module of the planned state.
    #[must_use]
    pub fn planned_root(&self) -> Option<&StateModule> {
        self.planned_values.as_ref()?.root_module.as_ref()
    }

    /// Returns a root output as realized in the prior state.
    #[must_use]
    pub fn prior_output(&self, name: &str) -> Option<&StateOutput> {
        self.prior_state.as_ref()?.values.as_ref()?.outputs.get(name)
    }

    /// Returns a root output as realized in the planned state.
    #[must_use]
    pub fn planned_output(&self, name: &str) -> Option<&StateOutput> {
        self.planned_values.as_ref()?.outputs.get(name)
    }

    /// Returns the value supplied for a root input variable.
    #[must_use]
    pub fn variable_value(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)?.value.as_ref()
    }
}

impl StateModule {
    /// Returns the module address, the empty string for the root module.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }
}

impl Change {
    /// Returns true if the before value is marked sensitive as a whole.
    #[must_use]
    pub fn before_is_sensitive(&self) -> bool {
        is_marked(self.before_sensitive.as_ref())
    }

    /// Returns true if the after value is marked sensitive as a whole.
    #[must_use]
    pub fn after_is_sensitive(&self) -> bool {
        is_marked(self.after_sensitive.as_ref())
    }
}

fn is_marked(mark: Option<&Value>) -> bool {
    matches!(mark, Some(Value::Bool(true)))
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_actions() {
        let change: Change = serde_json::from_value(json!({
            "actions": ["delete", "create"],
            "before": {"id": "i-1"},
            "after": null,
            "after_sensitive": true
        }))
        .expect("valid change");

        assert_eq!(change.actions, vec![Action::Delete, Action::Create]);
        assert!(change.after.is_none());
        assert!(change.after_is_sensitive());
        assert!(!change.before_is_sensitive());
    }

    #[test]
    fn test_nested_sensitivity_marks_are_not_whole_value() {
        let change: Change = serde_json::from_value(json!({
            "actions": ["update"],
            "after_sensitive": {"password": true}
        }))
        .expect("valid change");

        assert!(!change.after_is_sensitive());
    }

    #[test]
    fn test_missing_state_trees() {
        let plan: PlanDocument = serde_json::from_value(json!({
            "format_version": "1.2",
            "prior_state": {"format_version": "1.0"}
        }))
        .expect("valid plan");

        assert!(plan.prior_root().is_none());
        assert!(plan.planned_root().is_none());
        assert!(plan.root_config().is_none());
    }

    #[test]
    fn test_root_module_address_is_empty() {
        let module: StateModule = serde_json::from_value(json!({
            "resources": [{"address": "x.a", "mode": "managed", "type": "x", "name": "a"}]
        }))
        .expect("valid module");

        assert_eq!(module.address(), "");
        assert_eq!(module.resources[0].mode, ResourceMode::Managed);
    }
}
