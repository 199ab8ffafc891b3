//! Object kinds and change actions shared by every projection.

use serde::{Deserialize, Serialize};

use crate::plan::{Action, ResourceMode};

/// Display color of variables.
pub const VARIABLE_COLOR: &str = "#1d7ada";
/// Display color of outputs.
pub const OUTPUT_COLOR: &str = "#ffc107";
/// Display color of data sources.
pub const DATA_COLOR: &str = "#dc477d";
/// Display color of modules.
pub const MODULE_COLOR: &str = "#8450ba";
/// Display color of local values.
pub const LOCAL_COLOR: &str = "black";
/// Display color of everything else.
pub const NEUTRAL_COLOR: &str = "lightgray";

/// Kind of a declared or realized object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A declaring file (map and graph only).
    File,
    /// A module, module call or module instance.
    Module,
    /// A managed resource.
    Resource,
    /// A data source.
    Data,
    /// An input variable.
    Variable,
    /// An output.
    Output,
    /// A local value.
    Local,
}

/// The change derived from a plan's action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
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
    /// The object is destroyed and created again.
    Replace,
}

impl ObjectKind {
    /// Returns the fixed display color of this kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Module => MODULE_COLOR,
            Self::Data => DATA_COLOR,
            Self::Output => OUTPUT_COLOR,
            Self::Variable => VARIABLE_COLOR,
            Self::Local => LOCAL_COLOR,
            Self::File | Self::Resource => NEUTRAL_COLOR,
        }
    }

    /// Returns the renderer class of a grouping node of this kind.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Data => "data-type",
            Self::Output => "output",
            Self::Variable => "variable",
            Self::File => "fname",
            Self::Local => "locals",
            Self::Module => "module",
            Self::Resource => "resource-type",
        }
    }

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Module => "module",
            Self::Resource => "resource",
            Self::Data => "data",
            Self::Variable => "variable",
            Self::Output => "output",
            Self::Local => "local",
        }
    }
}

impl From<ResourceMode> for ObjectKind {
    fn from(mode: ResourceMode) -> Self {
        match mode {
            ResourceMode::Managed => Self::Resource,
            ResourceMode::Data => Self::Data,
        }
    }
}

impl ChangeAction {
    /// Reduces an action list to a single change action.
    ///
    /// One action maps to itself, several actions denote a replace, and an
    /// empty list means no change was recorded.
    #[must_use]
    pub fn from_actions(actions: &[Action]) -> Option<Self> {
        match actions {
            [] => None,
            [single] => Some(Self::from(*single)),
            _ => Some(Self::Replace),
        }
    }

    /// Returns the action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Replace => "replace",
        }
    }
}

impl From<Action> for ChangeAction {
    fn from(action: Action) -> Self {
        match action {
            Action::NoOp => Self::NoOp,
            Action::Create => Self::Create,
            Action::Read => Self::Read,
            Action::Update => Self::Update,
            Action::Delete => Self::Delete,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_action() {
        assert_eq!(
            ChangeAction::from_actions(&[Action::Create]),
            Some(ChangeAction::Create)
        );
        assert_eq!(
            ChangeAction::from_actions(&[Action::NoOp]),
            Some(ChangeAction::NoOp)
        );
    }

    #[test]
    fn test_multiple_actions_replace() {
        assert_eq!(
            ChangeAction::from_actions(&[Action::Delete, Action::Create]),
            Some(ChangeAction::Replace)
        );
        assert_eq!(
            ChangeAction::from_actions(&[Action::Create, Action::Delete]),
            Some(ChangeAction::Replace)
        );
    }

    #[test]
    fn test_no_actions() {
        assert_eq!(ChangeAction::from_actions(&[]), None);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&ChangeAction::NoOp).expect("serializes"),
            "\"no-op\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectKind::Variable).expect("serializes"),
            "\"variable\""
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(ObjectKind::Module.color(), "#8450ba");
        assert_eq!(ObjectKind::Resource.color(), "lightgray");
        assert_eq!(ObjectKind::from(ResourceMode::Data), ObjectKind::Data);
    }
}
