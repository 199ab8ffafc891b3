//! Map node types.

use indexmap::IndexMap;
use serde::Serialize;

use crate::overview::{ChangeAction, ObjectKind};
use crate::plan::ProviderRequirement;

/// One node of the resource map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapNode {
    /// Kind of the node.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Display name.
    pub name: String,
    /// Declaration line, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Child nodes keyed by id, in insertion order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, MapNode>,
    /// Planned change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_action: Option<ChangeAction>,
    /// Whether a variable must be supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether a variable or output is sensitive.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// Provider configuration key of a resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Resource type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Source of a module or file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Version constraint of a module call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The file-organized view of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceMap {
    /// Path of the root module.
    pub path: String,
    /// Required core version constraints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_core: Vec<String>,
    /// Required providers of the root module.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub required_providers: IndexMap<String, ProviderRequirement>,
    /// Synthetic root module node.
    pub root: MapNode,
}

impl MapNode {
    /// Creates a bare node.
    #[must_use]
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            line: None,
            children: IndexMap::new(),
            change_action: None,
            required: None,
            sensitive: false,
            provider: None,
            resource_type: None,
            source: None,
            version: None,
        }
    }

    /// Creates a file node for a file of a module.
    #[must_use]
    pub fn file(name: &str, module_source: &str) -> Self {
        let mut node = Self::new(ObjectKind::File, name);
        node.source = Some(format!("{module_source}/{name}"));
        node
    }

    /// Finds a node by id anywhere below this node, depth first.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        self.children.get(id).or_else(|| {
            self.children
                .values()
                .find_map(|child| child.find(id))
        })
    }
}

impl ResourceMap {
    /// Finds a node by id anywhere in the map.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MapNode> {
        self.root.find(id)
    }
}
