//! Overview entries and declarations.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::plan::{
    Change, ConfigModule, ConfigOutput, ConfigResource, ConfigVariable, ModuleCall, ResourceMode,
    SourcePos,
};

use super::kind::{ChangeAction, ObjectKind};

/// One object of the resource overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewEntry {
    /// Kind of the object.
    pub kind: ObjectKind,
    /// Address with every repetition index removed.
    pub config_address: String,
    /// Change derived from the plan, if one was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_action: Option<ChangeAction>,
    /// Before/after values.
    pub change: Change,
    /// Addresses of child objects, in insertion order.
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub children: IndexSet<String>,
    /// True for the bracket parent of repeated instances.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_repeated: bool,
}

impl OverviewEntry {
    /// Creates an empty entry for an address.
    #[must_use]
    pub fn new(kind: ObjectKind, address: &str) -> Self {
        Self {
            kind,
            config_address: crate::address::strip_indexes(address),
            change_action: None,
            change: Change::default(),
            children: IndexSet::new(),
            is_repeated: false,
        }
    }
}

/// A resource known only from the plan's change list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetachedResource {
    /// Resource mode.
    pub mode: ResourceMode,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource name.
    pub name: String,
}

/// A declaration of the configuration tree, keyed by config address in the
/// overview.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "declaration", rename_all = "lowercase")]
pub enum ConfigDeclaration<'a> {
    /// The root module.
    Root(&'a ConfigModule),
    /// A module call.
    Module(&'a ModuleCall),
    /// A managed resource or data source.
    Resource(&'a ConfigResource),
    /// An input variable.
    Variable(&'a ConfigVariable),
    /// An output.
    Output(&'a ConfigOutput),
    /// A resource the configuration does not declare.
    Detached(DetachedResource),
}

impl<'a> ConfigDeclaration<'a> {
    /// Returns the raw references the declaration reads.
    #[must_use]
    pub fn references(&self) -> Vec<&'a str> {
        match *self {
            Self::Resource(resource) => resource.references(),
            Self::Module(call) => call.references(),
            Self::Output(output) => output.references(),
            Self::Root(_) | Self::Variable(_) | Self::Detached(_) => Vec::new(),
        }
    }

    /// Returns the declaration position, when known.
    #[must_use]
    pub fn pos(&self) -> Option<&'a SourcePos> {
        match *self {
            Self::Resource(resource) => resource.pos.as_ref(),
            Self::Module(call) => call.pos.as_ref(),
            Self::Variable(variable) => variable.pos.as_ref(),
            Self::Output(output) => output.pos.as_ref(),
            Self::Root(_) | Self::Detached(_) => None,
        }
    }

    /// Returns the module configuration behind a root or module call.
    #[must_use]
    pub fn module(&self) -> Option<&'a ConfigModule> {
        match *self {
            Self::Root(module) => Some(module),
            Self::Module(call) => call.module.as_ref(),
            _ => None,
        }
    }

    /// Returns the module call, for module declarations.
    #[must_use]
    pub const fn module_call(&self) -> Option<&'a ModuleCall> {
        match *self {
            Self::Module(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the type and name of a declared or detached resource.
    #[must_use]
    pub fn resource_identity(&self) -> Option<(&str, &str)> {
        match self {
            Self::Resource(resource) => {
                Some((resource.resource_type.as_str(), resource.name.as_str()))
            }
            Self::Detached(detached) => {
                Some((detached.resource_type.as_str(), detached.name.as_str()))
            }
            _ => None,
        }
    }

    /// Returns the provider configuration key of a declared resource.
    #[must_use]
    pub fn provider(&self) -> Option<&'a str> {
        match *self {
            Self::Resource(resource) => resource.provider_config_key.as_deref(),
            _ => None,
        }
    }
}

/// The resource overview: every realized or declared object keyed by address,
/// plus every declaration keyed by config address.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceOverview<'a> {
    /// Entries keyed by address. The root module is keyed by `""`.
    pub entries: IndexMap<String, OverviewEntry>,
    /// Declarations keyed by config address. The root module is keyed by `""`.
    pub configs: IndexMap<String, ConfigDeclaration<'a>>,
}

impl<'a> ResourceOverview<'a> {
    /// Returns the entry at an address.
    #[must_use]
    pub fn entry(&self, address: &str) -> Option<&OverviewEntry> {
        self.entries.get(address)
    }

    /// Returns the root module entry.
    #[must_use]
    pub fn root(&self) -> Option<&OverviewEntry> {
        self.entry("")
    }

    /// Returns the declaration at a config address.
    #[must_use]
    pub fn declaration(&self, config_address: &str) -> Option<&ConfigDeclaration<'a>> {
        self.configs.get(config_address)
    }

    /// Returns the root module configuration.
    #[must_use]
    pub fn root_config(&self) -> Option<&'a ConfigModule> {
        self.module_config("")
    }

    /// Returns the module configuration at a config address.
    #[must_use]
    pub fn module_config(&self, config_address: &str) -> Option<&'a ConfigModule> {
        self.declaration(config_address)?.module()
    }

    /// Returns true if an address names a repetition group: the bracket
    /// parent of indexed instances, or a resource or module call declared
    /// with `count` or `for_each`.
    #[must_use]
    pub fn is_repetition_group(&self, address: &str) -> bool {
        if self.entry(address).is_some_and(|entry| entry.is_repeated) {
            return true;
        }
        if crate::address::has_trailing_index(address) {
            return false;
        }
        match self.declaration(&crate::address::strip_indexes(address)) {
            Some(ConfigDeclaration::Resource(resource)) => resource.is_repeated(),
            Some(ConfigDeclaration::Module(call)) => call.is_repeated(),
            _ => false,
        }
    }

    /// Returns the children of an entry, skipping dangling addresses.
    #[must_use]
    pub fn children(&self, address: &str) -> Vec<(&str, &OverviewEntry)> {
        self.entry(address)
            .into_iter()
            .flat_map(|entry| entry.children.iter())
            .filter_map(|child| Some((child.as_str(), self.entry(child)?)))
            .collect()
    }
}
