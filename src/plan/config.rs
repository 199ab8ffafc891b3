//! Declared configuration tree.
//!
//! This is the `configuration` section of a plan document: the as-declared
//! structure of variables, outputs, resources and module calls, with each
//! expression reduced to the references it reads. Declaration positions
//! (`pos`) are attached by the source parser when the configuration files
//! are available locally; plans produced elsewhere carry none.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::types::ResourceMode;

/// The configuration section of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Root module of the configuration tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_module: Option<ConfigModule>,
}

/// Where an object is declared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcePos {
    /// Declaring file, as given by the source parser.
    pub filename: String,
    /// 1-based declaration line.
    pub line: u32,
}

/// A module of the configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigModule {
    /// Directory of the module source, set on the root module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Required core version constraints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_core: Vec<String>,
    /// Required providers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub required_providers: IndexMap<String, ProviderRequirement>,
    /// Input variables, keyed by name.
    #[serde(default)]
    pub variables: IndexMap<String, ConfigVariable>,
    /// Outputs, keyed by name.
    #[serde(default)]
    pub outputs: IndexMap<String, ConfigOutput>,
    /// Managed resources and data sources.
    #[serde(default)]
    pub resources: Vec<ConfigResource>,
    /// Module calls, keyed by local name.
    #[serde(default)]
    pub module_calls: IndexMap<String, ModuleCall>,
}

/// A provider requirement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderRequirement {
    /// Provider source address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Version constraints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_constraints: Vec<String>,
}

/// A declared input variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigVariable {
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit required flag. When absent, a variable is required if it
    /// has no default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the value is sensitive.
    #[serde(default)]
    pub sensitive: bool,
    /// Declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

/// A declared output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOutput {
    /// Value expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    /// Whether the value is sensitive.
    #[serde(default)]
    pub sensitive: bool,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit dependencies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

/// A declared managed resource or data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigResource {
    /// Module-relative address as given by the engine.
    #[serde(default)]
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
    /// Provider configuration key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_key: Option<String>,
    /// Attribute expressions.
    #[serde(default)]
    pub expressions: IndexMap<String, Expression>,
    /// `count` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_expression: Option<Expression>,
    /// `for_each` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_each_expression: Option<Expression>,
    /// Explicit dependencies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

/// A module call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleCall {
    /// Module source.
    #[serde(default)]
    pub source: String,
    /// Version constraint for registry modules.
    #[serde(default, alias = "version", skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,
    /// Argument expressions.
    #[serde(default)]
    pub expressions: IndexMap<String, Expression>,
    /// `count` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_expression: Option<Expression>,
    /// `for_each` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_each_expression: Option<Expression>,
    /// Explicit dependencies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// The called module's own configuration.
    #[serde(default, skip_serializing)]
    pub module: Option<ConfigModule>,
    /// Declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

/// An attribute right-hand side.
///
/// Nested blocks appear as lists of attribute maps; their references are
/// attributed to the enclosing attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    /// A nested block (or list of blocks).
    Nested(Vec<IndexMap<String, Expression>>),
    /// A plain expression.
    Value(ExpressionValue),
}

/// A plain expression.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionValue {
    /// References read by the expression, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// Constant value, for literal expressions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_value: Option<Value>,
}

impl SourcePos {
    /// Returns the base name of the declaring file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        Path::new(&self.filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.filename)
    }
}

impl ConfigVariable {
    /// Returns true if the caller must supply a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(self.default.is_none())
    }
}

impl ConfigOutput {
    /// Returns every reference the output reads.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        if let Some(expression) = &self.expression {
            expression.collect_references(&mut refs);
        }
        refs.extend(self.depends_on.iter().map(String::as_str));
        refs
    }
}

impl ConfigResource {
    /// Returns the module-relative address, derived from mode, type and name.
    #[must_use]
    pub fn local_address(&self) -> String {
        if self.resource_type.is_empty() && self.name.is_empty() {
            return self.address.clone();
        }
        match self.mode {
            ResourceMode::Managed => format!("{}.{}", self.resource_type, self.name),
            ResourceMode::Data => format!("data.{}.{}", self.resource_type, self.name),
        }
    }

    /// Returns true if the block uses `count` or `for_each`.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        self.count_expression.is_some() || self.for_each_expression.is_some()
    }

    /// Returns every reference the resource reads: attributes, nested
    /// blocks, `count`, `for_each` and explicit dependencies.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        collect_block_references(
            &self.expressions,
            [&self.count_expression, &self.for_each_expression],
            &self.depends_on,
        )
    }
}

impl ModuleCall {
    /// Returns true if the call uses `count` or `for_each`.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        self.count_expression.is_some() || self.for_each_expression.is_some()
    }

    /// Returns every reference the call's arguments read.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        collect_block_references(
            &self.expressions,
            [&self.count_expression, &self.for_each_expression],
            &self.depends_on,
        )
    }
}

impl Expression {
    /// Returns the references of this expression, nested blocks flattened.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'e>(&'e self, out: &mut Vec<&'e str>) {
        match self {
            Self::Value(value) => out.extend(value.references.iter().map(String::as_str)),
            Self::Nested(blocks) => {
                for block in blocks {
                    for expression in block.values() {
                        expression.collect_references(out);
                    }
                }
            }
        }
    }
}

fn collect_block_references<'e>(
    expressions: &'e IndexMap<String, Expression>,
    meta: [&'e Option<Expression>; 2],
    depends_on: &'e [String],
) -> Vec<&'e str> {
    let mut refs = Vec::new();
    for expression in expressions.values() {
        expression.collect_references(&mut refs);
    }
    for expression in meta.into_iter().flatten() {
        expression.collect_references(&mut refs);
    }
    refs.extend(depends_on.iter().map(String::as_str));
    refs
}
