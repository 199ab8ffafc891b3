//! Resource overview construction.
//!
//! The overview is built in passes over one shared entry map: declarations
//! first, then the prior and planned state trees, then declared variables
//! and outputs, and finally the plan's output and resource changes. Later
//! passes refine what earlier passes recorded.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::address;
use crate::error::{InputError, Result};
use crate::plan::{Change, ConfigModule, PlanDocument, ResourceChange, StateModule};

use super::entry::{ConfigDeclaration, DetachedResource, OverviewEntry, ResourceOverview};
use super::kind::{ChangeAction, ObjectKind};

/// Replacement for values hidden by redaction.
pub const SENSITIVE_VALUE: &str = "Sensitive Value";

type Entries = IndexMap<String, OverviewEntry>;
type Declarations<'a> = IndexMap<String, ConfigDeclaration<'a>>;

/// Options shared by every projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep sensitive values instead of redacting them.
    pub show_sensitive: bool,
    /// Whether declaration positions can be trusted to group by file.
    pub config_available: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            show_sensitive: false,
            config_available: true,
        }
    }
}

impl BuildOptions {
    /// Sets whether sensitive values are kept.
    #[must_use]
    pub const fn with_show_sensitive(mut self, show_sensitive: bool) -> Self {
        self.show_sensitive = show_sensitive;
        self
    }

    /// Sets whether declaration positions are available.
    #[must_use]
    pub const fn with_config_available(mut self, config_available: bool) -> Self {
        self.config_available = config_available;
        self
    }
}

/// Which state tree a pass walks.
#[derive(Debug, Clone, Copy)]
enum Pass {
    Prior,
    Planned,
}

/// Builds a [`ResourceOverview`] from a plan document.
#[derive(Debug)]
pub struct OverviewBuilder<'a> {
    plan: &'a PlanDocument,
    options: BuildOptions,
}

impl<'a> OverviewBuilder<'a> {
    /// Creates a builder for a plan.
    #[must_use]
    pub const fn new(plan: &'a PlanDocument, options: BuildOptions) -> Self {
        Self { plan, options }
    }

    /// Builds the overview.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan has no root configuration module.
    pub fn build(&self) -> Result<ResourceOverview<'a>> {
        info!("Generating resource overview...");

        let root = self.plan.root_config().ok_or(InputError::MissingRootConfig)?;

        let mut configs = Declarations::new();
        configs.insert(String::new(), ConfigDeclaration::Root(root));
        configs.extend(collect_declarations(root, ""));

        let mut entries = Entries::new();
        entries.insert(String::new(), OverviewEntry::new(ObjectKind::Module, ""));

        match self.plan.prior_root() {
            Some(prior) => populate_module_state(&mut entries, prior, Pass::Prior),
            None => debug!("Plan has no prior state"),
        }
        match self.plan.planned_root() {
            Some(planned) => populate_module_state(&mut entries, planned, Pass::Planned),
            None => debug!("Plan has no planned values"),
        }

        self.populate_declared_values(&mut entries, &configs);
        self.apply_output_changes(&mut entries, &configs);
        apply_resource_changes(&mut entries, &mut configs, &self.plan.resource_changes);

        info!(
            "Resource overview has {} entries and {} declarations",
            entries.len(),
            configs.len()
        );

        Ok(ResourceOverview { entries, configs })
    }

    /// Records declared variables and outputs with their known values.
    fn populate_declared_values(&self, entries: &mut Entries, configs: &Declarations<'a>) {
        for (config_address, declaration) in configs {
            match *declaration {
                ConfigDeclaration::Variable(variable) => {
                    let value = if is_root_level(config_address) {
                        let name = address::last_segment(config_address);
                        self.plan
                            .variable_value(name)
                            .or(variable.default.as_ref())
                    } else {
                        variable.default.as_ref()
                    };

                    let entry = ensure_entry(entries, config_address, ObjectKind::Variable);
                    entry.change.after = value.cloned();
                    if variable.sensitive && !self.options.show_sensitive {
                        redact(&mut entry.change, false, true);
                    }
                }
                ConfigDeclaration::Output(output) => {
                    // Only root outputs are recorded in the state trees.
                    let (prior, planned) = if is_root_level(config_address) {
                        let name = address::last_segment(config_address);
                        (self.plan.prior_output(name), self.plan.planned_output(name))
                    } else {
                        (None, None)
                    };

                    let entry = ensure_entry(entries, config_address, ObjectKind::Output);
                    entry.change.before = prior.and_then(|state| state.value.clone());
                    entry.change.after = planned.and_then(|state| state.value.clone());
                    if !self.options.show_sensitive {
                        redact(
                            &mut entry.change,
                            output.sensitive || prior.is_some_and(|state| state.sensitive),
                            output.sensitive || planned.is_some_and(|state| state.sensitive),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    /// Records root output changes under `output.<name>`.
    fn apply_output_changes(&self, entries: &mut Entries, configs: &Declarations<'a>) {
        for (name, change) in &self.plan.output_changes {
            let output_address = format!("output.{name}");
            let declared_sensitive = matches!(
                configs.get(&output_address),
                Some(ConfigDeclaration::Output(output)) if output.sensitive
            );

            let entry = ensure_entry(entries, &output_address, ObjectKind::Output);
            entry.change = change.clone();
            entry.change_action = ChangeAction::from_actions(&change.actions);

            if !self.options.show_sensitive {
                redact(
                    &mut entry.change,
                    declared_sensitive || change.before_is_sensitive(),
                    declared_sensitive || change.after_is_sensitive(),
                );
            }
        }
    }
}

/// Collects every declaration below a module, keyed by config address.
fn collect_declarations<'a>(module: &'a ConfigModule, prefix: &str) -> Declarations<'a> {
    let mut declarations = Declarations::new();

    for (name, variable) in &module.variables {
        declarations.insert(
            address::join(prefix, &format!("var.{name}")),
            ConfigDeclaration::Variable(variable),
        );
    }
    for (name, output) in &module.outputs {
        declarations.insert(
            address::join(prefix, &format!("output.{name}")),
            ConfigDeclaration::Output(output),
        );
    }
    for resource in &module.resources {
        declarations.insert(
            address::join(prefix, &resource.local_address()),
            ConfigDeclaration::Resource(resource),
        );
    }
    for (name, call) in &module.module_calls {
        let call_address = address::join(prefix, &format!("module.{name}"));
        declarations.insert(call_address.clone(), ConfigDeclaration::Module(call));
        match &call.module {
            Some(child) => declarations.extend(collect_declarations(child, &call_address)),
            None => debug!("Module call {} carries no configuration", call_address),
        }
    }

    declarations
}

/// Walks one state module, attaching its resources and child modules.
fn populate_module_state(entries: &mut Entries, module: &StateModule, pass: Pass) {
    let module_address = module.address();
    ensure_entry(entries, module_address, ObjectKind::Module);

    for resource in &module.resources {
        attach_instance(
            entries,
            module_address,
            &resource.address,
            ObjectKind::from(resource.mode),
        );

        if let Some(values) = &resource.values {
            if let Some(entry) = entries.get_mut(&resource.address) {
                match pass {
                    Pass::Prior => entry.change.before = Some(values.clone()),
                    Pass::Planned => entry.change.after = Some(values.clone()),
                }
            }
        }
    }

    for child in &module.child_modules {
        let child_address = child.address();
        attach_instance(entries, module_address, child_address, ObjectKind::Module);
        populate_module_state(entries, child, pass);
    }
}

/// Applies per-instance resource changes, registering detached declarations
/// for resources the configuration does not know.
fn apply_resource_changes<'a>(
    entries: &mut Entries,
    configs: &mut Declarations<'a>,
    changes: &[ResourceChange],
) {
    for resource_change in changes {
        let module_address = resource_change.module_address.as_deref().unwrap_or_default();
        ensure_module_chain(entries, module_address);

        attach_instance(
            entries,
            module_address,
            &resource_change.address,
            ObjectKind::from(resource_change.mode),
        );

        if let Some(entry) = entries.get_mut(&resource_change.address) {
            entry.change = resource_change.change.clone();
            entry.change_action = ChangeAction::from_actions(&resource_change.change.actions);
        }

        let config_address = address::strip_indexes(&resource_change.address);
        configs.entry(config_address).or_insert_with_key(|key| {
            debug!("{} is not declared, recording a detached declaration", key);
            ConfigDeclaration::Detached(DetachedResource {
                mode: resource_change.mode,
                resource_type: resource_change.resource_type.clone(),
                name: resource_change.name.clone(),
            })
        });
    }
}

/// Makes sure every module on the path to `module_address` is attached to
/// its parent.
fn ensure_module_chain(entries: &mut Entries, module_address: &str) {
    let mut current = module_address;
    while !current.is_empty() {
        let parent = address::parent_module(current);
        attach_instance(entries, parent, current, ObjectKind::Module);
        current = parent;
    }
}

/// Attaches an instance to its module, grouping indexed instances under
/// their bracket parent.
fn attach_instance(entries: &mut Entries, module_address: &str, address: &str, kind: ObjectKind) {
    ensure_entry(entries, address, kind);

    let direct_child = match address::bracket_parent(address) {
        Some(group) => {
            let group_entry = ensure_entry(entries, group, kind);
            group_entry.is_repeated = true;
            group_entry.children.insert(address.to_string());
            group
        }
        None => address,
    };

    ensure_entry(entries, module_address, ObjectKind::Module)
        .children
        .insert(direct_child.to_string());
}

fn ensure_entry<'e>(entries: &'e mut Entries, address: &str, kind: ObjectKind) -> &'e mut OverviewEntry {
    entries
        .entry(address.to_string())
        .or_insert_with(|| OverviewEntry::new(kind, address))
}

fn is_root_level(config_address: &str) -> bool {
    !config_address.starts_with("module.")
}

fn redact(change: &mut Change, before: bool, after: bool) {
    if before {
        change.before = Some(Value::String(SENSITIVE_VALUE.to_string()));
    }
    if after {
        change.after = Some(Value::String(SENSITIVE_VALUE.to_string()));
    }
}
