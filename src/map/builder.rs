//! Resource map construction.

use tracing::{debug, info};

use crate::address;
use crate::overview::{
    BuildOptions, ConfigDeclaration, ObjectKind, OverviewEntry, ResourceOverview,
};
use crate::plan::{ConfigModule, SourcePos};
use crate::reference::{Reference, ReferenceKind};

use super::node::{MapNode, ResourceMap};

/// File name used for objects without a known declaration site.
pub const UNKNOWN_FILE: &str = "unknown";

/// Root path used when the configuration does not name one.
pub const DEFAULT_MAP_PATH: &str = ".";

/// Builds a [`ResourceMap`] from a resource overview.
#[derive(Debug)]
pub struct MapBuilder<'r, 'a> {
    overview: &'r ResourceOverview<'a>,
    options: BuildOptions,
}

impl<'r, 'a> MapBuilder<'r, 'a> {
    /// Creates a builder over an overview.
    #[must_use]
    pub const fn new(overview: &'r ResourceOverview<'a>, options: BuildOptions) -> Self {
        Self { overview, options }
    }

    /// Builds the map.
    #[must_use]
    pub fn build(&self) -> ResourceMap {
        info!("Generating resource map...");

        let root_config = self.overview.root_config();
        let path = root_config
            .and_then(|config| config.path.clone())
            .unwrap_or_else(|| DEFAULT_MAP_PATH.to_string());

        let mut root = MapNode::new(ObjectKind::Module, "");
        root.source = Some(path.clone());
        self.populate_module(&mut root, "");

        ResourceMap {
            path,
            required_core: root_config
                .map(|config| config.required_core.clone())
                .unwrap_or_default(),
            required_providers: root_config
                .map(|config| config.required_providers.clone())
                .unwrap_or_default(),
            root,
        }
    }

    /// Fills a module node with its declared values and child objects.
    fn populate_module(&self, module_node: &mut MapNode, module_address: &str) {
        let config_address = address::strip_indexes(module_address);
        if !self.overview.is_repetition_group(module_address) {
            if let Some(config) = self.overview.module_config(&config_address) {
                self.add_declared_values(module_node, module_address, config);
            }
        }

        for (child_address, child) in self.overview.children(module_address) {
            self.add_child(module_node, module_address, child_address, child);
        }
    }

    fn add_declared_values(&self, module_node: &mut MapNode, module_address: &str, config: &ConfigModule) {
        for (name, output) in &config.outputs {
            let id = address::join(module_address, &format!("output.{name}"));
            let mut node = MapNode::new(ObjectKind::Output, name.as_str());
            node.sensitive = output.sensitive;
            node.line = self.line_of(output.pos.as_ref());
            node.change_action = self
                .overview
                .entry(&address::strip_indexes(&id))
                .and_then(|entry| entry.change_action);

            let file = self.file_of(output.pos.as_ref());
            let declaration = self.overview.declaration(&address::strip_indexes(&id));
            self.add_locals(module_node, module_address, file, declaration);
            insert_into_file(module_node, file, id, node);
        }

        for (name, variable) in &config.variables {
            let id = address::join(module_address, &format!("var.{name}"));
            let mut node = MapNode::new(ObjectKind::Variable, name.as_str());
            node.required = Some(variable.is_required());
            node.sensitive = variable.sensitive;
            node.line = self.line_of(variable.pos.as_ref());

            insert_into_file(module_node, self.file_of(variable.pos.as_ref()), id, node);
        }
    }

    fn add_child(
        &self,
        module_node: &mut MapNode,
        module_address: &str,
        child_address: &str,
        child: &OverviewEntry,
    ) {
        let declaration = self.overview.declaration(&child.config_address);
        let pos = declaration.and_then(ConfigDeclaration::pos);

        match child.kind {
            ObjectKind::Resource | ObjectKind::Data => {
                let mut node = self.resource_node(child, declaration);
                node.line = self.line_of(pos);

                let file = self.file_of(pos);
                self.add_locals(module_node, module_address, file, declaration);
                insert_into_file(module_node, file, child_address.to_string(), node);
            }
            ObjectKind::Module if address::has_trailing_index(child_address) => {
                let mut node = MapNode::new(ObjectKind::Module, address::last_segment(child_address));
                node.source.clone_from(&module_node.source);
                node.version.clone_from(&module_node.version);
                node.change_action = child.change_action;
                self.populate_module(&mut node, child_address);
                module_node
                    .children
                    .entry(child_address.to_string())
                    .or_insert(node);
            }
            ObjectKind::Module => {
                let call = declaration.and_then(ConfigDeclaration::module_call);
                let mut node = MapNode::new(ObjectKind::Module, address::last_segment(child_address));
                node.line = self.line_of(pos);
                node.source = call.map(|call| {
                    join_source(module_node.source.as_deref().unwrap_or(DEFAULT_MAP_PATH), &call.source)
                });
                node.version = call.and_then(|call| call.version_constraint.clone());
                if call.is_none() {
                    debug!("Module {} has no module call declaration", child_address);
                }

                let file = self.file_of(pos);
                self.add_locals(module_node, module_address, file, declaration);
                self.populate_module(&mut node, child_address);
                insert_into_file(module_node, file, child_address.to_string(), node);
            }
            _ => {}
        }
    }

    /// Builds a resource or data node with its repetition instances.
    fn resource_node(&self, entry: &OverviewEntry, declaration: Option<&ConfigDeclaration<'a>>) -> MapNode {
        let (resource_type, name) = declaration
            .and_then(ConfigDeclaration::resource_identity)
            .map_or_else(
                || identity_from_address(&entry.config_address),
                |(resource_type, name)| (resource_type.to_string(), name.to_string()),
            );

        let mut node = MapNode::new(entry.kind, name);
        node.resource_type = Some(resource_type);
        node.provider = declaration
            .and_then(ConfigDeclaration::provider)
            .map(str::to_string);
        node.change_action = entry.change_action;

        for instance_address in &entry.children {
            let Some(instance) = self.overview.entry(instance_address) else {
                continue;
            };
            let mut instance_node = MapNode::new(instance.kind, address::last_segment(instance_address));
            instance_node.change_action = instance.change_action;
            node.children.insert(instance_address.clone(), instance_node);
        }

        node
    }

    /// Adds a `local` node for every local value the declaration reads.
    fn add_locals(
        &self,
        module_node: &mut MapNode,
        module_address: &str,
        file: &str,
        declaration: Option<&ConfigDeclaration<'a>>,
    ) {
        let Some(declaration) = declaration else {
            return;
        };

        for raw in declaration.references() {
            let Some(reference) = Reference::resolve(raw) else {
                continue;
            };
            if reference.kind != ReferenceKind::Local {
                continue;
            }
            let id = address::join(module_address, &reference.target);
            let node = MapNode::new(ObjectKind::Local, address::last_segment(&reference.target));
            insert_into_file(module_node, file, id, node);
        }
    }

    fn file_of<'p>(&self, pos: Option<&'p SourcePos>) -> &'p str {
        match pos {
            Some(pos) if self.options.config_available => pos.file_name(),
            _ => UNKNOWN_FILE,
        }
    }

    fn line_of(&self, pos: Option<&SourcePos>) -> Option<u32> {
        pos.filter(|_| self.options.config_available)
            .map(|pos| pos.line)
    }
}

/// Inserts a node into the file group of a module node. The first node
/// inserted under an id wins.
fn insert_into_file(module_node: &mut MapNode, file: &str, id: String, node: MapNode) {
    let module_source = module_node
        .source
        .clone()
        .unwrap_or_else(|| DEFAULT_MAP_PATH.to_string());
    module_node
        .children
        .entry(file.to_string())
        .or_insert_with(|| MapNode::file(file, &module_source))
        .children
        .entry(id)
        .or_insert(node);
}

/// Resolves a module call source against the calling module's source.
/// Local paths are joined; registry and remote sources are kept as is.
fn join_source(parent_source: &str, source: &str) -> String {
    if source.starts_with("./") || source.starts_with("../") {
        format!("{}/{}", parent_source.trim_end_matches('/'), source.trim_start_matches("./"))
    } else {
        source.to_string()
    }
}

/// Derives type and name from the last two segments of a config address.
fn identity_from_address(config_address: &str) -> (String, String) {
    let segments = address::split_segments(config_address);
    match segments.as_slice() {
        [.., resource_type, name] => ((*resource_type).to_string(), (*name).to_string()),
        _ => (String::new(), config_address.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overview::{ChangeAction, OverviewBuilder};
    use crate::plan::{PlanDocument, PlanLoader};

    fn build_map(json: &str, options: BuildOptions) -> ResourceMap {
        let plan: PlanDocument = PlanLoader::new().parse_json(json, None).expect("valid plan");
        let overview = OverviewBuilder::new(&plan, options)
            .build()
            .expect("overview builds");
        MapBuilder::new(&overview, options).build()
    }

    const PLAN: &str = r#"{
        "configuration": {"root_module": {
            "path": "./infra",
            "required_core": [">= 1.5"],
            "variables": {"region": {"default": "eu-west-1", "pos": {"filename": "variables.tf", "line": 1}}},
            "outputs": {"ids": {"expression": {"references": ["x.a"]}, "pos": {"filename": "outputs.tf", "line": 1}}},
            "resources": [{
                "address": "x.a", "mode": "managed", "type": "x", "name": "a",
                "provider_config_key": "x",
                "count_expression": {"constant_value": 2},
                "expressions": {"tags": {"references": ["local.tags", "var.region"]}},
                "pos": {"filename": "/work/infra/main.tf", "line": 4}
            }],
            "module_calls": {"net": {
                "source": "./net",
                "pos": {"filename": "main.tf", "line": 12},
                "module": {
                    "variables": {"cidr": {"pos": {"filename": "vars.tf", "line": 2}}},
                    "resources": [{"address": "y.b", "mode": "managed", "type": "y", "name": "b",
                                   "pos": {"filename": "main.tf", "line": 1}}]
                }
            }}
        }},
        "resource_changes": [
            {"address": "x.a[0]", "mode": "managed", "type": "x", "name": "a", "change": {"actions": ["create"]}},
            {"address": "x.a[1]", "mode": "managed", "type": "x", "name": "a", "change": {"actions": ["delete", "create"]}},
            {"address": "module.net.y.b", "module_address": "module.net", "mode": "managed", "type": "y", "name": "b",
             "change": {"actions": ["no-op"]}}
        ]
    }"#;

    #[test]
    fn test_objects_grouped_by_file() {
        let map = build_map(PLAN, BuildOptions::default());

        assert_eq!(map.path, "./infra");
        assert_eq!(map.required_core, vec![String::from(">= 1.5")]);
        assert_eq!(
            map.root.children.keys().collect::<Vec<_>>(),
            vec!["outputs.tf", "variables.tf", "main.tf"]
        );

        let main = &map.root.children["main.tf"];
        assert_eq!(main.source.as_deref(), Some("./infra/main.tf"));
        assert_eq!(
            main.children.keys().collect::<Vec<_>>(),
            vec!["local.tags", "x.a", "module.net"]
        );

        let resource = &main.children["x.a"];
        assert_eq!(resource.line, Some(4));
        assert_eq!(resource.resource_type.as_deref(), Some("x"));
        assert_eq!(resource.provider.as_deref(), Some("x"));
        assert_eq!(resource.children["x.a[0]"].change_action, Some(ChangeAction::Create));
        assert_eq!(resource.children["x.a[1]"].change_action, Some(ChangeAction::Replace));

        let variable = map.find("var.region").expect("variable node");
        assert_eq!(variable.required, Some(false));
        assert_eq!(variable.line, Some(1));
    }

    #[test]
    fn test_module_subtree() {
        let map = build_map(PLAN, BuildOptions::default());

        let module = map.find("module.net").expect("module node");
        assert_eq!(module.kind, ObjectKind::Module);
        assert_eq!(module.source.as_deref(), Some("./infra/net"));
        assert_eq!(module.line, Some(12));

        let module_main = &module.children["main.tf"];
        assert_eq!(module_main.source.as_deref(), Some("./infra/net/main.tf"));
        assert_eq!(
            module_main.children["module.net.y.b"].change_action,
            Some(ChangeAction::NoOp)
        );

        let cidr = module.find("module.net.var.cidr").expect("module variable");
        assert_eq!(cidr.required, Some(true));
    }

    #[test]
    fn test_unknown_file_without_config() {
        let map = build_map(PLAN, BuildOptions::default().with_config_available(false));

        assert_eq!(map.root.children.keys().collect::<Vec<_>>(), vec!["unknown"]);
        let unknown = &map.root.children[UNKNOWN_FILE];
        assert!(unknown.children.contains_key("x.a"));
        assert!(unknown.children.values().all(|node| node.line.is_none()));
    }

    #[test]
    fn test_repeated_module_instances_nest_under_group() {
        let map = build_map(
            r#"{
                "configuration": {"root_module": {
                    "module_calls": {"net": {
                        "source": "./net",
                        "for_each_expression": {"references": ["var.zones"]},
                        "pos": {"filename": "main.tf", "line": 1},
                        "module": {"variables": {"zone": {}}}
                    }}
                }},
                "planned_values": {"root_module": {"child_modules": [
                    {"address": "module.net[\"a\"]"},
                    {"address": "module.net[\"b\"]"}
                ]}}
            }"#,
            BuildOptions::default(),
        );

        let group = map.find("module.net").expect("group node");
        assert_eq!(
            group.children.keys().collect::<Vec<_>>(),
            vec![r#"module.net["a"]"#, r#"module.net["b"]"#]
        );
        let instance = &group.children[r#"module.net["a"]"#];
        assert_eq!(instance.source.as_deref(), Some("./net"));
        assert!(instance.find(r#"module.net["a"].var.zone"#).is_some());
    }

    #[test]
    fn test_join_source() {
        assert_eq!(join_source("./infra", "./net"), "./infra/net");
        assert_eq!(join_source("./infra/", "../shared"), "./infra/../shared");
        assert_eq!(
            join_source("./infra", "terraform-aws-modules/vpc/aws"),
            "terraform-aws-modules/vpc/aws"
        );
    }
}
