//! Graph construction.
//!
//! The node hierarchy follows the resource map (root, files, modules, type
//! nodes, name nodes); edges come from the references of every declared
//! resource, data source, module call and output.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::address;
use crate::map::{MapBuilder, MapNode};
use crate::overview::{BuildOptions, ChangeAction, ObjectKind, ResourceOverview};
use crate::reference::{Reference, ReferenceKind, WORKSPACE_REFERENCE};

use super::collection::UniqueList;
use super::types::{Graph, GraphEdge, GraphNode};

/// Class of the root node.
const ROOT_CLASS: &str = "basename";

/// Where nodes of one map level are placed.
#[derive(Debug, Clone, Copy)]
struct NodeScope<'s> {
    /// Id of the enclosing graph node.
    parent_id: &'s str,
    /// Address of the enclosing module.
    module_address: &'s str,
    /// True at the root module level.
    is_root: bool,
}

/// Where edges of one map level resolve their targets.
#[derive(Debug, Clone, Copy)]
struct EdgeScope<'s> {
    /// Address prefix of reference targets.
    module_address: &'s str,
    /// Graph node of the enclosing module.
    module_node: &'s str,
}

/// Builds a [`Graph`] from a resource overview.
#[derive(Debug)]
pub struct GraphBuilder<'r, 'a> {
    overview: &'r ResourceOverview<'a>,
    options: BuildOptions,
}

impl<'r, 'a> GraphBuilder<'r, 'a> {
    /// Creates a builder over an overview.
    #[must_use]
    pub const fn new(overview: &'r ResourceOverview<'a>, options: BuildOptions) -> Self {
        Self { overview, options }
    }

    /// Builds the graph.
    #[must_use]
    pub fn build(&self) -> Graph {
        info!("Generating resource graph...");

        let map = MapBuilder::new(self.overview, self.options).build();
        let root_id = map.path.replace("./", "");

        let mut nodes = UniqueList::new();
        nodes.push(GraphNode::new(
            root_id.as_str(),
            root_id.as_str(),
            ObjectKind::Module,
            "",
            ROOT_CLASS,
        ));

        let node_scope = NodeScope {
            parent_id: &root_id,
            module_address: "",
            is_root: true,
        };
        add_nodes(node_scope, &map.root.children, &mut nodes);

        let mut edges = UniqueList::new();
        let edge_scope = EdgeScope {
            module_address: "",
            module_node: &root_id,
        };
        self.add_edges(edge_scope, &map.root.children, &mut edges, &mut nodes);

        info!(
            "Resource graph has {} nodes and {} edges",
            nodes.len(),
            edges.len()
        );

        Graph {
            nodes: nodes.into_vec(),
            edges: edges.into_vec(),
        }
    }

    fn add_edges(
        &self,
        scope: EdgeScope<'_>,
        children: &IndexMap<String, MapNode>,
        edges: &mut UniqueList<GraphEdge>,
        nodes: &mut UniqueList<GraphNode>,
    ) {
        for (id, child) in children {
            match child.kind {
                ObjectKind::File => self.add_edges(scope, &child.children, edges, nodes),
                ObjectKind::Resource | ObjectKind::Data => {
                    if child.children.is_empty() {
                        self.add_reference_edges(scope, id, child.kind, edges, nodes);
                    } else {
                        for instance_id in child.children.keys() {
                            self.add_reference_edges(scope, instance_id, child.kind, edges, nodes);
                        }
                    }
                }
                ObjectKind::Module => {
                    self.add_reference_edges(scope, id, ObjectKind::Module, edges, nodes);

                    // Instances of a repetition group resolve in the caller's scope.
                    let inner = if self.overview.is_repetition_group(id) {
                        scope
                    } else {
                        EdgeScope {
                            module_address: id,
                            module_node: id,
                        }
                    };
                    self.add_edges(inner, &child.children, edges, nodes);
                }
                ObjectKind::Output => {
                    self.add_reference_edges(scope, id, ObjectKind::Output, edges, nodes);
                }
                ObjectKind::Variable | ObjectKind::Local => {}
            }
        }
    }

    /// Adds one edge per resolvable reference of the object at `source_id`.
    fn add_reference_edges(
        &self,
        scope: EdgeScope<'_>,
        source_id: &str,
        source_kind: ObjectKind,
        edges: &mut UniqueList<GraphEdge>,
        nodes: &mut UniqueList<GraphNode>,
    ) {
        let config_address = address::strip_indexes(source_id);
        let Some(declaration) = self.overview.declaration(&config_address) else {
            debug!("No declaration for {}, skipping its edges", source_id);
            return;
        };

        for raw in declaration.references() {
            let Some(reference) = Reference::resolve(raw) else {
                continue;
            };
            let target = address::join(scope.module_address, &reference.target);

            if reference.is_workspace() {
                nodes.push(GraphNode::new(
                    target.as_str(),
                    WORKSPACE_REFERENCE,
                    ObjectKind::Local,
                    scope.module_node,
                    ObjectKind::Local.class(),
                ));
            }

            for target_id in self.edge_targets(&reference, target) {
                edges.push(GraphEdge::new(
                    source_id,
                    &target_id,
                    source_kind.color(),
                    reference.color(),
                ));
            }
        }
    }

    /// Resolves the node ids an edge to `target` lands on. Repeated
    /// resources have no group node, so a reference to the group fans out
    /// to every instance.
    fn edge_targets(&self, reference: &Reference, target: String) -> Vec<String> {
        let is_resource = matches!(reference.kind, ReferenceKind::Resource | ReferenceKind::Data);
        if !is_resource || !self.overview.is_repetition_group(&target) {
            return vec![target];
        }

        let instances: Vec<String> = self
            .overview
            .entry(&target)
            .map(|entry| entry.children.iter().cloned().collect())
            .unwrap_or_default();
        if instances.is_empty() {
            debug!("{} has no instances, dropping edges to it", target);
        }
        instances
    }
}

/// Adds the nodes of one map level, recursing into files and modules.
fn add_nodes(
    scope: NodeScope<'_>,
    children: &IndexMap<String, MapNode>,
    nodes: &mut UniqueList<GraphNode>,
) {
    for (id, child) in children {
        match child.kind {
            ObjectKind::File => {
                let file_id = if scope.is_root {
                    id.clone()
                } else {
                    format!("{}.{id}", scope.parent_id)
                };
                nodes.push(GraphNode::new(
                    file_id.as_str(),
                    id.as_str(),
                    ObjectKind::File,
                    scope.parent_id,
                    ObjectKind::File.class(),
                ));

                let file_scope = NodeScope {
                    parent_id: &file_id,
                    module_address: scope.module_address,
                    is_root: false,
                };
                add_nodes(file_scope, &child.children, nodes);
            }
            ObjectKind::Resource | ObjectKind::Data => {
                add_resource_nodes(scope, id, child, nodes);
            }
            ObjectKind::Module => {
                nodes.push(GraphNode::new(
                    id.as_str(),
                    child.name.as_str(),
                    ObjectKind::Module,
                    scope.parent_id,
                    ObjectKind::Module.class(),
                ));

                let module_scope = NodeScope {
                    parent_id: id,
                    module_address: id,
                    is_root: false,
                };
                add_nodes(module_scope, &child.children, nodes);
            }
            ObjectKind::Variable | ObjectKind::Output | ObjectKind::Local => {
                nodes.push(GraphNode::new(
                    id.as_str(),
                    address::last_segment(id),
                    child.kind,
                    scope.parent_id,
                    child.kind.class(),
                ));
            }
        }
    }
}

/// Adds the type node of a resource and its name nodes. Repeated resources
/// are flattened: each instance becomes a name node under the type node.
fn add_resource_nodes(
    scope: NodeScope<'_>,
    id: &str,
    resource: &MapNode,
    nodes: &mut UniqueList<GraphNode>,
) {
    let resource_type = resource.resource_type.as_deref().unwrap_or_default();
    let type_key = match resource.kind {
        ObjectKind::Data => format!("data.{resource_type}"),
        _ => resource_type.to_string(),
    };
    let type_id = address::join(scope.module_address, &type_key);

    nodes.push(GraphNode::new(
        type_id.as_str(),
        resource_type,
        resource.kind,
        scope.parent_id,
        resource.kind.class(),
    ));

    if resource.children.is_empty() {
        nodes.push(name_node(id, resource, &type_id));
    } else {
        for (instance_id, instance) in &resource.children {
            nodes.push(name_node(instance_id, instance, &type_id));
        }
    }
}

fn name_node(id: &str, node: &MapNode, type_id: &str) -> GraphNode {
    GraphNode::new(
        id,
        node.name.as_str(),
        node.kind,
        type_id,
        name_class(node.kind, node.change_action),
    )
    .with_change(node.change_action)
}

fn name_class(kind: ObjectKind, change: Option<ChangeAction>) -> String {
    match change {
        Some(change) => format!("{kind}-name {change}"),
        None => format!("{kind}-name"),
    }
}
