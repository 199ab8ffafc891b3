//! Graph element types.
//!
//! Nodes and edges serialize in the renderer's element shape:
//! `{ "data": { ... }, "classes": "..." }`.

use serde::Serialize;

use crate::overview::{ChangeAction, ObjectKind};

use super::hash::GraphHasher;

/// Anything with a stable identity key.
pub trait Keyed {
    /// Returns the identity key.
    fn key(&self) -> &str;
}

/// A dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    /// Nodes, in first-insertion order.
    pub nodes: Vec<GraphNode>,
    /// Edges, in first-insertion order.
    pub edges: Vec<GraphEdge>,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Node payload.
    pub data: NodeData,
    /// Renderer classes.
    pub classes: String,
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// Unique node id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Kind of the node.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Id of the enclosing node, empty for the root.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
    /// Display color of the node's kind.
    #[serde(rename = "parentColor")]
    pub parent_color: &'static str,
    /// Planned change of a name node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeAction>,
}

/// A graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Edge payload.
    pub data: EdgeData,
    /// Renderer classes.
    pub classes: &'static str,
}

/// Edge payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeData {
    /// `"{source}->{target}"`.
    pub id: String,
    /// Referencing node id.
    pub source: String,
    /// Referenced node id.
    pub target: String,
    /// `"{sourceColor} {targetColor}"`.
    pub gradient: String,
}

impl Graph {
    /// Returns the node with an id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.data.id == id)
    }

    /// Returns the edge with an id.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| edge.data.id == id)
    }

    /// Computes a SHA-256 fingerprint of the graph, for comparing runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        GraphHasher::new().hash_graph(self)
    }
}

impl GraphNode {
    /// Creates a node whose parent color is the color of its kind.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ObjectKind,
        parent: impl Into<String>,
        classes: impl Into<String>,
    ) -> Self {
        Self {
            data: NodeData {
                id: id.into(),
                label: label.into(),
                kind,
                parent: parent.into(),
                parent_color: kind.color(),
                change: None,
            },
            classes: classes.into(),
        }
    }

    /// Sets the planned change.
    #[must_use]
    pub const fn with_change(mut self, change: Option<ChangeAction>) -> Self {
        self.data.change = change;
        self
    }
}

impl GraphEdge {
    /// Creates an edge between two node ids.
    #[must_use]
    pub fn new(source: &str, target: &str, source_color: &str, target_color: &str) -> Self {
        Self {
            data: EdgeData {
                id: format!("{source}->{target}"),
                source: source.to_string(),
                target: target.to_string(),
                gradient: format!("{source_color} {target_color}"),
            },
            classes: "edge",
        }
    }
}

impl Keyed for GraphNode {
    fn key(&self) -> &str {
        &self.data.id
    }
}

impl Keyed for GraphEdge {
    fn key(&self) -> &str {
        &self.data.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_shape() {
        let node = GraphNode::new("x", "x", ObjectKind::Resource, "main.tf", "resource-type");
        let value = serde_json::to_value(&node).expect("serializes");
        assert_eq!(
            value,
            json!({
                "data": {
                    "id": "x",
                    "label": "x",
                    "type": "resource",
                    "parent": "main.tf",
                    "parentColor": "lightgray"
                },
                "classes": "resource-type"
            })
        );
    }

    #[test]
    fn test_edge_shape() {
        let edge = GraphEdge::new("x.a[0]", "var.region", "lightgray", "#1d7ada");
        assert_eq!(edge.key(), "x.a[0]->var.region");
        assert_eq!(edge.data.gradient, "lightgray #1d7ada");
        assert_eq!(edge.classes, "edge");
    }
}
