//! Graph fingerprinting.
//!
//! Two runs over the same plan produce the same fingerprint, so a stored
//! fingerprint tells whether a rendered graph is stale.

use sha2::{Digest, Sha256};

use super::types::{Graph, GraphEdge, GraphNode};

/// Separates hashed fields so adjacent values cannot run together.
const FIELD_SEPARATOR: &[u8] = &[0];

/// Hasher for computing graph fingerprints.
#[derive(Debug, Default)]
pub struct GraphHasher;

impl GraphHasher {
    /// Creates a new graph hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the fingerprint of a whole graph.
    ///
    /// Element order is significant: builds emit elements in a stable order.
    #[must_use]
    pub fn hash_graph(&self, graph: &Graph) -> String {
        let mut hasher = Sha256::new();

        hasher.update((graph.nodes.len() as u64).to_be_bytes());
        for node in &graph.nodes {
            hasher.update(self.hash_node(node).as_bytes());
        }

        hasher.update((graph.edges.len() as u64).to_be_bytes());
        for edge in &graph.edges {
            hasher.update(self.hash_edge(edge).as_bytes());
        }

        hex::encode(hasher.finalize())
    }

    /// Computes the hash of a single node.
    #[must_use]
    pub fn hash_node(&self, node: &GraphNode) -> String {
        let data = &node.data;
        let mut hasher = Sha256::new();

        for field in [
            data.id.as_str(),
            data.label.as_str(),
            data.kind.as_str(),
            data.parent.as_str(),
            data.parent_color,
            data.change.map_or("", |change| change.as_str()),
            node.classes.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(FIELD_SEPARATOR);
        }

        hex::encode(hasher.finalize())
    }

    /// Computes the hash of a single edge.
    #[must_use]
    pub fn hash_edge(&self, edge: &GraphEdge) -> String {
        let data = &edge.data;
        let mut hasher = Sha256::new();

        for field in [
            data.id.as_str(),
            data.source.as_str(),
            data.target.as_str(),
            data.gradient.as_str(),
            edge.classes,
        ] {
            hasher.update(field.as_bytes());
            hasher.update(FIELD_SEPARATOR);
        }

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overview::{ChangeAction, ObjectKind};

    fn sample_graph() -> Graph {
        Graph {
            nodes: vec![
                GraphNode::new("x", "x", ObjectKind::Resource, "main.tf", "resource-type"),
                GraphNode::new("x.a", "a", ObjectKind::Resource, "x", "resource-name create")
                    .with_change(Some(ChangeAction::Create)),
            ],
            edges: vec![GraphEdge::new("x.a", "var.region", "lightgray", "#1d7ada")],
        }
    }

    #[test]
    fn test_hash_deterministic() {
        let hasher = GraphHasher::new();
        let graph = sample_graph();
        assert_eq!(hasher.hash_graph(&graph), hasher.hash_graph(&sample_graph()));
        assert_eq!(hasher.hash_graph(&graph).len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let hasher = GraphHasher::new();
        let mut graph = sample_graph();
        let before = hasher.hash_graph(&graph);

        graph.nodes[1].data.change = Some(ChangeAction::Delete);
        assert_ne!(before, hasher.hash_graph(&graph));
    }

    #[test]
    fn test_field_boundaries_matter() {
        let hasher = GraphHasher::new();
        let left = GraphEdge::new("ab", "c", "x", "y");
        let right = GraphEdge::new("a", "bc", "x", "y");
        assert_ne!(hasher.hash_edge(&left), hasher.hash_edge(&right));
    }
}
