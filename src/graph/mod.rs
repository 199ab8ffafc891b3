//! Dependency graph.
//!
//! This module provides the renderer-ready graph:
//! - Node hierarchy derived from the resource map
//! - Reference edges between resources, modules, variables and outputs
//! - First-wins deduplication of nodes and edges
//! - Fingerprinting for comparing runs

mod builder;
mod collection;
mod hash;
mod types;

pub use builder::GraphBuilder;
pub use collection::UniqueList;
pub use hash::GraphHasher;
pub use types::{EdgeData, Graph, GraphEdge, GraphNode, Keyed, NodeData};
