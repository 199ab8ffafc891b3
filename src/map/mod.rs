//! Resource map.
//!
//! A file-organized view of the configuration: module, then declaring file,
//! then the objects declared in that file, annotated with planned changes.

mod builder;
mod node;

pub use builder::{DEFAULT_MAP_PATH, MapBuilder, UNKNOWN_FILE};
pub use node::{MapNode, ResourceMap};
