//! Resource overview.
//!
//! The overview joins the realized state trees, the planned changes and the
//! declared configuration into one address-keyed view. Every other
//! projection (map, graph, summaries) is derived from it.

mod builder;
mod entry;
mod kind;

pub use builder::{BuildOptions, OverviewBuilder, SENSITIVE_VALUE};
pub use entry::{ConfigDeclaration, DetachedResource, OverviewEntry, ResourceOverview};
pub use kind::{
    ChangeAction, DATA_COLOR, LOCAL_COLOR, MODULE_COLOR, NEUTRAL_COLOR, OUTPUT_COLOR,
    ObjectKind, VARIABLE_COLOR,
};
