//! Plan input model.
//!
//! This module holds the typed view of a plan document:
//! - Realized state trees and per-instance changes
//! - The declared configuration tree with expression references
//! - Loading plan documents from disk

mod config;
mod loader;
mod types;

pub use config::{
    ConfigModule, ConfigOutput, ConfigResource, ConfigVariable, Configuration, Expression,
    ExpressionValue, ModuleCall, ProviderRequirement, SourcePos,
};
pub use loader::PlanLoader;
pub use types::{
    Action, Change, PlanDocument, PlanVariable, ResourceChange, ResourceMode, StateModule,
    StateOutput, StateResource, StateSnapshot, StateValues,
};
