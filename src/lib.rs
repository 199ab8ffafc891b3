// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Planscope
//!
//! Turns the JSON document of an infrastructure plan into views that can be
//! rendered and browsed.
//!
//! ## Overview
//!
//! A plan document carries three things: the realized state trees before and
//! after the plan, the per-object planned changes, and the declared
//! configuration. Planscope joins them into:
//!
//! - A **resource overview**: one entry per address with its kind, planned
//!   change and children
//! - A **resource map**: module, then declaring file, then declared objects
//! - A **dependency graph**: compound nodes and reference edges ready for a
//!   graph renderer
//!
//! ## Modules
//!
//! - [`plan`]: Plan document model and loading
//! - [`overview`]: Resource overview builder
//! - [`map`]: File-organized resource map
//! - [`graph`]: Dependency graph builder
//! - [`pipeline`]: Runs every builder and writes the asset bundle
//! - [`settings`]: Settings file, environment overrides and validation
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # planscope.yaml
//! name: staging-network
//! plan_file: plan.json
//! output_dir: planscope-out
//! show_sensitive: false
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod address;
pub mod cli;
pub mod error;
pub mod graph;
pub mod map;
pub mod overview;
pub mod pipeline;
pub mod plan;
pub mod reference;
pub mod settings;

#[cfg(test)]
mod fixtures;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use error::{PlanscopeError, Result};
pub use graph::{Graph, GraphBuilder};
pub use map::{MapBuilder, ResourceMap};
pub use overview::{BuildOptions, OverviewBuilder, ResourceOverview};
pub use pipeline::{AssetManifest, Assets, Pipeline};
pub use plan::{PlanDocument, PlanLoader};
pub use settings::{SettingsParser, SettingsValidator, ViewerSettings};
