//! Asset generation pipeline.
//!
//! Runs the overview, map and graph builders over one plan and writes the
//! results as a bundle of JSON files with a manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{OutputError, PlanscopeError, Result};
use crate::graph::{Graph, GraphBuilder};
use crate::map::{MapBuilder, ResourceMap};
use crate::overview::{BuildOptions, OverviewBuilder, ResourceOverview};
use crate::plan::PlanDocument;

/// Overview file name.
pub const OVERVIEW_FILE: &str = "rso.json";

/// Map file name.
pub const MAP_FILE: &str = "map.json";

/// Graph file name.
pub const GRAPH_FILE: &str = "graph.json";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Runs every builder over a plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: BuildOptions,
}

/// Everything generated from one plan.
#[derive(Debug, Clone)]
pub struct Assets<'a> {
    /// The resource overview.
    pub overview: ResourceOverview<'a>,
    /// The resource map.
    pub map: ResourceMap,
    /// The dependency graph.
    pub graph: Graph,
}

/// Description of a written asset bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Name of the rendered configuration.
    pub name: String,
    /// When the bundle was generated.
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the graph.
    pub graph_fingerprint: String,
    /// Number of overview entries.
    pub entry_count: usize,
    /// Number of graph nodes.
    pub node_count: usize,
    /// Number of graph edges.
    pub edge_count: usize,
    /// Files of the bundle, relative to its directory.
    pub files: Vec<String>,
}

impl Pipeline {
    /// Creates a pipeline with the given options.
    #[must_use]
    pub const fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Returns the build options.
    #[must_use]
    pub const fn options(&self) -> BuildOptions {
        self.options
    }

    /// Generates every asset for a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan has no root configuration module.
    pub fn run<'a>(&self, plan: &'a PlanDocument) -> Result<Assets<'a>> {
        info!(
            "Rendering plan (show_sensitive: {}, config_available: {})",
            self.options.show_sensitive, self.options.config_available
        );

        let overview = OverviewBuilder::new(plan, self.options).build()?;
        let map = MapBuilder::new(&overview, self.options).build();
        let graph = GraphBuilder::new(&overview, self.options).build();

        info!("Rendering complete");

        Ok(Assets {
            overview,
            map,
            graph,
        })
    }
}

impl Assets<'_> {
    /// Writes the bundle to a directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be serialized or written.
    pub fn write_to(&self, dir: &Path, name: &str) -> Result<AssetManifest> {
        info!("Writing assets to {}", dir.display());

        if !dir.exists() {
            debug!("Creating output directory: {}", dir.display());
            std::fs::create_dir_all(dir).map_err(|e| {
                PlanscopeError::Output(OutputError::WriteFailed {
                    path: dir.to_path_buf(),
                    message: format!("Failed to create directory: {e}"),
                })
            })?;
        }

        write_json(dir, OVERVIEW_FILE, &self.overview)?;
        write_json(dir, MAP_FILE, &self.map)?;
        write_json(dir, GRAPH_FILE, &self.graph)?;

        let manifest = AssetManifest {
            name: name.to_string(),
            generated_at: Utc::now(),
            graph_fingerprint: self.graph.fingerprint(),
            entry_count: self.overview.entries.len(),
            node_count: self.graph.nodes.len(),
            edge_count: self.graph.edges.len(),
            files: [OVERVIEW_FILE, MAP_FILE, GRAPH_FILE]
                .iter()
                .map(ToString::to_string)
                .collect(),
        };
        write_json(dir, MANIFEST_FILE, &manifest)?;

        info!("Wrote {} assets", manifest.files.len() + 1);
        Ok(manifest)
    }
}

/// Serializes a value as pretty JSON into `dir/file`.
fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<PathBuf> {
    let path = dir.join(file);

    let content = serde_json::to_string_pretty(value)
        .map_err(|e| PlanscopeError::Output(OutputError::serialization(file, e.to_string())))?;

    std::fs::write(&path, content).map_err(|e| {
        PlanscopeError::Output(OutputError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    })?;

    debug!("Wrote {}", path.display());
    Ok(path)
}
