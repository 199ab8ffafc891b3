//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::graph::Graph;
use crate::overview::{ChangeAction, ObjectKind, OverviewEntry, ResourceOverview};
use crate::pipeline::AssetManifest;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

/// Number of changes per action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    /// Objects created.
    pub create: usize,
    /// Objects updated in place.
    pub update: usize,
    /// Objects destroyed.
    pub delete: usize,
    /// Objects replaced.
    pub replace: usize,
    /// Data sources read.
    pub read: usize,
    /// Objects left untouched.
    pub no_op: usize,
}

impl ChangeCounts {
    /// Counts the change actions of every changed object in an overview.
    #[must_use]
    pub fn from_overview(overview: &ResourceOverview<'_>) -> Self {
        let mut counts = Self::default();
        for (_, entry) in changed_entries(overview) {
            match entry.change_action {
                Some(ChangeAction::Create) => counts.create += 1,
                Some(ChangeAction::Update) => counts.update += 1,
                Some(ChangeAction::Delete) => counts.delete += 1,
                Some(ChangeAction::Replace) => counts.replace += 1,
                Some(ChangeAction::Read) => counts.read += 1,
                Some(ChangeAction::NoOp) => counts.no_op += 1,
                None => {}
            }
        }
        counts
    }

    /// Returns true if nothing is created, updated, deleted or replaced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.create + self.update + self.delete + self.replace == 0
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the planned changes of an overview.
    #[must_use]
    pub fn format_summary(&self, overview: &ResourceOverview<'_>) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&SummaryJson::from(overview)).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_summary_text(overview),
        }
    }

    /// Formats a summary as text.
    fn format_summary_text(overview: &ResourceOverview<'_>) -> String {
        let counts = ChangeCounts::from_overview(overview);

        if counts.is_empty() {
            return format!(
                "{} No changes. Infrastructure matches the configuration.\n",
                "✓".green()
            );
        }

        let mut output = String::new();
        output.push_str("\nPlanned changes\n\n");

        let rows: Vec<ChangeRow> = changed_entries(overview)
            .filter(|(_, entry)| entry.change_action != Some(ChangeAction::NoOp))
            .map(|(address, entry)| ChangeRow {
                action: entry
                    .change_action
                    .map_or_else(String::new, Self::format_action),
                address: Self::truncate(address, 60),
                kind: entry.kind.to_string(),
            })
            .collect();

        if !rows.is_empty() {
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        let _ = write!(
            output,
            "\nPlan: {} to create, {} to update, {} to destroy, {} to replace\n",
            counts.create.to_string().green(),
            counts.update.to_string().yellow(),
            counts.delete.to_string().red(),
            counts.replace.to_string().magenta()
        );

        output
    }

    /// Formats the result of writing an asset bundle.
    #[must_use]
    pub fn format_manifest(&self, manifest: &AssetManifest, dir: &Path) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(manifest).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} Rendered {} to {}\n\n",
                    "✓".green(),
                    manifest.name,
                    dir.display()
                );
                let _ = writeln!(output, "   Entries: {}", manifest.entry_count);
                let _ = writeln!(
                    output,
                    "   Graph: {} nodes, {} edges",
                    manifest.node_count, manifest.edge_count
                );
                let _ = writeln!(
                    output,
                    "   Fingerprint: {}",
                    &manifest.graph_fingerprint[..12.min(manifest.graph_fingerprint.len())]
                );
                for file in &manifest.files {
                    let _ = writeln!(output, "   - {file}");
                }
                output
            }
        }
    }

    /// Formats a graph. The graph is always JSON; text output is indented.
    #[must_use]
    pub fn format_graph(&self, graph: &Graph) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(graph).unwrap_or_default(),
            OutputFormat::Text => serde_json::to_string_pretty(graph).unwrap_or_default(),
        }
    }

    /// Formats settings warnings.
    #[must_use]
    pub fn format_warnings(&self, warnings: &[String]) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "warnings": warnings });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();
                for warning in warnings {
                    let _ = writeln!(output, "{} {warning}", "⚠".yellow());
                }
                output
            }
        }
    }

    /// Formats a change action with color.
    fn format_action(action: ChangeAction) -> String {
        match action {
            ChangeAction::Create => "+create".green().to_string(),
            ChangeAction::Update => "~update".yellow().to_string(),
            ChangeAction::Delete => "-delete".red().to_string(),
            ChangeAction::Replace => "±replace".magenta().to_string(),
            ChangeAction::Read => "<=read".cyan().to_string(),
            ChangeAction::NoOp => "no-op".dimmed().to_string(),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}

/// Entries that carry a planned change: resource and data instances, plus
/// root outputs. Repetition groups are skipped; their instances are listed.
fn changed_entries<'o>(
    overview: &'o ResourceOverview<'_>,
) -> impl Iterator<Item = (&'o str, &'o OverviewEntry)> {
    overview
        .entries
        .iter()
        .filter(|(_, entry)| {
            matches!(
                entry.kind,
                ObjectKind::Resource | ObjectKind::Data | ObjectKind::Output
            ) && !entry.is_repeated
                && entry.change_action.is_some()
        })
        .map(|(address, entry)| (address.as_str(), entry))
}

// JSON serialization helpers

#[derive(Serialize)]
struct SummaryJson<'o> {
    counts: ChangeCounts,
    changes: Vec<ChangeJson<'o>>,
}

#[derive(Serialize)]
struct ChangeJson<'o> {
    address: &'o str,
    kind: ObjectKind,
    action: Option<ChangeAction>,
}

impl<'o> From<&'o ResourceOverview<'_>> for SummaryJson<'o> {
    fn from(overview: &'o ResourceOverview<'_>) -> Self {
        Self {
            counts: ChangeCounts::from_overview(overview),
            changes: changed_entries(overview)
                .map(|(address, entry)| ChangeJson {
                    address,
                    kind: entry.kind,
                    action: entry.change_action,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_plan;
    use crate::overview::{BuildOptions, OverviewBuilder};

    #[test]
    fn test_change_counts() {
        let plan = scenario_plan();
        let overview = OverviewBuilder::new(&plan, BuildOptions::default())
            .build()
            .expect("overview builds");

        let counts = ChangeCounts::from_overview(&overview);
        assert_eq!(counts.create, 3);
        assert_eq!(counts.update, 1);
        assert_eq!(counts.delete, 0);
        assert!(!counts.is_empty());
    }

    #[test]
    fn test_summary_json() {
        let plan = scenario_plan();
        let overview = OverviewBuilder::new(&plan, BuildOptions::default())
            .build()
            .expect("overview builds");

        let output = OutputFormatter::new(OutputFormat::Json).format_summary(&overview);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value["counts"]["create"], 3);
        let addresses: Vec<&str> = value["changes"]
            .as_array()
            .expect("changes array")
            .iter()
            .filter_map(|change| change["address"].as_str())
            .collect();
        assert!(addresses.contains(&"x.a[0]"));
        assert!(addresses.contains(&"output.secret"));
        assert!(!addresses.contains(&"x.a"));
    }

    #[test]
    fn test_summary_text_lists_changes() {
        colored::control::set_override(false);
        let plan = scenario_plan();
        let overview = OverviewBuilder::new(&plan, BuildOptions::default())
            .build()
            .expect("overview builds");

        let output = OutputFormatter::new(OutputFormat::Text).format_summary(&overview);
        assert!(output.contains("module.net.y.b"));
        assert!(output.contains("Plan: 3 to create, 1 to update, 0 to destroy, 0 to replace"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("module.network.aws_subnet", 10), "module....");
    }
}
