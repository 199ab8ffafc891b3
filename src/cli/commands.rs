//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::ViewerSettings;

/// Planscope - Visualize infrastructure plans as overviews, maps and graphs.
#[derive(Parser, Debug)]
#[command(name = "planscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "PLANSCOPE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the overview, map and graph of a plan to disk.
    Render {
        /// Plan input.
        #[command(flatten)]
        input: InputArgs,

        /// Directory to write the assets to.
        #[arg(short = 'o', long)]
        out_dir: Option<PathBuf>,
    },

    /// Summarize the planned changes.
    Summary {
        /// Plan input.
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the graph JSON to stdout.
    Graph {
        /// Plan input.
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Arguments selecting and interpreting the plan.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Plan document produced by `show -json`.
    #[arg(short, long)]
    pub plan: Option<PathBuf>,

    /// Keep sensitive values instead of redacting them.
    #[arg(long)]
    pub show_sensitive: bool,

    /// The configuration files are not available locally; group every
    /// object under the "unknown" file.
    #[arg(long)]
    pub no_config: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    /// Returns the plan input arguments of the command.
    #[must_use]
    pub const fn input(&self) -> &InputArgs {
        match self {
            Self::Render { input, .. } | Self::Summary { input } | Self::Graph { input } => input,
        }
    }
}

impl InputArgs {
    /// Applies the flags on top of file and environment settings.
    pub fn apply_to(&self, settings: &mut ViewerSettings) {
        if let Some(plan) = &self.plan {
            settings.plan_file = Some(plan.clone());
        }
        if self.show_sensitive {
            settings.show_sensitive = true;
        }
        if self.no_config {
            settings.config_available = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "planscope",
            "render",
            "--plan",
            "plan.json",
            "--out-dir",
            "out",
            "--show-sensitive",
        ])
        .expect("valid arguments");

        match &cli.command {
            Commands::Render { input, out_dir } => {
                assert_eq!(input.plan, Some(PathBuf::from("plan.json")));
                assert!(input.show_sensitive);
                assert!(!input.no_config);
                assert_eq!(out_dir.as_deref(), Some(std::path::Path::new("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["planscope", "summary", "-p", "plan.json", "--output", "json", "-v"])
            .expect("valid arguments");
        assert!(cli.verbose);
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Summary { .. }));
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = ViewerSettings {
            plan_file: Some(PathBuf::from("from-settings.json")),
            ..ViewerSettings::default()
        };
        let input = InputArgs {
            plan: Some(PathBuf::from("from-flag.json")),
            show_sensitive: false,
            no_config: true,
        };

        input.apply_to(&mut settings);

        assert_eq!(settings.plan_file, Some(PathBuf::from("from-flag.json")));
        assert!(!settings.show_sensitive);
        assert!(!settings.config_available);
    }

    #[test]
    fn test_input_accessor() {
        let cli = Cli::try_parse_from(["planscope", "graph", "--no-config"]).expect("valid arguments");
        assert!(cli.command.input().no_config);
        assert!(cli.command.input().plan.is_none());
    }
}
