//! Planscope CLI entrypoint.
//!
//! This is the main entrypoint for the planscope command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use planscope::cli::{Cli, Commands, OutputFormatter};
use planscope::error::{PlanscopeError, Result, SettingsError};
use planscope::pipeline::Pipeline;
use planscope::plan::PlanLoader;
use planscope::settings::{SettingsParser, SettingsValidator, ViewerSettings, find_settings_file};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.log_json);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr so that stdout stays
/// machine-readable.
fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs the selected command.
fn run(cli: &Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let settings = resolve_settings(cli, &formatter)?;

    let plan_file = settings
        .plan_file
        .clone()
        .ok_or(PlanscopeError::Settings(SettingsError::MissingPlanFile))?;
    let plan = PlanLoader::new().load_file(&plan_file)?;
    let assets = Pipeline::new(settings.build_options()).run(&plan)?;

    match &cli.command {
        Commands::Render { out_dir, .. } => {
            let dir = out_dir.as_deref().unwrap_or(settings.output_dir.as_path());
            let manifest = assets.write_to(dir, &settings.name)?;
            eprintln!("{}", formatter.format_manifest(&manifest, dir));
        }
        Commands::Summary { .. } => {
            eprintln!("{}", formatter.format_summary(&assets.overview));
        }
        Commands::Graph { .. } => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", formatter.format_graph(&assets.graph))?;
        }
    }

    Ok(())
}

/// Loads settings from the settings file (if any), `.env`, the environment
/// and finally the command-line flags, then validates them.
fn resolve_settings(cli: &Cli, formatter: &OutputFormatter) -> Result<ViewerSettings> {
    let settings_file = match &cli.settings {
        Some(path) => Some(path.clone()),
        None => {
            let cwd = std::env::current_dir()?;
            find_settings_file(&cwd).ok()
        }
    };

    let base_path = settings_file
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let parser = SettingsParser::new().with_base_path(base_path);
    parser.load_dotenv()?;

    let mut settings = if let Some(path) = &settings_file {
        parser.load_with_env(path)?
    } else {
        debug!("No settings file found, using defaults");
        let mut settings = ViewerSettings::default();
        SettingsParser::apply_overrides(&mut settings, |key| std::env::var(key).ok());
        settings
    };

    cli.command.input().apply_to(&mut settings);

    let result = SettingsValidator::new().validate(&settings)?;
    if !result.warnings.is_empty() {
        eprint!("{}", formatter.format_warnings(&result.warnings));
    }

    info!("Using settings: {}", settings.name);
    Ok(settings)
}
