//! Quayside settings CLI.
//!
//! Loads the settings document with deployment-profile overlays applied,
//! merges any trailing command-line overrides, and prints the effective
//! settings as JSON on stdout.

use anyhow::Context;
use clap::Parser;
use quayside_settings::logging::{init_logging, LoggingConfig};
use quayside_settings::profiles::JsonProfileReader;
use quayside_settings::schema::SchemaNode;
use quayside_settings::settings::Settings;
use quayside_settings::store::{read_settings_file, JsonFileSink, SettingsStore};
use quayside_settings::validator::LockCheckValidator;
use quayside_settings::{cmdline, paths};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

/// Quayside settings - load, inspect, and override application settings
#[derive(Parser)]
#[command(name = "quayside")]
#[command(about = "Hierarchical application settings with deployment profiles and locked fields")]
struct Cli {
    /// Settings document path (defaults to the platform location)
    #[arg(long)]
    settings_file: Option<PathBuf>,

    /// System-tier deployment-profile directory
    #[arg(long)]
    system_profile_dir: Option<PathBuf>,

    /// User-tier deployment-profile directory
    #[arg(long)]
    user_profile_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,

    /// Raw override tokens, e.g. `--kubernetes.options.flannel=true`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::default();
    if let Some(ref level) = cli.log_level {
        logging_config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging_config.format = format.clone();
    }
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("failed to initialize logging: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        error!("{e:#}");
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_file = cli
        .settings_file
        .or_else(paths::settings_file)
        .context("no settings location available on this platform")?;
    let system_dir = cli
        .system_profile_dir
        .unwrap_or_else(paths::system_profile_dir);
    let user_dir = cli
        .user_profile_dir
        .or_else(paths::user_profile_dir)
        .context("cannot determine the user profile directory")?;

    let reader = JsonProfileReader::new(system_dir, user_dir);
    let persisted = read_settings_file(&settings_file)?;
    let mut store = SettingsStore::load(&reader, persisted)?;
    info!(
        first_run = store.is_first_run(),
        locked = !store.locked().is_empty(),
        "settings loaded"
    );

    let validator = LockCheckValidator::new(SchemaNode::from_defaults(&Settings::default_tree()));
    let mut sink = JsonFileSink::new(&settings_file);
    cmdline::apply(&mut store, &validator, &mut sink, &cli.tokens)?;

    println!("{}", serde_json::to_string_pretty(store.settings())?);
    Ok(())
}
