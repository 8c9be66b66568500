pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rollout_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use rollout_core::ApplicationError;

use crate::commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "rollout",
    about = "Movie marketing rollout planner",
    long_about = "Plan phased movie marketing rollouts and package campaign assets into export packs.",
    after_help = "Examples:\n  rollout plan --input request.json --now 2024-03-01\n  rollout export --input campaign.json\n  rollout config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a rollout.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Days past now used when a release date is unreadable")]
    fallback_release_days: Option<i64>,
    #[arg(long, global = true, help = "Directory for export packs written without --output")]
    output_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level: trace|debug|info|warn|error")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Log format: compact|pretty|json")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Config loading options; flags outrank env, file and defaults.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                fallback_release_days: self.fallback_release_days,
                export_output_dir: self.output_dir.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Build a rollout plan from a request file and print it as JSON")]
    Plan(PlanArgs),
    #[command(about = "Write a campaign export pack (zip) and print a structured outcome")]
    Export(ExportArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[arg(long, help = "Plan request JSON file")]
    pub input: PathBuf,
    #[arg(long, help = "Planning clock as RFC 3339 or YYYY-MM-DD (defaults to the current time)")]
    pub now: Option<String>,
    #[arg(long, help = "Total budget override in dollars")]
    pub budget: Option<f64>,
    #[arg(long, help = "Campaign length override in weeks")]
    pub weeks: Option<i64>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[arg(long, help = "Campaign JSON file")]
    pub input: PathBuf,
    #[arg(long, help = "Archive path (defaults to <export.output_dir>/<title>_export.zip)")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Clock for release-window CTAs as RFC 3339 or YYYY-MM-DD")]
    pub now: Option<String>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    let result = match cli.command {
        Command::Config => commands::config::run(&options),
        Command::Plan(args) => {
            with_config("plan", options, |config| commands::plan::run(&args, config))
        }
        Command::Export(args) => {
            with_config("export", options, |config| commands::export::run(&args, config))
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn with_config(
    command: &str,
    options: LoadOptions,
    run: impl FnOnce(&AppConfig) -> CommandResult,
) -> CommandResult {
    match AppConfig::load(options) {
        Ok(config) => {
            logging::init(&config.logging);
            run(&config)
        }
        Err(error) => CommandResult::from_error(command, ApplicationError::from(error)),
    }
}
