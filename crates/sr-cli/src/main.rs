//! Command-line runner for the Sprawl Runner text adventure.

mod commands;
mod console;
mod error;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use sr_game::GameConfig;
use tracing_subscriber::EnvFilter;

use crate::console::StdConsole;
use crate::error::{CliError, exit_status};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SPRAWL_LOG";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str =
    "warn,sprawl_runner=debug,sr_core=debug,sr_assistant=debug,sr_game=debug";

#[derive(Parser)]
#[command(
    name = "sprawl-runner",
    about = "Sprawl Runner: a cyberpunk text adventure narrated by an AI assistant",
    version,
    propagate_version = true
)]
struct Cli {
    /// Settings file (default: ~/.sprawl-runner.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game (the default)
    Play,

    /// Write a settings file template
    Init {
        /// OpenAI API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: GameConfig) -> Result<(), CliError> {
    let path = match cli.config {
        Some(path) => path,
        None => settings::default_path()?,
    };

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => commands::play::run(&path, config),
        Commands::Init {
            api_key,
            model,
            force,
        } => commands::init::run(&path, api_key.as_deref(), model.as_deref(), force),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GameConfig::default();
    let mut console = StdConsole::new(&config.quit_command);
    let status = exit_status(run(cli, config), &mut console);
    process::exit(status);
}
