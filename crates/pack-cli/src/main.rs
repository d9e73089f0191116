//! Expansion-pack installer CLI
//!
//! Installs a content pack into a project, validates packs and
//! installations, and reports drift against the install manifest.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} expansion-pack installer", "pack".green().bold());
            println!();
            println!("Run {} for available commands.", "pack --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install {
            locations,
            ides,
            framework_version,
            dry_run,
            json,
        } => commands::run_install(&locations, &ides, framework_version, dry_run, json),
        Commands::Validate {
            locations,
            installed,
            json,
        } => commands::run_validate(&locations, installed, json),
        Commands::Status { locations, json } => commands::run_status(&locations, json),
        Commands::TeamFiles { pack, copy, to } => {
            commands::run_team_files(&pack, copy.as_deref(), to)
        }
        Commands::Agents { pack, json } => commands::run_agents(&pack, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pack", &mut std::io::stdout());
            Ok(())
        }
    }
}
