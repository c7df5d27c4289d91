mod cli;
mod commands;
mod config;
mod editor;
mod safety;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { file, json } => {
            commands::show::run(&file, json, cli.quiet)?;
        }
        Commands::Read { file, output } => {
            commands::read::run(&file, output.as_deref(), cli.quiet)?;
        }
        Commands::Write {
            file,
            envelope,
            no_dry_run,
            yes,
            no_backup,
        } => {
            commands::write::run(&file, &envelope, &config, no_dry_run, yes, no_backup)?;
        }
        Commands::Detect { file } => {
            commands::detect::run(&file)?;
        }
        Commands::Formats => {
            commands::formats::run()?;
        }
    }

    Ok(())
}
