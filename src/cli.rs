use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tagwire")]
#[command(about = "Inspect and apply audio tag envelopes: extended properties, chapters and lyrics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of ~/.config/tagwire/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display audio properties, chapters and lyrics
    Show {
        /// Path to the audio file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a file's tags as a binary envelope
    Read {
        /// Path to the audio file
        file: PathBuf,

        /// Write the envelope here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply chapters and lyrics from a binary envelope
    Write {
        /// Path to the audio file
        file: PathBuf,

        /// Path to the envelope
        envelope: PathBuf,

        /// Actually apply changes (default: dry-run)
        #[arg(long)]
        no_dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Skip creating backup file
        #[arg(long = "no-backup-i-void-my-warranty")]
        no_backup: bool,
    },

    /// Print the detected audio format
    Detect {
        /// Path to the audio file
        file: PathBuf,
    },

    /// List supported formats with their codec and container names
    Formats,
}
