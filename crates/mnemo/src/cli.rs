use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mnemo_core::OutputFormat;

#[derive(Parser)]
#[command(name = "mnemo")]
#[command(about = "Maintain a durable user-memory document from chat transcripts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Config file (defaults to the XDG config location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze recent chat logs and amend the memory document
    Process {
        /// Specific transcript file under the logs directory
        #[arg(long)]
        log_file: Option<String>,

        /// Days of logs to look back (defaults to config)
        #[arg(long)]
        days: Option<u32>,

        /// Show proposed amendments without touching the document
        #[arg(long)]
        dry_run: bool,

        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Create the memory document and starter prompts file
    Init,

    /// Show document and transcript statistics
    Stats,

    /// Print the current memory document
    Show {
        /// Render as a prompt-injection context block
        #[arg(long)]
        context: bool,
    },
}
