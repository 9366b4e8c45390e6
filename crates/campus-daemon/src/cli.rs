//! CLI argument parsing for the campus-assist daemon.

use clap::{Parser, Subcommand};

/// Campus Assist
///
/// Query-classification and response-routing core for the campus
/// record-management assistant.
#[derive(Parser, Debug)]
#[command(name = "campus-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/campus-assist/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one chat query and print the response
    Chat {
        /// Calling user id
        #[arg(short, long)]
        user: u64,

        /// Query text
        query: String,
    },

    /// Classify one or more texts without dispatching
    Classify {
        /// Texts to classify (two or more run as one batch)
        #[arg(required = true, num_args = 1..)]
        texts: Vec<String>,
    },

    /// Show engine status (device, labels, cache counters)
    Status,
}
