//! Campus Assist Daemon
//!
//! CLI entry point for the query-classification and response-routing core.
//!
//! # Usage
//!
//! ```bash
//! campus-daemon chat --user 42 "What is my attendance this month?"
//! campus-daemon classify "What are my marks?" "Any new notices?"
//! campus-daemon status
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/campus-assist/config.toml)
//! 3. Environment variables (CAMPUS_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use campus_daemon::{
    handle_chat, handle_classify, init_tracing, load_settings, show_status, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_tracing(&settings.log_level);

    match cli.command {
        Commands::Chat { user, query } => {
            handle_chat(&settings, user, &query).await?;
        }
        Commands::Classify { texts } => {
            handle_classify(&settings, &texts).await?;
        }
        Commands::Status => {
            show_status(&settings).await?;
        }
    }

    Ok(())
}
