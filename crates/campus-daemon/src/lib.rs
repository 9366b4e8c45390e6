//! Campus daemon library exports.
//!
//! This crate provides the CLI binary for the campus-assist chat core.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (chat, classify, status)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{handle_chat, handle_classify, init_tracing, load_settings, show_status};
