//! CLI parse: clap types for tfci. No behavior; definitions only.

use crate::command::Status;
use crate::environment::PlatformSelection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tfci - report CI step results through the CI platform's output protocol
#[derive(Parser)]
#[command(name = "tfci", version)]
#[command(about = "Report CI step results through the CI platform's output protocol")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for .tfci/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (console, json)
    #[arg(long)]
    pub log_format: Option<String>,

    /// CI platform (auto, github, generic)
    #[arg(long)]
    pub platform: Option<PlatformSelection>,

    /// Do not echo outputs as ::set-output lines
    #[arg(long)]
    pub no_echo: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the run identity captured from the CI environment
    Identity {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Record outputs and a terminal status, then write them to the platform output file
    Output {
        /// Output given inline
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Output read from a file
        #[arg(long = "file", value_name = "KEY=PATH")]
        file: Vec<String>,
        /// Structured output; the value must be valid JSON
        #[arg(long = "json", value_name = "KEY=JSON")]
        json: Vec<String>,
        /// Keys to write as delimited blocks even when single-line
        #[arg(long, value_name = "KEY")]
        multiline: Vec<String>,
        /// Keys to leave out of the ::set-output echo
        #[arg(long, value_name = "KEY")]
        hidden: Vec<String>,
        /// Terminal status recorded as the `status` output
        #[arg(long, default_value = "success")]
        status: Status,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration as TOML
    Config,
}
