//! Integration tests for the tfci CI output protocol

mod cli_commands;
mod config_integration;
mod github_output;

pub use test_utils::{env_from, parse_output_file, TfciRun};
