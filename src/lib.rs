//! tfci: CI step output protocol
//!
//! Captures the CI run identity at startup, collects the named results a command
//! produces, and writes them to the CI platform's output file in a form later pipeline
//! steps can read.

pub mod cli;
pub mod command;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
