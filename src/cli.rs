//! CLI domain: parse, route, help, output, and presentation only.
//! Command logic lives in `crate::command`; this layer maps arguments onto it.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_close_summary_json, format_close_summary_text, format_identity_json,
    format_identity_text,
};
pub use route::{parse_assignment, RunContext};
