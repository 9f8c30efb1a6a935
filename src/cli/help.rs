//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded on the command span (e.g. "identity", "output").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Identity { .. } => "identity",
        Commands::Output { .. } => "output",
        Commands::Config => "config",
    }
}
