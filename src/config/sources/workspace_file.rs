//! Workspace config file source: `.tfci/config.toml` under the workspace root

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the workspace config file.
pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".tfci").join("config.toml")
}

/// Add workspace config file to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if path.exists() {
        debug!(config_path = %path.display(), "Loading workspace configuration");
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}
