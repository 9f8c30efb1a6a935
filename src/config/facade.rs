//! Config loader facade: builds a `TfciConfig` from every source in precedence order.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::TfciConfig;
use config::{ConfigError, File, Map};
use std::path::Path;

/// Loads configuration from defaults, files and environment overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the global file, `<workspace_root>/.tfci/config.toml` and `TFCI__*` variables.
    pub fn load(workspace_root: &Path) -> Result<TfciConfig, ConfigError> {
        Self::load_with_env(workspace_root, None)
    }

    /// Like [`ConfigLoader::load`], with `env_vars` standing in for the process environment.
    pub fn load_with_env(
        workspace_root: &Path,
        env_vars: Option<Map<String, String>>,
    ) -> Result<TfciConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = merge_policy::add_env_overrides(builder, env_vars);
        builder.build()?.try_deserialize()
    }

    /// Load from an explicit file. The file must exist; env overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<TfciConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = merge_policy::add_env_overrides(builder, None);
        builder.build()?.try_deserialize()
    }
}
