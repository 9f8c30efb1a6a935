//! Merge rules: defaults, override order, environment overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, Map};

/// Prefix for environment overrides, e.g. `TFCI__OUTPUT__ECHO_STDOUT=false`.
pub const ENV_PREFIX: &str = "TFCI";
const ENV_SEPARATOR: &str = "__";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output.echo_stdout", true)?
        .set_default("output.platform", "auto")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "console")?
        .set_default("logging.color", true)
}

/// Add the environment override layer. `vars` replaces the process environment when set.
pub fn add_env_overrides(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(vars),
    )
}
