//! Integration tests for layered configuration loading.

use config::Map;
use tempfile::TempDir;
use tfci::config::{workspace_config_path, ConfigLoader, TfciConfig};
use tfci::environment::PlatformSelection;

#[test]
fn test_defaults_without_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::load_with_env(temp_dir.path(), Some(Map::new())).unwrap();
    assert_eq!(config, TfciConfig::default());
}

#[test]
fn test_rendered_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = TfciConfig::default();
    config.output.platform = PlatformSelection::Generic;
    config.output.echo_stdout = false;
    config.logging.format = "json".to_string();

    let path = workspace_config_path(temp_dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = ConfigLoader::load_with_env(temp_dir.path(), Some(Map::new())).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_env_log_level_override() {
    let temp_dir = TempDir::new().unwrap();
    let mut vars = Map::new();
    vars.insert("TFCI__LOGGING__LEVEL".to_string(), "warn".to_string());
    let config = ConfigLoader::load_with_env(temp_dir.path(), Some(vars)).unwrap();
    assert_eq!(config.logging.level, "warn");
}
