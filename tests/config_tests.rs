use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use ossaudit::config::{
    ConfigProvider, OssauditConfig, TomlConfigProvider, DEFAULT_API_URL, MAX_BATCH_SIZE,
};
use ossaudit::errors::ConfigError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Creates a temporary TOML config file with the given content
fn create_temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    let mut file = File::create(&config_path).expect("Failed to create config file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config content");

    (temp_dir, config_path)
}

/// Provider that ignores the environment and the user's real config
fn isolated_provider(default_path: Option<PathBuf>) -> TomlConfigProvider {
    TomlConfigProvider::new()
        .with_default_path(default_path)
        .with_env(false)
}

#[test]
fn test_default_config() {
    let config = OssauditConfig::default();

    assert_eq!(config.username, None);
    assert_eq!(config.token, None);
    assert_eq!(config.columns, vec!["name", "version", "title"]);
    assert!(config.ignore_ids.is_empty());
    assert_eq!(config.python, None);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.cache_ttl_hours, 24);
    assert_eq!(config.batch_size, MAX_BATCH_SIZE);
}

#[test]
fn test_load_toml_config() {
    let config_content = r#"
    username = "abc"
    token = "xyz"
    columns = ["Name", "Version", "CVE", "CVSS_Score"]
    ignore-ids = ["CVE-2019-1010083"]
    python = "python3.7"
    api-url = "http://localhost:8080/report"
    cache-ttl-hours = 1
    batch-size = 64
    "#;

    let (_dir, path) = create_temp_config(config_content);

    let config = isolated_provider(None)
        .load_config(Some(&path))
        .expect("Failed to load config");

    assert_eq!(config.credentials(), Some(("abc", "xyz")));
    assert_eq!(config.columns, vec!["Name", "Version", "CVE", "CVSS_Score"]);
    assert_eq!(config.ignore_ids, vec!["CVE-2019-1010083"]);
    assert_eq!(config.python.as_deref(), Some("python3.7"));
    assert_eq!(config.api_url, "http://localhost:8080/report");
    assert_eq!(config.cache_ttl_hours, 1);
    assert_eq!(config.batch_size, 64);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let (_dir, path) = create_temp_config("username = \"abc\"\n");

    let config = isolated_provider(None)
        .load_config(Some(&path))
        .expect("Failed to load config");

    assert_eq!(config.username.as_deref(), Some("abc"));
    assert_eq!(config.credentials(), None);
    assert_eq!(config.columns, OssauditConfig::default().columns);
}

#[test]
fn test_default_path_is_used_when_present() {
    let (_dir, path) = create_temp_config("ignore-ids = [\"1\"]\n");

    let config = isolated_provider(Some(path))
        .load_config(None)
        .expect("Failed to load config");

    assert_eq!(config.ignore_ids, vec!["1"]);
}

#[test]
fn test_missing_default_path_gives_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("nope.toml");

    let config = isolated_provider(Some(missing))
        .load_config(None)
        .expect("Failed to load config");

    assert_eq!(config, OssauditConfig::default());
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("nope.toml");

    let result = isolated_provider(None).load_config(Some(&missing));
    assert!(matches!(result, Err(ConfigError::LoadError { .. })));
}

#[test]
fn test_invalid_config_is_an_error() {
    let (_dir, path) = create_temp_config("...");

    let result = isolated_provider(None).load_config(Some(&path));
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_unknown_key_is_an_error() {
    let (_dir, path) = create_temp_config("colums = [\"name\"]\n");

    let result = isolated_provider(None).load_config(Some(&path));
    match result {
        Err(ConfigError::ParseError { message, .. }) => assert!(message.contains("colums")),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_batch_size_out_of_range() {
    let (_dir, path) = create_temp_config("batch-size = 500\n");

    let result = isolated_provider(None).load_config(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "batch-size"));
}

#[test]
fn test_empty_columns_are_rejected() {
    let (_dir, path) = create_temp_config("columns = []\n");

    let result = isolated_provider(None).load_config(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "columns"));
}
