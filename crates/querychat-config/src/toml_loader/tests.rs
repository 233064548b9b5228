//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_querychat_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, querychat_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[backend]
url = "https://nba.example.com/api/query"
timeout_secs = 45

[rate_limit]
max_requests = 10
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.backend.url, "https://nba.example.com/api/query");
    assert_eq!(config.backend.timeout_secs, 45);
    assert_eq!(config.rate_limit.max_requests, 10);
    // Defaults preserved
    assert_eq!(config.backend.max_attempts, 3);
    assert_eq!(config.rate_limit.period_secs, 86_400);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, querychat_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_out_of_range_values_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[backend]
timeout_secs = 0

[rate_limit]
max_requests = 0
"#,
    )
    .unwrap();

    let err = load_from_path(&path).unwrap_err();
    let querychat_common::ConfigError::ValidationError(msg) = err else {
        panic!("expected a validation error");
    };
    assert!(msg.contains("backend.timeout_secs"));
    assert!(msg.contains("rate_limit.max_requests"));
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("querychat").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.backend.url, "http://localhost:8000/api/query");
    assert_eq!(config.rate_limit.max_requests, 50);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::QueryChatConfig;

    let config: QueryChatConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("querychat"));
        assert!(path_str.ends_with("config.toml"));
    }
}
