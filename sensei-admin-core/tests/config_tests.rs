use sensei_admin_core::config::AdminConfig;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = AdminConfig::default();

    assert_eq!(config.api.base_url, "http://127.0.0.1:5401/api");
    assert_eq!(config.api.request_timeout, Duration::from_secs(10));
    assert_eq!(config.api.retry.max_attempts, 3);
    assert_eq!(config.list.page_size, 5);
    assert_eq!(config.ui.tick_rate, Duration::from_millis(100));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_from_toml() {
    let toml_content = r#"
[api]
base_url = "https://sensei.internal:5401/api"
request_timeout = "3s"

[api.retry]
max_attempts = 5
initial_delay = "50ms"
max_delay = "2s"
backoff_multiplier = 1.5

[list]
page_size = 25

[ui]
tick_rate = "250ms"

[logging]
level = "debug"
file = "/var/log/sensei-admin.log"
"#;

    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), toml_content).unwrap();

    let config = AdminConfig::from_file(temp_file.path()).unwrap();

    assert_eq!(config.api.base_url, "https://sensei.internal:5401/api");
    assert_eq!(config.api.request_timeout, Duration::from_secs(3));
    assert_eq!(config.api.retry.max_attempts, 5);
    assert_eq!(config.api.retry.initial_delay, Duration::from_millis(50));
    assert_eq!(config.api.retry.max_delay, Duration::from_secs(2));
    assert_eq!(config.list.page_size, 25);
    assert_eq!(config.ui.tick_rate, Duration::from_millis(250));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, PathBuf::from("/var/log/sensei-admin.log"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), "[list]\npage_size = 10\n").unwrap();

    let config = AdminConfig::from_file(temp_file.path()).unwrap();

    assert_eq!(config.list.page_size, 10);
    assert_eq!(config.api.base_url, "http://127.0.0.1:5401/api");
    assert_eq!(config.api.retry.max_attempts, 3);
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(
        temp_file.path(),
        "[api]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    let config = AdminConfig::from_file(temp_file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), "[list\npage_size = ").unwrap();

    assert!(AdminConfig::from_file(temp_file.path()).is_err());
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = AdminConfig::from_file("/nonexistent/sensei-admin.toml").unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}
