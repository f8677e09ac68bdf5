//! Configuration loading tests (file + environment layering).

use serial_test::serial;
use std::io::Write;
use window_average::config::{FallbackPolicy, ServiceConfig, UpstreamMode};
use window_average::error::AverageError;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
#[serial]
fn test_load_full_file() {
    let file = write_config(
        r#"
        [application]
        name = "averages-test"
        log_level = "debug"
        log_format = "json"

        [server]
        host = "127.0.0.1"
        port = 8081
        default_window_size = 5
        max_window_size = 50

        [upstream]
        mode = "mock"
        timeout_ms = 250
        fallback = "sample_data"

        [rate_limit]
        requests_per_window = 100
        window_secs = 10
        "#,
    );

    let config = ServiceConfig::load_from(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.application.name, "averages-test");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.default_window_size, 5);
    assert_eq!(config.upstream.mode, UpstreamMode::Mock);
    assert_eq!(config.upstream.fallback, FallbackPolicy::SampleData);
    assert_eq!(config.rate_limit.requests_per_window, 100);
}

#[test]
#[serial]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig::load_from(dir.path().join("absent.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.server.port, 9876);
    assert_eq!(config.server.default_window_size, 10);
    assert_eq!(config.upstream.fallback, FallbackPolicy::Empty);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_config(
        r#"
        [server]
        port = 8081
        "#,
    );

    std::env::set_var("WINDOW_AVG_SERVER__PORT", "9100");
    std::env::set_var("WINDOW_AVG_UPSTREAM__TIMEOUT_MS", "1500");
    let result = ServiceConfig::load_from(file.path());
    std::env::remove_var("WINDOW_AVG_SERVER__PORT");
    std::env::remove_var("WINDOW_AVG_UPSTREAM__TIMEOUT_MS");

    let config = result.unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.upstream.timeout_ms, 1500);
}

#[test]
#[serial]
fn test_malformed_file_is_config_error() {
    let file = write_config(
        r#"
        [server]
        port = "not a number"
        "#,
    );
    assert!(matches!(
        ServiceConfig::load_from(file.path()),
        Err(AverageError::Config(_))
    ));
}

#[test]
#[serial]
fn test_shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/window_average.toml");
    let config = ServiceConfig::load_from(path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.server.port, 9876);
}
