//! Configuration layering tests.

use foads::FoadsConfig;
use std::time::Duration;

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn test_defaults() {
    let config = FoadsConfig::load_from(None, env(&[])).unwrap();
    assert_eq!(config.api_url(), "http://localhost:5000");
    assert_eq!(config.username(), "demo");
    assert!(*config.use_push_channel());
    assert!(config.token().is_none());
    assert_eq!(*config.poll().max_attempts(), 120);

    let poll = config.poll_config().unwrap();
    assert_eq!(*poll.initial_interval(), Duration::from_secs(5));
    assert_eq!(*poll.max_interval(), Duration::from_secs(30));
}

#[test]
fn test_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
api_url = "https://abcd.ngrok-free.app"
use_push_channel = false

[poll]
interval_secs = 2
max_attempts = 10
"#,
    )
    .unwrap();

    let config = FoadsConfig::load_from(Some(path.as_path()), env(&[])).unwrap();
    assert_eq!(config.api_url(), "https://abcd.ngrok-free.app");
    assert!(!*config.use_push_channel());
    assert_eq!(*config.poll().interval_secs(), 2);
    assert_eq!(*config.poll().max_attempts(), 10);
    assert_eq!(*config.request_timeout_secs(), 120);

    let config = FoadsConfig::load_from(
        Some(path.as_path()),
        env(&[
            ("FOADS_POLL__MAX_ATTEMPTS", "40"),
            ("FOADS_TOKEN", "abc"),
            ("FOADS_USERNAME", "studio"),
        ]),
    )
    .unwrap();
    assert_eq!(*config.poll().max_attempts(), 40);
    assert_eq!(*config.poll().interval_secs(), 2);
    assert_eq!(config.token().as_deref(), Some("abc"));
    assert_eq!(config.gateway_config().unwrap().login_username(), "studio");
}

#[test]
fn test_missing_file_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.toml");
    let config = FoadsConfig::load_from(Some(absent.as_path()), env(&[])).unwrap();
    assert_eq!(config, FoadsConfig::default());
}

#[test]
fn test_invalid_values_rejected() {
    assert!(FoadsConfig::load_from(None, env(&[("FOADS_API_URL", "localhost:5000")])).is_err());
    assert!(FoadsConfig::load_from(None, env(&[("FOADS_POLL__MAX_ATTEMPTS", "0")])).is_err());
}

#[test]
fn test_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = FoadsConfig::default().with_data_dir(dir.path());
    assert_eq!(
        config.database_path().unwrap(),
        dir.path().join(foads::DATABASE_FILE)
    );
}
