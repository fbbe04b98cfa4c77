//! Configuration tests

use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

/// Verify that the serialized default config parses back.
#[test]
fn test_config_roundtrip_default() {
    let toml_str = Config::default().to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let config = Config::resolve(parsed.unwrap(), no_env);
    let defaults = Config::default();
    assert_eq!(config.bind_addr, defaults.bind_addr);
    assert_eq!(config.log_dir, defaults.log_dir);
    assert_eq!(config.sessions.ttl_minutes, defaults.sessions.ttl_minutes);
    assert_eq!(config.swipe.threshold_px, defaults.swipe.threshold_px);
    assert_eq!(config.swipe.server_url, defaults.swipe.server_url);
}

/// Every section written by `to_toml` must be read back by `FileConfig`.
#[test]
fn test_all_sections_serialized() {
    let toml_str = Config::default().to_toml();
    let file: FileConfig = toml::from_str(&toml_str).unwrap();

    assert!(file.features.is_some(), "[features] missing");
    assert!(file.logging.is_some(), "[logging] missing");
    assert!(file.sessions.is_some(), "[sessions] missing");
    assert!(file.swipe.is_some(), "[swipe] missing");
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::resolve(FileConfig::default(), no_env);

    assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
    assert!(config.features.journal);
    assert!(config.features.seed_catalog);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.sessions.ttl_minutes, 720);
    assert_eq!(config.swipe.threshold_px, 100.0);
    assert_eq!(config.swipe.animation_ms, 400);
}

#[test]
fn test_file_values_override_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
bind_addr = "0.0.0.0:9000"

[features]
seed_catalog = false

[logging]
file_rotation = "hourly"

[sessions]
ttl_minutes = 5

[swipe]
threshold_px = 60.0
"#,
    )
    .unwrap();

    let config = Config::resolve(file, no_env);
    assert_eq!(config.bind_addr.port(), 9000);
    assert!(!config.features.seed_catalog);
    assert!(config.features.journal);
    assert_eq!(config.logging.file_rotation, LogRotation::Hourly);
    assert_eq!(config.sessions.ttl().as_secs(), 300);
    assert_eq!(config.swipe.threshold_px, 60.0);
    assert_eq!(config.swipe.settings().threshold_px, 60.0);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
bind_addr = "0.0.0.0:9000"
log_dir = "/var/log/petmatch"

[swipe]
server_url = "http://file:1"
"#,
    )
    .unwrap();

    let env = |key: &str| match key {
        "PETMATCH_BIND" => Some("127.0.0.1:4000".to_string()),
        "PETMATCH_SERVER_URL" => Some("http://env:2".to_string()),
        _ => None,
    };

    let config = Config::resolve(file, env);
    assert_eq!(config.bind_addr.port(), 4000);
    assert_eq!(config.log_dir, PathBuf::from("/var/log/petmatch"));
    assert_eq!(config.swipe.server_url, "http://env:2");
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("NEVER"), LogRotation::Never);
}

#[test]
fn test_huge_session_ttl_saturates() {
    let file: FileConfig = toml::from_str(&format!("[sessions]\nttl_minutes = {}\n", i64::MAX)).unwrap();
    let config = Config::resolve(file, no_env);
    assert_eq!(config.sessions.ttl(), std::time::Duration::from_secs(u64::MAX));
}
