//! Configuration loading and validation

use fcache_infrastructure::config::loader::validate_app_config;
use fcache_infrastructure::config::{AppConfig, ConfigLoader};
use fcache_infrastructure::constants::{CACHE_DEFAULT_TTL_SECS, CACHE_RECOVERY_THRESHOLD};
use std::time::Duration;

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("fcache.toml");
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert!(config.cache.enabled);
    assert!(!config.cache.has_remote());
    assert_eq!(config.cache.default_ttl_secs, CACHE_DEFAULT_TTL_SECS);
    assert_eq!(config.cache.recovery_threshold, CACHE_RECOVERY_THRESHOLD);
    assert_eq!(config.batch.operation_timeout(), None);
    assert_eq!(config.logging.level, "info");
    validate_app_config(&config).unwrap();
}

#[test]
fn test_load_from_toml_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
[cache]
redis_url = "redis://cache.internal:6379"
namespace = "puantaj"
default_ttl_secs = 120
remote_timeout_ms = 250

[batch]
operation_timeout_ms = 1500

[logging]
level = "debug"
"#,
    );

    let config = ConfigLoader::new().with_config_path(&path).load().unwrap();
    assert!(config.cache.has_remote());
    assert_eq!(config.cache.namespace.as_deref(), Some("puantaj"));
    assert_eq!(config.cache.default_ttl(), Duration::from_secs(120));
    assert_eq!(config.cache.remote_timeout(), Duration::from_millis(250));
    // Unspecified keys keep their defaults
    assert_eq!(config.cache.recovery_threshold, CACHE_RECOVERY_THRESHOLD);
    assert_eq!(
        config.batch.operation_timeout(),
        Some(Duration::from_millis(1500))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("FCACHE_TEST_UNUSED")
        .load()
        .unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_zero_ttl_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(&dir, "[cache]\ndefault_ttl_secs = 0\n");
    let err = ConfigLoader::new().with_config_path(&path).load().unwrap_err();
    assert!(err.to_string().contains("TTL"));
}

#[test]
fn test_invalid_values_rejected() {
    let cases: [fn(&mut AppConfig); 5] = [
        |c| c.cache.scan_batch_size = 0,
        |c| c.cache.recovery_threshold = 0,
        |c| c.cache.max_local_entries = 0,
        |c| c.cache.namespace = Some("a:b".to_string()),
        |c| c.logging.level = "loud".to_string(),
    ];
    for mutate in cases {
        let mut config = AppConfig::default();
        mutate(&mut config);
        assert!(validate_app_config(&config).is_err(), "{config:?}");
    }
}

#[test]
fn test_remote_settings_validated_only_with_remote() {
    let mut config = AppConfig::default();
    config.cache.remote_timeout_ms = 0;
    validate_app_config(&config).unwrap();

    config.cache.redis_url = Some("redis://127.0.0.1:6379".to_string());
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("saved.toml");
    let mut config = AppConfig::default();
    config.cache.namespace = Some("ops".to_string());
    config.cache.max_local_entries = 64;

    let loader = ConfigLoader::new().with_env_prefix("FCACHE_TEST_UNUSED");
    loader.save_to_file(&config, &path).unwrap();
    let reloaded = loader.with_config_path(&path).load().unwrap();
    assert_eq!(reloaded, config);
}

/// Environment overrides use the `FCACHE_` prefix and `__` for nesting
///
/// Run with: `cargo test -p fcache-infrastructure --test unit -- --ignored --test-threads=1`
#[test]
#[ignore = "mutates process environment; requires --test-threads=1"]
fn test_env_overrides_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(&dir, "[cache]\ndefault_ttl_secs = 120\n");

    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::set_var("FCACHE_CACHE__DEFAULT_TTL_SECS", "45");
    }
    let config = ConfigLoader::new().with_config_path(&path).load();
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::remove_var("FCACHE_CACHE__DEFAULT_TTL_SECS");
    }

    assert_eq!(config.unwrap().cache.default_ttl_secs, 45);
}
