//! Settings loading tests

use gpgen_config::{ConfigError, ConfigManager, GpgenSettings};
use std::fs;
use tempfile::TempDir;

fn isolated_manager(path: std::path::PathBuf, prefix: &str) -> ConfigManager {
    ConfigManager::new()
        .without_user_config()
        .with_env_prefix(prefix)
        .with_path(path)
}

#[test]
fn test_missing_project_file_uses_defaults() {
    let manager = ConfigManager::new()
        .without_user_config()
        .with_env_prefix("GPGEN_TEST_MISSING");
    // Default project path is relative and optional
    let settings = manager.load().unwrap();
    assert_eq!(settings.generator.runs_on, "ubuntu-latest");
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let manager = isolated_manager(dir.path().join("absent.toml"), "GPGEN_TEST_ABSENT");
    assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
}

#[test]
fn test_project_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gpgen.toml");
    fs::write(
        &path,
        "[generator]\nruns_on = \"self-hosted\"\n\n[output]\ndirectory = \"ci\"\n",
    )
    .unwrap();

    let settings = isolated_manager(path, "GPGEN_TEST_FILE").load().unwrap();
    assert_eq!(settings.generator.runs_on, "self-hosted");
    assert_eq!(settings.generator.job_name, "build");
    assert_eq!(settings.output.directory, "ci");
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gpgen.toml");
    fs::write(&path, "[generator]\njob_name = \"ci\"\n").unwrap();

    std::env::set_var("GPGEN_TEST_ENV__GENERATOR__JOB_NAME", "pipeline");
    let settings = isolated_manager(path, "GPGEN_TEST_ENV").load().unwrap();
    std::env::remove_var("GPGEN_TEST_ENV__GENERATOR__JOB_NAME");

    assert_eq!(settings.generator.job_name, "pipeline");
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gpgen.toml");
    fs::write(&path, "[logging]\nlevel = \"chatty\"\n").unwrap();

    let err = isolated_manager(path, "GPGEN_TEST_INVALID").load().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gpgen.toml");

    let mut settings = GpgenSettings::default();
    settings.generator.runs_on = "macos-latest".to_string();

    let manager = isolated_manager(path.clone(), "GPGEN_TEST_SAVE");
    manager.save(&settings, &path).unwrap();

    assert_eq!(manager.load().unwrap(), settings);
}
