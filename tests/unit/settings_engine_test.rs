//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, persistence, and reset behavior.

use std::fs;

use tabshell::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabshell::types::errors::SettingsError;
use tabshell::types::settings::ShellSettings;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().join("settings.json")))
}

/// When no config file exists on disk, `load()` returns the built-in defaults.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(
        settings,
        ShellSettings::default(),
        "Loading without a config file must return default settings"
    );
    assert_eq!(settings.default_url, "about:newtab");
    assert!(settings.keep_pinned_tabs_on_close);
}

#[test]
fn test_set_settings_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let changed = ShellSettings {
        default_url: "https://home.test/".to_string(),
        keep_pinned_tabs_on_close: false,
        locale: "ru".to_string(),
        ..ShellSettings::default()
    };
    engine.set_settings(changed.clone()).unwrap();

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), changed);
}

#[test]
fn test_save_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let engine = SettingsEngine::new(Some(path.clone()));

    engine.save().unwrap();

    assert!(path.exists());
    assert_eq!(engine.get_config_path(), path.as_path());
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine
        .set_settings(ShellSettings {
            default_partition_number: 4,
            ..ShellSettings::default()
        })
        .unwrap();

    engine.reset().unwrap();

    assert_eq!(engine.get_settings(), &ShellSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), ShellSettings::default());
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    match engine.load() {
        Err(SettingsError::SerializationError(msg)) => {
            assert!(msg.starts_with("Failed to parse config file"))
        }
        other => panic!("expected serialization error, got {:?}", other),
    }
}
