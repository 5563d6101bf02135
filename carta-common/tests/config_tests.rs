//! Tests for configuration loading and data folder resolution
//!
//! Tests that manipulate CARTA_DATA_FOLDER are marked #[serial] so they never
//! race each other on the process environment.

use carta_common::config::{resolve_data_folder, DataFolder, TomlConfig, DATA_FOLDER_ENV};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn config_with_folder(folder: &str) -> TomlConfig {
    TomlConfig {
        data_folder: Some(PathBuf::from(folder)),
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(DATA_FOLDER_ENV, "/from/env");
    let resolved = resolve_data_folder(Some(Path::new("/from/cli")), &config_with_folder("/from/toml"));
    env::remove_var(DATA_FOLDER_ENV);
    assert_eq!(resolved, PathBuf::from("/from/cli"));
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(DATA_FOLDER_ENV, "/from/env");
    let resolved = resolve_data_folder(None, &config_with_folder("/from/toml"));
    env::remove_var(DATA_FOLDER_ENV);
    assert_eq!(resolved, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(DATA_FOLDER_ENV);
    let resolved = resolve_data_folder(None, &config_with_folder("/from/toml"));
    assert_eq!(resolved, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_default_when_nothing_set() {
    env::remove_var(DATA_FOLDER_ENV);
    let resolved = resolve_data_folder(None, &TomlConfig::default());
    assert!(resolved.ends_with("carta") || resolved.ends_with("carta_data"));
}

#[test]
fn test_missing_explicit_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TomlConfig::load_or_default(Some(&dir.path().join("absent.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "data_folder = [not valid").unwrap();
    assert!(TomlConfig::from_file(&path).is_err());
    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());
}

#[test]
fn test_explicit_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "database_file = \"mine.db\"\n[logging]\nlevel = \"warn\"\n").unwrap();

    let config = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.database_file, "mine.db");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_data_folder_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let folder = DataFolder::new(dir.path().join("a").join("b"), &TomlConfig::default());
    folder.ensure_directory_exists().unwrap();
    assert!(folder.root().is_dir());
    assert_eq!(folder.database_path(), dir.path().join("a").join("b").join("carta.db"));
}
