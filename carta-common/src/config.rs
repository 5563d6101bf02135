//! Configuration loading and data folder resolution
//!
//! The TOML file is bootstrap-only: where the deck database lives and how
//! verbose logging is. A missing or unreadable file is never fatal; the
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data folder
pub const DATA_FOLDER_ENV: &str = "CARTA_DATA_FOLDER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Folder holding the deck database (optional)
    #[serde(default)]
    pub data_folder: Option<PathBuf>,

    /// Database file name inside the data folder
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_folder: None,
            database_file: default_database_file(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_database_file() -> String {
    "carta.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `explicit` if given, else the platform config file; defaults when neither is usable
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_file() {
                Some(path) if path.exists() => path,
                _ => return Self::default(),
            },
        };

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Platform config file location (`~/.config/carta/config.toml` on Linux)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("carta").join("config.toml"))
}

/// Data folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    default_data_folder()
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("carta"))
        .unwrap_or_else(|| PathBuf::from("./carta_data"))
}

/// Prepares the resolved data folder for use
#[derive(Debug, Clone)]
pub struct DataFolder {
    root: PathBuf,
    database_file: String,
}

impl DataFolder {
    pub fn new(root: PathBuf, config: &TomlConfig) -> Self {
        Self {
            root,
            database_file: config.database_file.clone(),
        }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(&self.database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.database_file, "carta.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.data_folder.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: TomlConfig = toml::from_str("data_folder = \"/srv/carta\"").unwrap();
        assert_eq!(config.data_folder, Some(PathBuf::from("/srv/carta")));
        assert_eq!(config.database_file, "carta.db");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let config: TomlConfig = toml::from_str(
            r#"
            data_folder = "/data"
            database_file = "decks.db"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_file, "decks.db");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_database_path_joins_file_name() {
        let folder = DataFolder::new(PathBuf::from("/data"), &TomlConfig::default());
        assert_eq!(folder.database_path(), PathBuf::from("/data/carta.db"));
    }
}
