//! # Configuration
//!
//! `comanda.toml`: where the data lives and how money is shown.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults (platform data dir from `directories`)           │
//! │  2. comanda.toml, if present                                           │
//! │  3. COMANDA_DATA_DIR environment variable                              │
//! │                                                                         │
//! │  Any failure in 2 ──► warn! and keep the defaults                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [storage]
//! data_dir = "/var/lib/comanda"
//! database_file = "comanda.db"
//! max_connections = 4
//!
//! [display]
//! currency_symbol = "R$"
//! ```

use comanda_core::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "COMANDA_DATA_DIR";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE: &str = "comanda.toml";

// =============================================================================
// Sections
// =============================================================================

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_database_file")]
    pub database_file: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "comanda", "comanda")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_database_file() -> String {
    "comanda.db".to_string()
}

fn default_max_connections() -> u32 {
    4
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    /// Full path of the SQLite file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl DisplayConfig {
    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::Money;
    /// use comanda_db::config::DisplayConfig;
    ///
    /// let display = DisplayConfig::default();
    /// assert_eq!(display.format_currency(Money::from_cents(2500)), "R$ 25.00");
    /// assert_eq!(display.format_currency(Money::from_cents(-50)), "-R$ 0.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{} {}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.abs()
        )
    }
}

// =============================================================================
// ComandaConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComandaConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl ComandaConfig {
    /// Loads configuration from `config_path` (or the default location),
    /// then applies environment overrides.
    ///
    /// A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents).map_err(|e| DbError::Config(e.to_string()))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`load`](Self::load), falling back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| DbError::Config(e.to_string()))?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = PathBuf::from(dir);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "comanda", "comanda")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Full path of the SQLite file.
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path()
    }

    /// Directory holding the database file.
    pub fn data_dir(&self) -> &Path {
        &self.storage.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComandaConfig::default();
        assert_eq!(config.storage.database_file, "comanda.db");
        assert_eq!(config.storage.max_connections, 4);
        assert_eq!(config.display.currency_symbol, "R$");
        assert!(config.database_path().ends_with("comanda.db"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[display]\ncurrency_symbol = \"US$\"\n").unwrap();

        let config = ComandaConfig::load(Some(path)).unwrap();
        assert_eq!(config.display.currency_symbol, "US$");
        assert_eq!(config.storage.database_file, "comanda.db");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = ComandaConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.max_connections = 2;
        config.save(Some(path.clone())).unwrap();

        let loaded: ComandaConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[storage\nmax_connections = \"many\"").unwrap();

        assert!(matches!(
            ComandaConfig::load(Some(path.clone())),
            Err(DbError::Config(_))
        ));
        let fallback = ComandaConfig::load_or_default(Some(path));
        assert_eq!(fallback.storage.database_file, "comanda.db");
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = ComandaConfig::default();
        config.apply_overrides(|name| (name == DATA_DIR_ENV).then(|| "/srv/comanda".to_string()));
        assert_eq!(config.database_path(), PathBuf::from("/srv/comanda/comanda.db"));

        let mut untouched = ComandaConfig::default();
        untouched.apply_overrides(|_| Some(String::new()));
        assert_eq!(untouched.storage, StorageConfig::default());
    }

    #[test]
    fn test_format_currency() {
        let display = DisplayConfig::default();
        assert_eq!(display.format_currency(Money::from_cents(1234)), "R$ 12.34");
        assert_eq!(display.format_currency(Money::zero()), "R$ 0.00");
        assert_eq!(display.format_currency(Money::from_cents(-1234)), "-R$ 12.34");
    }
}
