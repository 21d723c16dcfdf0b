//! Configuration management for alunos.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "alunos";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "alunos.db";

/// Environment variable prefix. Nested keys use a double underscore,
/// e.g. `ALUNOS_FORM__SUCCESS_CLEAR_MS=1500`.
const ENV_PREFIX: &str = "ALUNOS_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ALUNOS_`)
/// 2. TOML config file at `~/.config/alunos/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Creation form configuration.
    pub form: FormConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/alunos/alunos.db`
    pub database_path: Option<PathBuf>,
    /// Default number of rows shown by list views.
    pub list_limit: usize,
}

/// Creation form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// How long the success banner stays up, in milliseconds.
    pub success_clear_ms: u64,
    /// Refuse a new submission while a create call is outstanding.
    pub block_resubmit: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // resolved at runtime
            list_limit: 100,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_clear_ms: 3000,
            block_resubmit: true,
        }
    }
}

impl FormConfig {
    /// The success banner lifetime as a Duration.
    #[must_use]
    pub fn success_clear_delay(&self) -> Duration {
        Duration::from_millis(self.success_clear_ms)
    }
}

impl Config {
    /// Load configuration from defaults, the TOML file at `config_path` (or
    /// the default path) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.form.success_clear_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "success_clear_ms must be greater than 0".to_string(),
            });
        }

        if self.storage.list_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "list_limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.list_limit, 100);
        assert_eq!(config.form.success_clear_ms, 3000);
        assert!(config.form.block_resubmit);
    }

    #[test]
    fn test_success_clear_delay() {
        let form = FormConfig::default();
        assert_eq!(form.success_clear_delay(), Duration::from_millis(3000));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_clear_delay() {
        let mut config = Config::default();
        config.form.success_clear_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("success_clear_ms"));
    }

    #[test]
    fn test_validate_zero_list_limit() {
        let mut config = Config::default();
        config.storage.list_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("list_limit"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("alunos.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("alunos"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("alunos_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[form]\nsuccess_clear_ms = 1500\nblock_resubmit = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.form.success_clear_ms, 1500);
        assert!(!config.form.block_resubmit);
        assert_eq!(config.storage, StorageConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_reads_storage_table() {
        let path = std::env::temp_dir().join(format!(
            "alunos_config_storage_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\ndatabase_path = \"/tmp/alunos-test.db\"\nlist_limit = 5\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.list_limit, 5);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/alunos-test.db"));
        assert_eq!(config.form, FormConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_toml_values() {
        let path = std::env::temp_dir().join(format!(
            "alunos_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[form]\nsuccess_clear_ms = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_form_config_deserialize_partial() {
        let json = r#"{"block_resubmit": false}"#;
        let form: FormConfig = serde_json::from_str(json).unwrap();
        assert!(!form.block_resubmit);
        assert_eq!(form.success_clear_ms, 3000);
    }
}
