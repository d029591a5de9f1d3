//! Config file storage (`config.toml`).

use compass_core::config::CompassConfig;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for ConfigStorageError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigStorageError::TomlSerError(e)
    }
}

/// Reads and writes [`CompassConfig`] as TOML.
///
/// Does NOT:
/// - Read secrets (see `SecretStorage`)
/// - Validate values beyond their types
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(config))`: File parsed; missing keys take their defaults
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<CompassConfig>, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the config file, falling back to defaults when it is absent.
    pub fn load_or_default(&self) -> Result<CompassConfig, ConfigStorageError> {
        Ok(self.load()?.unwrap_or_default())
    }

    pub fn save(&self, config: &CompassConfig) -> Result<(), ConfigStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(config)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));
        assert!(storage.load().unwrap().is_none());
        assert_eq!(storage.load_or_default().unwrap(), CompassConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "model = \"claude-test\"\nreport_max_tokens = 4000\n").unwrap();

        let config = ConfigStorage::new(path).load_or_default().unwrap();
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.report_max_tokens, 4000);
        assert_eq!(config.reply_max_tokens, 600);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("nested").join("config.toml"));
        let config = CompassConfig {
            request_timeout_secs: 30,
            data_dir: Some(temp_dir.path().join("data")),
            ..CompassConfig::default()
        };

        storage.save(&config).unwrap();
        assert_eq!(storage.load().unwrap(), Some(config));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "model = [").unwrap();
        assert!(matches!(
            ConfigStorage::new(path).load(),
            Err(ConfigStorageError::TomlParseError(_))
        ));
    }
}
