//! Claude credentials from `~/.config/compass/secret.json`.

use crate::paths::CompassPaths;
use compass_core::config::{ClaudeConfig, SecretConfig};
use compass_core::error::{CompassError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read-only access to `secret.json`.
///
/// An absent file is not an error: credentials may come from the
/// environment instead. A file that exists but cannot be read or parsed is a
/// `Config` error.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new() -> Result<Self> {
        let path = CompassPaths::secret_file()
            .map_err(|e| CompassError::config(format!("Cannot locate secret.json: {}", e)))?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the whole file. `None` when it does not exist.
    pub fn load(&self) -> Result<Option<SecretConfig>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CompassError::config(format!(
                    "Cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        warn_if_shared(&self.path);

        serde_json::from_str(&content).map(Some).map_err(|e| {
            CompassError::config(format!("Malformed {}: {}", self.path.display(), e))
        })
    }

    /// The `claude` section, if it carries a non-blank API key.
    pub fn claude_credentials(&self) -> Result<Option<ClaudeConfig>> {
        let claude = self.load()?.and_then(|secret| secret.claude);
        Ok(claude
            .filter(|claude| !claude.api_key.trim().is_empty())
            .map(|claude| ClaudeConfig {
                api_key: claude.api_key.trim().to_string(),
                model_name: claude.model_name.filter(|model| !model.trim().is_empty()),
            }))
    }
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} is readable by other users (mode {:o}); consider chmod 600",
                path.display(),
                mode & 0o777
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}
