//! Directory-backed KeyValueStore implementation.

use crate::paths::CompassPaths;
use crate::storage::AtomicFile;
use async_trait::async_trait;
use compass_core::error::{CompassError, Result};
use compass_core::repository::KeyValueStore;
use std::path::{Path, PathBuf};

/// Key-value store keeping one JSON file per key.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── compass_v2_sessions.json
/// └── compass_v2_growth.json
/// ```
///
/// Each write replaces the whole file through [`AtomicFile`], so a reader
/// never observes a half-written value.
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates a store at the default location (e.g. `~/.local/share/compass/store`).
    pub fn default_location() -> Result<Self> {
        let base_dir = CompassPaths::store_dir()
            .map_err(|e| CompassError::persistence(format!("Failed to get store directory: {}", e)))?;
        Ok(Self::new(base_dir))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        validate_key(key)?;
        Ok(AtomicFile::new(self.base_dir.join(format!("{}.json", key))))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CompassError::persistence(format!("Invalid storage key: {:?}", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        tracing::debug!("FileKeyValueStore: reading {}", file.path().display());

        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| CompassError::persistence(format!("Storage task failed: {}", e)))?
            .map_err(|e| CompassError::persistence(format!("Failed to read '{}': {}", key, e)))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file = self.file_for(key)?;
        tracing::debug!(
            "FileKeyValueStore: writing {} ({} bytes)",
            file.path().display(),
            value.len()
        );

        tokio::task::spawn_blocking(move || file.save(&value))
            .await
            .map_err(|e| CompassError::persistence(format!("Storage task failed: {}", e)))?
            .map_err(|e| CompassError::persistence(format!("Failed to write '{}': {}", key, e)))
    }
}
