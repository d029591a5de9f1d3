//! KeyValueStore-backed HistoryRepository implementation.

use async_trait::async_trait;
use compass_core::error::{CompassError, Result};
use compass_core::history::{GrowthSnapshot, SessionRecord};
use compass_core::repository::{GROWTH_KEY, HistoryRepository, KeyValueStore, SESSIONS_KEY};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Stores each history list as one JSON array under its own key.
///
/// | Key                   | Value                          |
/// |-----------------------|--------------------------------|
/// | `compass_v2_sessions` | `[SessionRecord]`, newest first |
/// | `compass_v2_growth`   | `[GrowthSnapshot]`, oldest first |
pub struct KvHistoryRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| {
            CompassError::persistence(format!("Stored value under '{}' is malformed: {}", key, e))
        })
    }

    async fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items).map_err(|e| {
            CompassError::persistence(format!("Failed to serialize '{}': {}", key, e))
        })?;
        self.store.set(key, raw).await
    }
}

#[async_trait]
impl HistoryRepository for KvHistoryRepository {
    async fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.load_list(SESSIONS_KEY).await
    }

    async fn load_growth(&self) -> Result<Vec<GrowthSnapshot>> {
        self.load_list(GROWTH_KEY).await
    }

    async fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<()> {
        tracing::debug!("Saving {} session record(s)", sessions.len());
        self.save_list(SESSIONS_KEY, sessions).await
    }

    async fn save_growth(&self, growth: &[GrowthSnapshot]) -> Result<()> {
        tracing::debug!("Saving {} growth snapshot(s)", growth.len());
        self.save_list(GROWTH_KEY, growth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_kv_store::FileKeyValueStore;
    use crate::memory_kv_store::MemoryKeyValueStore;
    use compass_core::insight::Scores;
    use tempfile::TempDir;

    fn snapshot(date: &str, value: u8) -> GrowthSnapshot {
        GrowthSnapshot {
            date: date.to_string(),
            scores: Scores {
                self_awareness: value,
                clarity: value,
                motivation: value,
                action_ready: value,
            },
        }
    }

    #[tokio::test]
    async fn test_absent_keys_load_as_empty() {
        let repo = KvHistoryRepository::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(repo.load_sessions().await.unwrap().is_empty());
        assert!(repo.load_growth().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_growth_persists_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(temp_dir.path()));
        let repo = KvHistoryRepository::new(store.clone());

        let growth = vec![snapshot("2026-01-01", 20), snapshot("2026-02-01", 45)];
        repo.save_growth(&growth).await.unwrap();

        let reopened = KvHistoryRepository::new(Arc::new(FileKeyValueStore::new(temp_dir.path())));
        assert_eq!(reopened.load_growth().await.unwrap(), growth);

        let raw = store.get(GROWTH_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"selfAwareness\":20"));
        assert!(raw.contains("\"actionReady\":45"));
    }

    #[tokio::test]
    async fn test_sessions_accept_legacy_turns_field() {
        let legacy = r#"[{
            "id": "s1",
            "date": "2026-03-01",
            "turns": 9,
            "insights": {"keywords": ["family"], "coreValue": "care", "scores": {"clarity": 50}},
            "report": {
                "personalityType": "Builder",
                "summary": "s",
                "vision": "v",
                "roadmap": [],
                "top5": [],
                "message": "m"
            }
        }]"#;
        let store = MemoryKeyValueStore::with_entries([(SESSIONS_KEY, legacy)]);
        let repo = KvHistoryRepository::new(Arc::new(store));

        let sessions = repo.load_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].turn_count, 9);
        assert_eq!(sessions[0].insights.core_value, "care");
        assert_eq!(sessions[0].insights.scores.clarity, 50);
        assert!(sessions[0].messages.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_value_is_persistence_error() {
        let store = MemoryKeyValueStore::with_entries([(GROWTH_KEY, "{not json")]);
        let repo = KvHistoryRepository::new(Arc::new(store));

        let err = repo.load_growth().await.unwrap_err();
        assert!(err.is_persistence());
    }
}
