use async_trait::async_trait;
use compass_core::error::Result;
use compass_core::repository::KeyValueStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory KeyValueStore. Nothing survives the process.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryKeyValueStore::with_entries([("k", "old")]);
        store.set("k", "new".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.get("other").await.unwrap(), None);
    }
}
