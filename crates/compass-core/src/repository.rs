//! Repository interfaces.
//!
//! These traits decouple the session logic from the storage mechanism
//! (JSON files, in-memory maps, a remote store).

use crate::error::Result;
use crate::history::{GrowthSnapshot, SessionRecord};
use async_trait::async_trait;

/// Logical key of the persisted session list.
pub const SESSIONS_KEY: &str = "compass_v2_sessions";
/// Logical key of the persisted growth list.
pub const GROWTH_KEY: &str = "compass_v2_growth";

/// Opaque string key-value store.
///
/// # Returns
///
/// - `get`: `Ok(None)` when the key has never been written
/// - `set`: `Ok(())` once the value is durable
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Storage of the two capped history lists.
///
/// Implementations never apply caps themselves; callers hand over lists that
/// are already capped.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Session records, newest first. Empty when nothing was saved yet.
    async fn load_sessions(&self) -> Result<Vec<SessionRecord>>;

    /// Growth snapshots, oldest first. Empty when nothing was saved yet.
    async fn load_growth(&self) -> Result<Vec<GrowthSnapshot>>;

    async fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<()>;

    async fn save_growth(&self, growth: &[GrowthSnapshot]) -> Result<()>;
}
