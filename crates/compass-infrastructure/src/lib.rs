pub mod file_kv_store;
pub mod history_repository;
pub mod memory_kv_store;
pub mod paths;
pub mod storage;

pub use crate::file_kv_store::FileKeyValueStore;
pub use crate::history_repository::KvHistoryRepository;
pub use crate::memory_kv_store::MemoryKeyValueStore;
pub use crate::paths::CompassPaths;
