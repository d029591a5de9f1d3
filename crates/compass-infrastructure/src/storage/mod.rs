//! Storage layer for atomic file operations and configuration files.

mod atomic_file;
mod config_storage;
mod secret_storage;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use config_storage::{ConfigStorage, ConfigStorageError};
pub use secret_storage::SecretStorage;
