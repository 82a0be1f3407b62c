//! Authentication storage module - Durable home of the session token
//!
//! Provides the single key-value slot the session survives restarts in:
//! - OS credential manager (via keyring crate)
//! - JSON file in the config directory
//! - In-memory store for tests and ephemeral sessions

mod file_store;
mod secure_store;
mod storage;

pub use file_store::FileStore;
pub use secure_store::{KeyringStore, DEFAULT_SERVICE};
pub use storage::{MemoryStore, StorageError, TokenStorage, TOKEN_KEY, USER_TYPE_KEY};

#[cfg(test)]
pub use storage::MockTokenStorage;
