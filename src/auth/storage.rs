//! Durable token slot abstraction
//!
//! The session survives restarts through a tiny key-value slot: the bearer token
//! under [`TOKEN_KEY`] and an opaque user type under [`USER_TYPE_KEY`]. Backends
//! are synchronous so a write has landed before `login`/`logout` return.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the user type reported by `/auth/token`
pub const USER_TYPE_KEY: &str = "user_type";

/// Errors that can occur during durable storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keyring operation failed
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// A durable key-value slot for session data
#[cfg_attr(test, mockall::automock)]
pub trait TokenStorage: Send + Sync {
    /// Returns the stored value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value
    ///
    /// `Ok(true)` if deleted, `Ok(false)` if it was not there
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

/// In-process storage that forgets everything on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a token, as if left by a previous run
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .lock()
            .insert(TOKEN_KEY.to_string(), token.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.lock().remove(key).is_some())
    }
}
