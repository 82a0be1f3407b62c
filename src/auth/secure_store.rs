//! Token storage in the operating system credential manager
//!
//! Uses Windows Credential Manager, macOS Keychain or the Linux Secret Service
//! through the keyring crate.

use keyring::Entry;

use super::storage::{StorageError, TokenStorage};

/// Default keyring service name
pub const DEFAULT_SERVICE: &str = "KVGate";

/// Durable storage backed by the OS keyring
///
/// Each storage key becomes one keyring entry under the store's service name.
///
/// # Example
///
/// ```no_run
/// use kvgate::auth::{KeyringStore, TokenStorage, TOKEN_KEY};
///
/// let store = KeyringStore::new();
/// store.set(TOKEN_KEY, "tok-123").unwrap();
/// assert_eq!(store.get(TOKEN_KEY).unwrap(), Some("tok-123".to_string()));
/// store.remove(TOKEN_KEY).unwrap();
/// ```
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Creates a new KeyringStore with the default service name
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Creates a new KeyringStore with a custom service name
    ///
    /// Useful for separating deployments that share a machine.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Returns the service name used for this store
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorage for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::Keyring(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(StorageError::Keyring(e)),
        }
    }
}
