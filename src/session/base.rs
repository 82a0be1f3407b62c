//! Base types and traits for the session layer
//!
//! Defines the identity record, the login grant, the error kinds surfaced by
//! session operations, and the two seams the store is injected with: the
//! identity provider that talks to the server and the navigator that moves the
//! host between destinations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::StorageError;
use crate::security::SanitizerError;

/// Server-asserted identity of the logged-in user
///
/// `username` and `type` are what the Key-Value System returns; anything else
/// the server sends is kept in `attributes` untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account type (e.g. "admin", "user")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserProfile {
    /// Creates a profile for the given username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Sets the account type
    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    /// Adds an extra attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns an extra attribute by name
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Best display name: `username`, else a string `name` attribute
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .or_else(|| self.attributes.get("name").and_then(Value::as_str))
    }
}

/// Response body of `POST /auth/token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Opaque value passed through to durable storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl TokenGrant {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: Some("bearer".to_string()),
            user_type: None,
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }
}

/// Errors surfaced by login, identity fetch and intercepted requests
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport unreachable or response body unreadable
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// The server refused the credentials (HTTP 401), or there was none to send
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// Any other non-2xx status
    #[error("Unexpected response (HTTP {status}): {message}")]
    Unknown { status: u16, message: String },

    /// Login input refused before reaching the server
    #[error("Invalid login input: {0}")]
    InvalidInput(#[from] SanitizerError),

    /// The token could not be persisted
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Returns true for the 401 kind, the only one that ends a session
    pub fn is_rejected(&self) -> bool {
        matches!(self, AuthError::Rejected(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected(_) => Some(401),
            AuthError::Unknown { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Names of the two destinations the session layer itself navigates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// Where unauthenticated users are sent
    pub login: String,
    /// Where a fresh login lands
    pub default_authenticated: String,
}

impl Destinations {
    pub fn new(login: impl Into<String>, default_authenticated: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            default_authenticated: default_authenticated.into(),
        }
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self::new("login", "keyValue")
    }
}

/// Server side of the session: token exchange and identity lookup
///
/// Implementations are expected to route calls through the request
/// interceptor so the current credential is attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a username and password for a bearer token
    async fn exchange_token(&self, username: &str, password: &str)
        -> Result<TokenGrant, AuthError>;

    /// Fetches the profile of the user owning the current credential
    async fn current_user(&self) -> Result<UserProfile, AuthError>;
}

/// Asks the host to move to a named destination
///
/// The session store calls this after login and logout instead of reaching
/// into the host router.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Navigator that ignores every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, destination: &str) {
        tracing::trace!("Ignoring navigation to {}", destination);
    }
}

/// Navigator backed by a closure
pub struct FnNavigator<F>(pub F);

impl<F> Navigator for FnNavigator<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, destination: &str) {
        (self.0)(destination)
    }
}
