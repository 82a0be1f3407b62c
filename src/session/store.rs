//! Session store - the single owner of the credential and resolved identity
//!
//! All mutation goes through [`SessionStore::login`],
//! [`SessionStore::fetch_identity`] and [`SessionStore::logout`]. The token is
//! mirrored into durable storage; the identity lives in memory only and is
//! fetched again after every restart.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::base::{AuthError, Destinations, IdentityProvider, Navigator, UserProfile};
use crate::auth::{TokenStorage, TOKEN_KEY, USER_TYPE_KEY};
use crate::security::{Credential, Sanitizer};

/// In-memory session state
///
/// Both fields sit behind one lock so clearing the token clears the identity
/// in the same step.
#[derive(Debug, Default)]
struct Session {
    token: Option<Credential>,
    identity: Option<UserProfile>,
}

/// Owner of the session
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
    destinations: Destinations,
}

impl SessionStore {
    /// Creates a store, picking up a token left in storage by a previous run
    ///
    /// A storage read failure is logged and treated as "no token".
    pub fn restore(
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
        destinations: Destinations,
    ) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                tracing::info!(
                    "Restored session token ({})",
                    Sanitizer::sanitize_token(&token)
                );
                Some(Credential::new(token))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored session token: {}", e);
                None
            }
        };

        Self {
            state: RwLock::new(Session {
                token,
                identity: None,
            }),
            storage,
            navigator,
            destinations,
        }
    }

    /// Returns the destinations this store navigates to
    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    /// True iff a credential is present
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    /// True iff the identity has been fetched for the current credential
    pub async fn has_identity(&self) -> bool {
        self.state.read().await.identity.is_some()
    }

    /// Returns the resolved identity, if any
    pub async fn identity(&self) -> Option<UserProfile> {
        self.state.read().await.identity.clone()
    }

    /// Returns the current credential, if any
    pub async fn credential(&self) -> Option<Credential> {
        self.state.read().await.token.clone()
    }

    /// Returns the user type written at the last login
    pub fn user_type(&self) -> Option<String> {
        self.storage.get(USER_TYPE_KEY).unwrap_or_else(|e| {
            tracing::warn!("Failed to read stored user type: {}", e);
            None
        })
    }

    /// Logs in with a username and password
    ///
    /// On success the token is persisted, the identity is fetched and the host
    /// is sent to the default authenticated destination. A failed identity
    /// fetch is returned as an error but leaves the new token in place.
    pub async fn login(
        &self,
        provider: &dyn IdentityProvider,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        Sanitizer::validate_username(username)?;

        let grant = provider.exchange_token(username, password).await.map_err(|e| {
            tracing::error!("Login failed for {}: {}", username, e);
            e
        })?;

        if grant.access_token.is_empty() {
            tracing::error!("Login for {} returned an empty access token", username);
            return Err(AuthError::Unknown {
                status: 200,
                message: "empty access token".to_string(),
            });
        }

        let credential = Credential::new(grant.access_token);
        self.storage.set(TOKEN_KEY, credential.as_str())?;
        if let Some(user_type) = grant.user_type.as_deref() {
            if let Err(e) = self.storage.set(USER_TYPE_KEY, user_type) {
                tracing::warn!("Failed to store user type: {}", e);
            }
        }

        {
            let mut state = self.state.write().await;
            state.token = Some(credential);
            state.identity = None;
        }
        tracing::info!("Logged in as {}", username);

        self.fetch_identity(provider).await?;

        self.navigator
            .navigate(&self.destinations.default_authenticated);
        Ok(())
    }

    /// Fetches and stores the identity for the current credential
    ///
    /// Fails with `Rejected` without a network call when there is no
    /// credential. A failure never clears the credential here; invalidation
    /// is the interceptor's job.
    ///
    /// The profile is stored only if the credential is still the one that was
    /// current when the request started. A response that lands after a logout,
    /// or after a logout and a fresh login, is returned but not kept.
    pub async fn fetch_identity(
        &self,
        provider: &dyn IdentityProvider,
    ) -> Result<UserProfile, AuthError> {
        let Some(sent_with) = self.credential().await else {
            return Err(AuthError::Rejected("no active session".to_string()));
        };

        let profile = provider.current_user().await.map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            e
        })?;

        let mut state = self.state.write().await;
        if state.token.as_ref() == Some(&sent_with) {
            state.identity = Some(profile.clone());
            tracing::debug!(
                "Resolved identity {}",
                profile.display_name().unwrap_or("<unnamed>")
            );
        } else {
            tracing::debug!("Discarding identity fetched for a session that has since ended");
        }
        Ok(profile)
    }

    /// Ends the session and sends the host to the login destination
    ///
    /// Safe to call without an active session.
    pub async fn logout(&self) {
        let had_session = {
            let mut state = self.state.write().await;
            let had_session = state.token.is_some();
            state.token = None;
            state.identity = None;
            had_session
        };

        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("Failed to remove stored session token: {}", e);
        }

        if had_session {
            tracing::info!("Logged out");
        }
        self.navigator.navigate(&self.destinations.login);
    }
}
