//! Wiring of the session store, the intercepted client and the guard

use reqwest::Client;
use std::sync::Arc;

use crate::auth::TokenStorage;
use crate::config::GateConfig;
use crate::router::{Decision, NavigationGuard, RouteTable};
use crate::session::{AuthError, Navigator, SessionStore, UserProfile};
use crate::transport::ApiClient;

/// The session gate as a host application holds it
pub struct AuthGate {
    /// Owner of the credential and identity
    pub session: Arc<SessionStore>,
    /// Intercepted client for every API call
    pub api: Arc<ApiClient>,
    /// Per-navigation decision procedure
    pub guard: NavigationGuard,
}

impl AuthGate {
    /// Builds the gate from configuration, opening the configured storage
    pub fn new(config: &GateConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_storage(config, config.open_storage(), navigator)
    }

    /// Builds the gate from configuration with an explicit storage backend
    pub fn with_storage(
        config: &GateConfig,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                Client::new()
            });
        Self::from_parts(
            &config.base_url(),
            client,
            config.route_table(),
            storage,
            navigator,
        )
    }

    /// Builds the gate from its individual parts
    pub fn from_parts(
        base_url: &str,
        client: Client,
        routes: RouteTable,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionStore::restore(
            storage,
            navigator,
            routes.destinations().clone(),
        ));
        let api = Arc::new(ApiClient::with_client(client, base_url, session.clone()));
        let guard = NavigationGuard::new(session.clone(), api.clone(), Arc::new(routes));

        tracing::debug!("Session gate ready for {}", api.base_url());
        Self {
            session,
            api,
            guard,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.session
            .login(self.api.as_ref(), username, password)
            .await
    }

    pub async fn fetch_identity(&self) -> Result<UserProfile, AuthError> {
        self.session.fetch_identity(self.api.as_ref()).await
    }

    pub async fn logout(&self) {
        self.session.logout().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// Asks the guard about a navigation
    pub async fn navigate(&self, to: &str, from: Option<&str>) -> Decision {
        self.guard.evaluate(to, from).await
    }
}
