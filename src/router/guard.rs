//! Navigation guard - per-navigation authorization decision
//!
//! The host calls [`NavigationGuard::evaluate`] before each transition and
//! applies the returned [`Decision`]. Nothing is remembered between calls;
//! every evaluation starts from the session store's current state.

use std::sync::Arc;

use super::routes::RouteTable;
use crate::session::{IdentityProvider, SessionStore};

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the requested destination
    Allow,
    /// Go to the named destination instead
    Redirect(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns the redirect target, if any
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Redirect(name) => Some(name),
            Decision::Allow => None,
        }
    }
}

/// Decides whether a navigation may proceed
pub struct NavigationGuard {
    session: Arc<SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    routes: Arc<RouteTable>,
}

impl NavigationGuard {
    pub fn new(
        session: Arc<SessionStore>,
        identity: Arc<dyn IdentityProvider>,
        routes: Arc<RouteTable>,
    ) -> Self {
        Self {
            session,
            identity,
            routes,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Evaluates a navigation from `from` to `to`
    ///
    /// Guarded destinations need a session; the identity is fetched on the
    /// first guarded navigation of a session, and a failed fetch ends the
    /// session. A logged-in user asking for the login destination is sent to
    /// the default destination instead.
    pub async fn evaluate(&self, to: &str, from: Option<&str>) -> Decision {
        let destinations = self.session.destinations();
        let authenticated = self.session.is_authenticated().await;

        let decision = if self.routes.requires_auth(to) {
            if !authenticated {
                Decision::Redirect(destinations.login.clone())
            } else if self.session.has_identity().await {
                Decision::Allow
            } else {
                match self.session.fetch_identity(self.identity.as_ref()).await {
                    Ok(_) => Decision::Allow,
                    Err(e) => {
                        tracing::warn!("Identity unresolved for {}: {}", to, e);
                        self.session.logout().await;
                        Decision::Redirect(destinations.login.clone())
                    }
                }
            }
        } else if authenticated && to == destinations.login {
            Decision::Redirect(destinations.default_authenticated.clone())
        } else {
            Decision::Allow
        };

        tracing::debug!(
            "Navigation {} -> {}: {:?}",
            from.unwrap_or("<start>"),
            to,
            decision
        );
        decision
    }
}
