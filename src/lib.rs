//! KVGate - Session and authorization gate for Key-Value System clients
//!
//! Decides, on every navigation and every outbound request, whether the
//! caller holds a valid session, lazily resolves who the user is, and reacts
//! when the server invalidates the session.
//!
//! ## Architecture
//!
//! - **Session**: the store owning the credential and identity, with `login`,
//!   `fetch_identity` and `logout`
//! - **Transport**: reqwest client whose request hook attaches the bearer
//!   token and whose response hook logs out on HTTP 401
//! - **Router**: route requirements and the navigation guard returning
//!   `Allow` or `Redirect`
//! - **Auth**: durable token slot (keyring, JSON file, memory)
//! - **Security**: zeroizing credential type and log sanitization

pub mod auth;
pub mod config;
mod gate;
pub mod router;
pub mod security;
pub mod session;
pub mod transport;

pub use config::GateConfig;
pub use gate::AuthGate;
pub use router::{Decision, NavigationGuard, Route, RouteTable};
pub use session::{AuthError, Destinations, Navigator, SessionStore, UserProfile};
pub use transport::ApiClient;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, honouring `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvgate=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
