//! Session module - Credential, identity and the operations that change them
//!
//! The store depends on two injected seams instead of concrete neighbours:
//! - [`IdentityProvider`]: the server calls (token exchange, current user)
//! - [`Navigator`]: the host's "go to destination" hook

mod base;
mod store;

pub use base::*;
pub use store::SessionStore;
