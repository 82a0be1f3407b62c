//! Router module - Route requirements and the navigation guard
//!
//! The host router stays a black box: it asks the guard about each
//! transition by destination name and applies the returned decision.

mod guard;
mod routes;

pub use guard::{Decision, NavigationGuard};
pub use routes::{Route, RouteError, RouteTable};
