//! Statically declared destinations and their authorization requirement
//!
//! Routes nest the way the host router nests them: a layout route can carry
//! `requires_auth` for all its children. A destination requires authorization
//! when any route on its path from the root does.

use thiserror::Error;

use crate::session::Destinations;

/// Errors raised when a route table is inconsistent
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    /// The login or default destination is not declared
    #[error("Destination not declared: {0}")]
    MissingDestination(String),

    /// Two routes share a name
    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    /// The login destination sits behind an authorization requirement
    #[error("Login destination {0} must not require authorization")]
    GuardedLogin(String),
}

/// A declared destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Unnamed routes are layouts that only group children
    pub name: Option<String>,
    pub path: String,
    pub requires_auth: bool,
    pub children: Vec<Route>,
}

impl Route {
    /// A named destination
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: path.into(),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    /// An unnamed layout route
    pub fn layout(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    /// Marks the route (and everything below it) as requiring authorization
    pub fn requiring_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// What a lookup found for a destination name
#[derive(Debug, Clone, PartialEq, Eq)]
struct Match {
    requires_auth: bool,
    path: String,
}

fn join_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    let parent = parent.trim_end_matches('/');
    if child.is_empty() {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    } else {
        format!("{}/{}", parent, child)
    }
}

fn find(routes: &[Route], name: &str, parent_path: &str, inherited: bool) -> Option<Match> {
    for route in routes {
        let path = join_path(parent_path, &route.path);
        let requires_auth = inherited || route.requires_auth;
        if route.name.as_deref() == Some(name) {
            return Some(Match {
                requires_auth,
                path,
            });
        }
        if let Some(found) = find(&route.children, name, &path, requires_auth) {
            return Some(found);
        }
    }
    None
}

fn collect_names<'a>(routes: &'a [Route], names: &mut Vec<&'a str>) {
    for route in routes {
        if let Some(name) = route.name.as_deref() {
            names.push(name);
        }
        collect_names(&route.children, names);
    }
}

/// The full set of destinations known to the host
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
    destinations: Destinations,
}

impl RouteTable {
    /// Builds a table, checking the login and default destinations exist
    pub fn new(routes: Vec<Route>, destinations: Destinations) -> Result<Self, RouteError> {
        let mut names = Vec::new();
        collect_names(&routes, &mut names);
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(RouteError::DuplicateName(name.to_string()));
            }
        }

        for required in [&destinations.login, &destinations.default_authenticated] {
            if !names.contains(&required.as_str()) {
                return Err(RouteError::MissingDestination(required.clone()));
            }
        }

        let table = Self {
            routes,
            destinations,
        };
        if table.requires_auth(&table.destinations.login) {
            return Err(RouteError::GuardedLogin(table.destinations.login.clone()));
        }
        Ok(table)
    }

    /// Multi-view deployment: every view lives under an authenticated layout
    pub fn layout() -> Self {
        Self {
            routes: vec![
                Route::new("login", "/login"),
                Route::layout("/").requiring_auth().with_children(vec![
                    Route::new("home", ""),
                    Route::new("keyValue", "key-value"),
                    Route::new("Prompt", "prompt"),
                    Route::new("Strategy", "strategy"),
                    Route::new("other", "other"),
                ]),
            ],
            destinations: Destinations::default(),
        }
    }

    /// Single-view deployment: login plus the key-value view
    pub fn key_value_only() -> Self {
        Self {
            routes: vec![
                Route::new("login", "/login"),
                Route::new("keyValue", "/key-value").requiring_auth(),
            ],
            destinations: Destinations::default(),
        }
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    /// True if the destination or any enclosing route requires authorization
    ///
    /// Unknown names match nothing and carry no requirement.
    pub fn requires_auth(&self, name: &str) -> bool {
        find(&self.routes, name, "", false).map_or(false, |m| m.requires_auth)
    }

    pub fn contains(&self, name: &str) -> bool {
        find(&self.routes, name, "", false).is_some()
    }

    /// Full path of a named destination
    pub fn path_of(&self, name: &str) -> Option<String> {
        find(&self.routes, name, "", false).map(|m| m.path)
    }

    /// All destination names, in declaration order
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names(&self.routes, &mut names);
        names
    }
}
