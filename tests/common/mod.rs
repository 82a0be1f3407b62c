#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use kvgate::auth::{MemoryStore, TokenStorage};
use kvgate::session::Navigator;
use kvgate::{AuthGate, RouteTable};
use wiremock::MockServer;

/// Navigator that remembers every destination it was asked for
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        self.visited.lock().unwrap().push(destination.to_string());
    }
}

pub struct TestGate {
    pub gate: AuthGate,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: Arc<MemoryStore>,
}

/// Builds a gate against a mock server with the layout route preset
pub fn gate_for(server: &MockServer, stored_token: Option<&str>) -> TestGate {
    let storage = Arc::new(match stored_token {
        Some(token) => MemoryStore::with_token(token),
        None => MemoryStore::new(),
    });
    let navigator = Arc::new(RecordingNavigator::default());
    let gate = AuthGate::from_parts(
        &server.uri(),
        reqwest::Client::new(),
        RouteTable::layout(),
        storage.clone(),
        navigator.clone(),
    );
    TestGate {
        gate,
        navigator,
        storage,
    }
}

pub fn stored_token(storage: &MemoryStore) -> Option<String> {
    storage.get(kvgate::auth::TOKEN_KEY).unwrap()
}
