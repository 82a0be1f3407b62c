//! Key-value resource of the Key-Value System
//!
//! Thin typed wrappers over `/key-values`; every call carries the session
//! credential and a 401 ends the session like any other request.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::session::AuthError;

/// A stored key-value pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    /// Key of the parent entry when entries form a tree
    #[serde(rename = "parentKey", default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            parent_key: None,
        }
    }

    pub fn with_parent(mut self, parent_key: impl Into<String>) -> Self {
        self.parent_key = Some(parent_key.into());
        self
    }
}

/// Filter for listing keys
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(rename = "parentKey", skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
}

impl Default for KeyQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 10,
            prefix: None,
            parent_key: None,
        }
    }
}

impl KeyQuery {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_parent(mut self, parent_key: impl Into<String>) -> Self {
        self.parent_key = Some(parent_key.into());
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct Page {
    skip: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct KeyListItem {
    key: String,
}

/// Client for `/key-values`
pub struct KeyValueApi<'a> {
    api: &'a ApiClient,
}

impl<'a> KeyValueApi<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Creates a new pair; the server refuses duplicates with HTTP 400
    pub async fn create(&self, entry: &KeyValue) -> Result<KeyValue, AuthError> {
        self.api.post_json("/key-values", entry).await
    }

    /// Reads one pair by key
    pub async fn get(&self, key: &str) -> Result<KeyValue, AuthError> {
        self.api
            .send_json(Method::GET, "/key-values", Some(&KeyRef { key }))
            .await
    }

    /// Replaces the value of an existing pair
    pub async fn update(&self, entry: &KeyValue) -> Result<KeyValue, AuthError> {
        self.api
            .send_json(Method::PUT, "/key-values", Some(entry))
            .await
    }

    /// Deletes a pair
    pub async fn delete(&self, key: &str) -> Result<(), AuthError> {
        self.api
            .send_empty(Method::DELETE, "/key-values", Some(&KeyRef { key }))
            .await
    }

    /// Lists full pairs page by page
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<KeyValue>, AuthError> {
        self.api
            .post_json("/key-values/list", &Page { skip, limit })
            .await
    }

    /// Lists keys only, optionally filtered by prefix
    pub async fn keys(&self, query: &KeyQuery) -> Result<Vec<String>, AuthError> {
        let items: Vec<KeyListItem> = self.api.post_json("/key-values/keys", query).await?;
        Ok(items.into_iter().map(|item| item.key).collect())
    }
}

impl ApiClient {
    /// Returns the key-value resource client
    pub fn key_values(&self) -> KeyValueApi<'_> {
        KeyValueApi::new(self)
    }
}
