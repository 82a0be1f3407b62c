//! Prompt resource of the Key-Value System

use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::session::AuthError;

/// A stored prompt template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    pub key: String,
    pub value: String,
    /// Server timestamps, UTC without offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Prompt {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Filter for listing prompts or their keys
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Default for PromptQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 10,
            prefix: None,
        }
    }
}

impl PromptQuery {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Deserialize)]
struct KeyListItem {
    key: String,
}

/// Client for `/prompts`
pub struct PromptApi<'a> {
    api: &'a ApiClient,
}

impl<'a> PromptApi<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Creates a prompt; the server refuses an existing key with HTTP 400
    pub async fn create(&self, key: &str, value: &str) -> Result<Prompt, AuthError> {
        self.api
            .post_json("/prompts", &PromptBody { key, value })
            .await
    }

    /// Reads one prompt; the key travels in the query string
    pub async fn get(&self, key: &str) -> Result<Prompt, AuthError> {
        self.api.get_query("/prompts", &KeyRef { key }).await
    }

    /// Replaces the text of an existing prompt
    pub async fn update(&self, key: &str, value: &str) -> Result<Prompt, AuthError> {
        self.api
            .send_json(Method::PUT, "/prompts", Some(&PromptBody { key, value }))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), AuthError> {
        self.api
            .send_empty(Method::DELETE, "/prompts", Some(&KeyRef { key }))
            .await
    }

    /// Lists full prompts, optionally filtered by key prefix
    pub async fn list(&self, query: &PromptQuery) -> Result<Vec<Prompt>, AuthError> {
        self.api.post_json("/prompts/list", query).await
    }

    /// Lists prompt keys only
    pub async fn keys(&self, query: &PromptQuery) -> Result<Vec<String>, AuthError> {
        let items: Vec<KeyListItem> = self.api.post_json("/prompts/keys", query).await?;
        Ok(items.into_iter().map(|item| item.key).collect())
    }
}

impl ApiClient {
    /// Returns the prompt resource client
    pub fn prompts(&self) -> PromptApi<'_> {
        PromptApi::new(self)
    }
}
