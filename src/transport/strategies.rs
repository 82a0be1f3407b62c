//! Strategy resource of the Key-Value System
//!
//! Strategies are key-value entries with a run status and an optional link to
//! the conversation that executes them. The server stamps the creating user
//! and starts every new strategy as [`StrategyStatus::NotStarted`].

use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::session::AuthError;

/// Run status, carried on the wire as a numeric string
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StrategyStatus {
    #[serde(rename = "0")]
    NotStarted,
    #[serde(rename = "1")]
    Running,
    #[serde(rename = "2")]
    Finished,
    #[serde(rename = "3")]
    Failed,
}

impl StrategyStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, StrategyStatus::Finished | StrategyStatus::Failed)
    }
}

/// A stored strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Strategy {
    pub key: String,
    pub value: String,
    pub status: StrategyStatus,
    /// Username of the creator
    #[serde(default)]
    pub user: Option<String>,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Partial update; absent fields are left as they are on the server
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StrategyUpdate {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StrategyStatus>,
    #[serde(rename = "conversationId", skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl StrategyUpdate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_status(mut self, status: StrategyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

/// Filter for listing strategies or their summaries
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategyQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StrategyStatus>,
    #[serde(rename = "conversationId", skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl Default for StrategyQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 10,
            prefix: None,
            status: None,
            conversation_id: None,
        }
    }
}

impl StrategyQuery {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_status(mut self, status: StrategyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}

/// Key, status and conversation of a strategy, as returned by the keys listing
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StrategySummary {
    pub key: String,
    pub status: StrategyStatus,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewStrategy<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

/// Client for `/strategies`
pub struct StrategyApi<'a> {
    api: &'a ApiClient,
}

impl<'a> StrategyApi<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Creates a strategy; the server refuses an existing key with HTTP 400
    pub async fn create(&self, key: &str, value: &str) -> Result<Strategy, AuthError> {
        self.api
            .post_json("/strategies", &NewStrategy { key, value })
            .await
    }

    /// Reads one strategy; the key travels in the query string
    pub async fn get(&self, key: &str) -> Result<Strategy, AuthError> {
        self.api.get_query("/strategies", &KeyRef { key }).await
    }

    pub async fn update(&self, update: &StrategyUpdate) -> Result<Strategy, AuthError> {
        self.api
            .send_json(Method::PUT, "/strategies", Some(update))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), AuthError> {
        self.api
            .send_empty(Method::DELETE, "/strategies", Some(&KeyRef { key }))
            .await
    }

    /// Lists full strategies matching the filter
    pub async fn list(&self, query: &StrategyQuery) -> Result<Vec<Strategy>, AuthError> {
        self.api.post_json("/strategies/list", query).await
    }

    /// Lists key, status and conversation of matching strategies
    pub async fn keys(&self, query: &StrategyQuery) -> Result<Vec<StrategySummary>, AuthError> {
        self.api.post_json("/strategies/keys", query).await
    }
}

impl ApiClient {
    /// Returns the strategy resource client
    pub fn strategies(&self) -> StrategyApi<'_> {
        StrategyApi::new(self)
    }
}
