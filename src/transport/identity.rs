//! Identity and account endpoints of the Key-Value System
//!
//! `POST /auth/token`, `GET /users/me` and the account maintenance calls, all
//! sent through the interceptor.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::client::ApiClient;
use crate::session::{AuthError, IdentityProvider, TokenGrant, UserProfile};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[async_trait]
impl IdentityProvider for ApiClient {
    async fn exchange_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenGrant, AuthError> {
        self.post_json("/auth/token", &Credentials { username, password })
            .await
    }

    async fn current_user(&self) -> Result<UserProfile, AuthError> {
        self.get_json("/users/me").await
    }
}

impl ApiClient {
    /// Creates an account (`POST /users`); no session required
    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.post_json("/users", &Credentials { username, password })
            .await
    }

    /// Changes the password of the logged-in account (`PUT /users/me`)
    pub async fn change_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        self.send_json(
            Method::PUT,
            "/users/me",
            Some(&Credentials { username, password }),
        )
        .await
    }

    /// Deletes the logged-in account (`DELETE /users/me`)
    ///
    /// The session is left as is; callers normally follow with a logout.
    pub async fn delete_account(&self) -> Result<(), AuthError> {
        self.send_empty::<()>(Method::DELETE, "/users/me", None)
            .await
    }
}
