//! HTTP client with the credential interceptor pair
//!
//! Every call goes through one private send path: the request hook attaches
//! the bearer token, the response hook turns non-2xx statuses into
//! [`AuthError`] and ends the session on a 401 before handing the error back.
//! Raw `RequestBuilder`s never leave the crate, so nothing skips the hooks.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::security::Sanitizer;
use crate::session::{AuthError, SessionStore};

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extracts a readable message from an error response body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Client for the Key-Value System API
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client with a default reqwest `Client`
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    /// Creates a client around a preconfigured reqwest `Client`
    pub fn with_client(client: Client, base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Returns the API base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session store this client reads and invalidates
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request; it is intercepted only when passed to [`send`](Self::send)
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Request hook: attaches the bearer token when a session exists
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.credential().await {
            Some(token) => request.header(AUTHORIZATION, token.bearer()),
            None => request,
        }
    }

    /// Response hook: maps failures to [`AuthError`] and ends the session on 401
    pub(crate) async fn intercept(
        &self,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, AuthError> {
        match result {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let url = Sanitizer::sanitize_url(response.url().as_str());
                let message = error_detail(&response.text().await.unwrap_or_default());

                if status == StatusCode::UNAUTHORIZED {
                    tracing::warn!("{} answered 401, ending session", url);
                    self.session.logout().await;
                    return Err(AuthError::Rejected(message));
                }

                tracing::debug!("{} answered HTTP {}: {}", url, status, message);
                Err(AuthError::Unknown {
                    status: status.as_u16(),
                    message,
                })
            }
            Err(e) => {
                tracing::debug!("Transport failure: {}", e);
                Err(AuthError::NetworkFailure(e.to_string()))
            }
        }
    }

    /// Sends a request through both hooks
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, AuthError> {
        let request = self.authorize(request).await;
        let result = request.send().await;
        self.intercept(result).await
    }

    /// Sends a request with an optional JSON body and decodes a JSON response
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request).await?;
        decode(response).await
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.send_json::<(), T>(Method::GET, path, None).await
    }

    /// GET a JSON resource selected by query-string parameters
    pub(crate) async fn get_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, AuthError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path).query(query);
        let response = self.send(request).await?;
        decode(response).await
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Some(body)).await
    }

    /// Sends a request whose response body is ignored
    pub async fn send_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), AuthError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AuthError::NetworkFailure(format!("Failed to decode response: {}", e)))
}
