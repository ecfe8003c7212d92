/**
 * Shared HTTP Transport
 *
 * Wraps a reqwest client with the backend base URL and a mutable default
 * bearer credential. Every service in the crate issues requests through
 * this client, so a single `set_bearer` call re-points the
 * `Authorization` header for all of them.
 *
 * The bearer slot is owned here but written by the session store: store
 * mutations are responsible for keeping the transport credential in sync
 * (an explicit dependency, wired in `SessionStore::new`).
 */

use std::sync::{Arc, RwLock};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{extract_detail, ApiError};

/// Shared API client. Cheap to clone; clones share the bearer slot.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            bearer: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the default bearer credential attached to every request.
    pub fn set_bearer(&self, token: Option<&str>) {
        let mut slot = self.bearer.write().unwrap_or_else(|e| e.into_inner());
        *slot = token.map(str::to_owned);
    }

    /// The currently attached bearer credential, if any.
    pub fn bearer(&self) -> Option<String> {
        self.bearer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let response = request.send().await.map_err(ApiError::from)?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::debug!(status = status.as_u16(), %detail, "request failed");

        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::unauthorized(detail))
        } else if status.is_server_error() {
            Err(ApiError::server(status.as_u16(), detail))
        } else {
            Err(ApiError::rejected(status.as_u16(), detail))
        }
    }

    /// `GET` a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        response.json().await.map_err(ApiError::from)
    }

    /// `POST` a JSON body and decode a JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        response.json().await.map_err(ApiError::from)
    }

    /// `POST` a JSON body, ignoring the response body
    pub async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// `PATCH` a JSON body and decode a JSON response
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        response.json().await.map_err(ApiError::from)
    }

    /// `DELETE` a resource
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_slot_starts_empty() {
        let client = ApiClient::new(Config::with_server_url("http://127.0.0.1:8000"));
        assert!(client.bearer().is_none());
    }

    #[test]
    fn test_bearer_slot_shared_between_clones() {
        let client = ApiClient::new(Config::with_server_url("http://127.0.0.1:8000"));
        let clone = client.clone();

        client.set_bearer(Some("A1"));
        assert_eq!(clone.bearer().as_deref(), Some("A1"));

        clone.set_bearer(None);
        assert!(client.bearer().is_none());
    }
}
