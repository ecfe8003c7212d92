/**
 * Auth Gateway
 *
 * Stateless client for the backend's simplejwt token endpoints. Each
 * operation is a single network round trip; retry and fallback decisions
 * live in the session controller, not here.
 */

use crate::error::AuthError;
use crate::transport::ApiClient;
use crate::types::{Credentials, RefreshRequest, RefreshResponse, TokenPair, VerifyRequest};

/// Endpoint paths, relative to the API prefix
const TOKEN_ENDPOINT: &str = "/token/";
const VERIFY_ENDPOINT: &str = "/token/verify/";
const REFRESH_ENDPOINT: &str = "/token/refresh/";

/// Stateless auth API client.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    api: ApiClient,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Obtain a pair of access and refresh tokens.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        self.api
            .post_json(TOKEN_ENDPOINT, credentials)
            .await
            .map_err(AuthError::from_login)
    }

    /// Check whether an access token is still valid.
    pub async fn verify(&self, access: &str) -> Result<(), AuthError> {
        let body = VerifyRequest {
            token: access.to_owned(),
        };
        self.api
            .post_no_content(VERIFY_ENDPOINT, &body)
            .await
            .map_err(AuthError::from_token_op)
    }

    /// Mint a new access token from a refresh token. The response only
    /// carries a new refresh token when the backend rotates them.
    pub async fn refresh(&self, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let body = RefreshRequest {
            refresh: refresh.to_owned(),
        };
        self.api
            .post_json(REFRESH_ENDPOINT, &body)
            .await
            .map_err(AuthError::from_token_op)
    }
}
