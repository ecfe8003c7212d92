//! Error Types
//!
//! Defines the error taxonomy for the client:
//!
//! - `ApiError` - Transport-level failures (network, HTTP status, decode)
//! - `AuthError` - Authentication failures surfaced by the gateway and controller
//! - `StorageError` - Local key-value persistence failures
//!
//! The backend is Django REST Framework, which reports failures as a JSON
//! body with a `detail` field. `extract_detail` pulls that field out so UI
//! code can show the server's own message.

use thiserror::Error;

/// Transport-level API errors.
///
/// Produced by the shared `ApiClient` and consumed directly by the
/// inventory services; the auth gateway maps these onto `AuthError`.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// The backend rejected the credentials or token (HTTP 401)
    #[error("Unauthorized: {detail}")]
    Unauthorized {
        /// Server-provided detail, or the raw body if none was present
        detail: String,
    },

    /// The backend rejected the request (4xx other than 401)
    #[error("Request rejected ({status}): {detail}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or the raw body if none was present
        detail: String,
    },

    /// The backend failed (5xx)
    #[error("Server error ({status}): {detail}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or the raw body if none was present
        detail: String,
    },

    /// The response body could not be decoded
    #[error("Invalid response body: {message}")]
    Decode {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: detail.into(),
        }
    }

    /// Create a new rejected-request error
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        Self::Server {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The server-provided detail, when one exists
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail }
            | Self::Rejected { detail, .. }
            | Self::Server { detail, .. } => {
                if detail.is_empty() {
                    None
                } else {
                    Some(detail)
                }
            }
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Authentication errors.
///
/// `login` distinguishes bad credentials from transport failures so the
/// login form can render an appropriate message; `verify`/`refresh`
/// collapse token rejection into `TokenInvalid`.
#[derive(Debug, Error, Clone)]
pub enum AuthError {
    /// The backend rejected the supplied username/password
    #[error("Invalid credentials: {detail}")]
    InvalidCredentials {
        /// Server-provided detail, if any
        detail: String,
    },

    /// The supplied token is expired, malformed, or revoked
    #[error("Token invalid: {detail}")]
    TokenInvalid {
        /// Server-provided detail, if any
        detail: String,
    },

    /// The request never produced an HTTP response
    #[error("Network error: {message}")]
    NetworkError {
        /// Human-readable error message
        message: String,
    },

    /// The backend failed (5xx)
    #[error("Server error ({status})")]
    ServerError {
        /// HTTP status code
        status: u16,
    },

    /// Local session persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Create a new invalid-credentials error
    pub fn invalid_credentials(detail: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            detail: detail.into(),
        }
    }

    /// Create a new token-invalid error
    pub fn token_invalid(detail: impl Into<String>) -> Self {
        Self::TokenInvalid {
            detail: detail.into(),
        }
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Map a transport error onto the login error taxonomy.
    ///
    /// Both 401 and 400 responses from `/token/` mean the credentials were
    /// not accepted.
    pub fn from_login(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { detail } => Self::InvalidCredentials { detail },
            ApiError::Rejected { detail, .. } => Self::InvalidCredentials { detail },
            ApiError::Server { status, .. } => Self::ServerError { status },
            ApiError::Network { message } | ApiError::Decode { message } => {
                Self::NetworkError { message }
            }
        }
    }

    /// Map a transport error onto the verify/refresh error taxonomy.
    pub fn from_token_op(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { detail } | ApiError::Rejected { detail, .. } => {
                Self::TokenInvalid { detail }
            }
            ApiError::Server { status, .. } => Self::ServerError { status },
            ApiError::Network { message } | ApiError::Decode { message } => {
                Self::NetworkError { message }
            }
        }
    }

    /// The server-provided detail, when one exists
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials { detail } | Self::TokenInvalid { detail } => {
                if detail.is_empty() {
                    None
                } else {
                    Some(detail)
                }
            }
            _ => None,
        }
    }
}

/// Local key-value persistence errors
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// Filesystem read/write failure
    #[error("Storage I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
    },

    /// JSON encode/decode failure
    #[error("Storage encoding error: {message}")]
    Encode {
        /// Human-readable error message
        message: String,
    },

    /// No platform data directory could be resolved
    #[error("No data directory available for session storage")]
    NoDataDir,
}

impl StorageError {
    /// Create a new I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new encoding error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::encode(err.to_string())
    }
}

/// Pull the `detail` field out of a DRF error body, falling back to the
/// raw body text.
pub(crate) fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_from_drf_body() {
        let body = r#"{"detail": "Token is invalid or expired"}"#;
        assert_eq!(extract_detail(body), "Token is invalid or expired");
    }

    #[test]
    fn test_extract_detail_falls_back_to_raw_body() {
        let body = r#"{"name": ["This field is required."]}"#;
        assert_eq!(extract_detail(body), body);
    }

    #[test]
    fn test_extract_detail_non_json() {
        assert_eq!(extract_detail("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_login_mapping_unauthorized() {
        let err = AuthError::from_login(ApiError::unauthorized("No active account"));
        match err {
            AuthError::InvalidCredentials { detail } => {
                assert_eq!(detail, "No active account");
            }
            other => panic!("Expected InvalidCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_login_mapping_bad_request() {
        let err = AuthError::from_login(ApiError::rejected(400, "username required"));
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
    }

    #[test]
    fn test_token_op_mapping() {
        let err = AuthError::from_token_op(ApiError::unauthorized("expired"));
        assert!(matches!(err, AuthError::TokenInvalid { .. }));

        let err = AuthError::from_token_op(ApiError::server(502, ""));
        assert!(matches!(err, AuthError::ServerError { status: 502 }));

        let err = AuthError::from_token_op(ApiError::network("connection refused"));
        assert!(matches!(err, AuthError::NetworkError { .. }));
    }

    #[test]
    fn test_detail_accessor() {
        let err = AuthError::invalid_credentials("nope");
        assert_eq!(err.detail(), Some("nope"));

        let err = AuthError::invalid_credentials("");
        assert_eq!(err.detail(), None);

        let err = AuthError::network("timeout");
        assert_eq!(err.detail(), None);
    }
}
