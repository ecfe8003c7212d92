/**
 * Auth Wire Types
 *
 * Request/response bodies for the token endpoints, plus the display
 * profile shown in the UI chrome after login.
 */

use serde::{Deserialize, Serialize};

/// Display avatar assigned to every account
pub const DEFAULT_AVATAR: &str = "/csulogo.png";

/// Email domain used when synthesizing a display profile
const EMAIL_DOMAIN: &str = "csu.edu.ph";

/// Login credentials; never stored beyond the login call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }
}

/// Token pair returned by `POST /token/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body for `POST /token/verify/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Body for `POST /token/refresh/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response from `POST /token/refresh/`.
///
/// `refresh` is only present when the backend rotates refresh tokens
/// (simplejwt's `ROTATE_REFRESH_TOKENS`); callers keep the old one
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

/// Denormalized display data for the signed-in user. Not authoritative:
/// the backend returns no profile at login, so this is synthesized
/// client-side from the username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl UserProfile {
    /// Synthesize the display profile for a username: capitalize the
    /// first letter, fabricate an institutional email, assign the
    /// default avatar.
    pub fn for_username(username: &str) -> Self {
        Self {
            name: capitalize(username),
            email: format!("{}@{}", username, EMAIL_DOMAIN),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_synthesis() {
        let profile = UserProfile::for_username("alice");
        assert_eq!(
            profile,
            UserProfile {
                name: "Alice".to_string(),
                email: "alice@csu.edu.ph".to_string(),
                avatar: "/csulogo.png".to_string(),
            }
        );
    }

    #[test]
    fn test_profile_synthesis_empty_username() {
        let profile = UserProfile::for_username("");
        assert_eq!(profile.name, "");
        assert_eq!(profile.email, "@csu.edu.ph");
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let response: RefreshResponse =
            serde_json::from_str(r#"{"access": "A2"}"#).expect("valid body");
        assert_eq!(response.access, "A2");
        assert_eq!(response.refresh, None);
    }

    #[test]
    fn test_refresh_response_with_rotation() {
        let response: RefreshResponse =
            serde_json::from_str(r#"{"access": "A2", "refresh": "R2"}"#).expect("valid body");
        assert_eq!(response.refresh.as_deref(), Some("R2"));
    }

    #[test]
    fn test_credentials_serialization_skips_missing_password() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: None,
        };
        let body = serde_json::to_string(&credentials).expect("serializes");
        assert_eq!(body, r#"{"username":"alice"}"#);
    }

    #[test]
    fn test_profile_round_trip() {
        let profile = UserProfile::for_username("bob");
        let encoded = serde_json::to_string(&profile).expect("serializes");
        let decoded: UserProfile = serde_json::from_str(&encoded).expect("deserializes");
        assert_eq!(profile, decoded);
    }
}
