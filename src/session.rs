//! Session Store
//!
//! Process-wide session state: access token, refresh token, and the
//! display profile, held in memory and mirrored into key-value storage.
//! This is the single source of truth for "is the user signed in".
//!
//! Two invariants are enforced here:
//!
//! - The token pair and profile are applied as one unit inside a single
//!   critical section; a reader never observes a half-applied triple.
//! - Every mutation also updates the persisted copy and the transport's
//!   default bearer credential before it returns, so storage, memory,
//!   and the `Authorization` header never disagree after a call
//!   completes.
//!
//! All writes go through `set_session` / `clear_session`; nothing else in
//! the crate touches the fields directly.

use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::storage::SessionStorage;
use crate::transport::ApiClient;
use crate::types::UserProfile;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key for the JSON-encoded profile
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    profile: Option<UserProfile>,
}

/// Read-only copy of the session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub profile: Option<UserProfile>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// The session store. Constructed once and shared by reference.
pub struct SessionStore {
    inner: Mutex<SessionState>,
    storage: Arc<dyn SessionStorage>,
    api: ApiClient,
}

impl SessionStore {
    /// Create the store, hydrating from persisted storage.
    ///
    /// A half-present token pair (one token without the other) is treated
    /// as corrupt and discarded, which forces a re-login rather than
    /// leaving the session in a state the controller never produces.
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Result<Self, StorageError> {
        let access_token = storage.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = storage.get(REFRESH_TOKEN_KEY)?;
        let profile = match storage.get(USER_DATA_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(%err, "persisted profile unreadable, dropping it");
                    None
                }
            },
            None => None,
        };

        let state = match (access_token, refresh_token) {
            (Some(access), Some(refresh)) => SessionState {
                access_token: Some(access),
                refresh_token: Some(refresh),
                profile,
            },
            (None, None) => SessionState::default(),
            _ => {
                tracing::warn!("half-present persisted token pair, discarding session");
                storage.remove(ACCESS_TOKEN_KEY)?;
                storage.remove(REFRESH_TOKEN_KEY)?;
                storage.remove(USER_DATA_KEY)?;
                SessionState::default()
            }
        };

        if let Some(access) = &state.access_token {
            api.set_bearer(Some(access));
        }

        Ok(Self {
            inner: Mutex::new(state),
            storage,
            api,
        })
    }

    /// Replace the token pair (and optionally the profile) as one unit.
    ///
    /// `profile: None` leaves the current profile in place; the refresh
    /// path uses this so a token rotation does not touch display data.
    pub fn set_session(
        &self,
        access: &str,
        refresh: &str,
        profile: Option<UserProfile>,
    ) -> Result<(), StorageError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        self.storage.set(ACCESS_TOKEN_KEY, access)?;
        self.storage.set(REFRESH_TOKEN_KEY, refresh)?;
        if let Some(profile) = &profile {
            let encoded = serde_json::to_string(profile)?;
            self.storage.set(USER_DATA_KEY, &encoded)?;
        }

        state.access_token = Some(access.to_owned());
        state.refresh_token = Some(refresh.to_owned());
        if let Some(profile) = profile {
            state.profile = Some(profile);
        }

        self.api.set_bearer(Some(access));
        tracing::debug!("session stored");
        Ok(())
    }

    /// Clear tokens and profile together. Idempotent.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        self.storage.remove(USER_DATA_KEY)?;

        *state = SessionState::default();
        self.api.set_bearer(None);
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Re-point the transport bearer at the current access token.
    /// Used after a successful verify on a freshly hydrated session.
    pub fn reapply_bearer(&self) {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.api.set_bearer(state.access_token.as_deref());
    }

    pub fn access_token(&self) -> Option<String> {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.refresh_token.clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.profile.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.access_token.is_some()
    }

    /// All three fields, read under one lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        SessionSnapshot {
            access_token: state.access_token.clone(),
            refresh_token: state.refresh_token.clone(),
            profile: state.profile.clone(),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token values stay out of logs
        f.debug_struct("SessionStore")
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStorage;

    fn store_with_storage(storage: Arc<MemoryStorage>) -> (SessionStore, ApiClient) {
        let api = ApiClient::new(Config::with_server_url("http://127.0.0.1:8000"));
        let store = SessionStore::new(api.clone(), storage).expect("hydrate");
        (store, api)
    }

    #[test]
    fn test_set_session_updates_memory_storage_and_bearer() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, api) = store_with_storage(storage.clone());

        store
            .set_session("A1", "R1", Some(UserProfile::for_username("alice")))
            .expect("set");

        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("A1"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("R1"));
        assert!(storage.get(USER_DATA_KEY).unwrap().is_some());
        assert_eq!(api.bearer().as_deref(), Some("A1"));
    }

    #[test]
    fn test_set_session_without_profile_preserves_existing() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _api) = store_with_storage(storage);

        let profile = UserProfile::for_username("alice");
        store
            .set_session("A1", "R1", Some(profile.clone()))
            .expect("set");
        store.set_session("A2", "R1", None).expect("rotate access");

        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.profile(), Some(profile));
    }

    #[test]
    fn test_clear_session() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, api) = store_with_storage(storage.clone());

        store
            .set_session("A1", "R1", Some(UserProfile::for_username("alice")))
            .expect("set");
        store.clear_session().expect("clear");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.access_token, None);
        assert_eq!(snapshot.refresh_token, None);
        assert_eq!(snapshot.profile, None);
        assert!(!snapshot.is_authenticated());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);
        assert!(api.bearer().is_none());
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _api) = store_with_storage(storage);
        store.clear_session().expect("clear on empty");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_hydration_restores_session_and_bearer() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(ACCESS_TOKEN_KEY, "A1");
        storage.seed(REFRESH_TOKEN_KEY, "R1");
        storage.seed(
            USER_DATA_KEY,
            r#"{"name":"Alice","email":"alice@csu.edu.ph","avatar":"/csulogo.png"}"#,
        );

        let (store, api) = store_with_storage(storage);
        assert!(store.is_authenticated());
        assert_eq!(store.profile().map(|p| p.name), Some("Alice".to_string()));
        assert_eq!(api.bearer().as_deref(), Some("A1"));
    }

    #[test]
    fn test_hydration_discards_half_present_pair() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(ACCESS_TOKEN_KEY, "A1");

        let (store, api) = store_with_storage(storage.clone());
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert!(api.bearer().is_none());
    }

    #[test]
    fn test_hydration_tolerates_bad_profile_json() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(ACCESS_TOKEN_KEY, "A1");
        storage.seed(REFRESH_TOKEN_KEY, "R1");
        storage.seed(USER_DATA_KEY, "not-json");

        let (store, _api) = store_with_storage(storage);
        assert!(store.is_authenticated());
        assert_eq!(store.profile(), None);
    }
}
