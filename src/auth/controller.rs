//! Session Controller
//!
//! Orchestrates the token lifecycle against the session store:
//!
//! - `login` re-throws its error so the login form can render it
//! - `verify_session` never errors: any failure collapses into `false`
//!   and a cleared session, because it runs inside navigation guards
//!   where no user-facing error channel exists
//! - verification is tried first and refresh is only a fallback; exactly
//!   one refresh attempt is made per failed verification, and a failed
//!   refresh is terminal for the session
//!
//! Concurrent `verify_session` calls (two guards firing close together)
//! serialize their refresh attempts behind `refresh_gate`; a caller that
//! waited its turn and finds the access token already replaced adopts
//! that result instead of spending a second refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::gateway::AuthGateway;
use crate::error::AuthError;
use crate::session::SessionStore;
use crate::types::{Credentials, UserProfile};

/// Fallback message when the server gives no error detail
const LOGIN_FALLBACK_MESSAGE: &str = "Failed to authenticate. Please check your credentials.";

/// Orchestrator for login, logout, and session verification.
pub struct SessionController {
    store: Arc<SessionStore>,
    gateway: AuthGateway,
    refresh_gate: tokio::sync::Mutex<()>,
    last_error: Mutex<Option<String>>,
    loading: AtomicBool,
}

impl SessionController {
    pub fn new(store: Arc<SessionStore>, gateway: AuthGateway) -> Self {
        Self {
            store,
            gateway,
            refresh_gate: tokio::sync::Mutex::new(()),
            last_error: Mutex::new(None),
            loading: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Message for the last failed login, for the login form.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether a login call is in flight, for the login form.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Exchange credentials for a token pair and populate the session.
    ///
    /// The backend returns no profile data at login, so a display profile
    /// is synthesized from the username. On failure the human-readable
    /// message is recorded for the UI and the error is returned to the
    /// caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.loading.store(true, Ordering::SeqCst);
        self.set_error(None);

        let result = self.login_inner(credentials).await;

        if let Err(err) = &result {
            tracing::debug!(%err, "login failed");
            let message = err
                .detail()
                .map(str::to_owned)
                .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string());
            self.set_error(Some(message));
        }
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    async fn login_inner(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let tokens = self.gateway.login(credentials).await?;
        let profile = UserProfile::for_username(&credentials.username);
        self.store
            .set_session(&tokens.access, &tokens.refresh, Some(profile))?;
        tracing::debug!(username = %credentials.username, "login succeeded");
        Ok(())
    }

    /// Clear the session. Idempotent; storage failures are logged, not
    /// surfaced, because logout has no failure path for the UI.
    pub fn logout(&self) {
        if let Err(err) = self.store.clear_session() {
            tracing::warn!(%err, "failed to clear persisted session on logout");
        }
    }

    /// Check whether the current session is usable, refreshing once if
    /// the access token no longer verifies. Never errors: the answer is
    /// a boolean and the session is left consistent either way.
    pub async fn verify_session(&self) -> bool {
        let Some(access) = self.store.access_token() else {
            tracing::debug!("verify_session: no access token");
            return false;
        };

        match self.gateway.verify(&access).await {
            Ok(()) => {
                self.store.reapply_bearer();
                true
            }
            Err(err) => {
                tracing::debug!(%err, "access token failed verification, trying refresh");
                self.refresh_fallback(&access).await
            }
        }
    }

    /// One refresh attempt, serialized across concurrent callers.
    async fn refresh_fallback(&self, failed_access: &str) -> bool {
        let _flight = self.refresh_gate.lock().await;

        // While we waited for the gate, another caller may have finished
        // the job: a replaced token means its refresh succeeded, a missing
        // one means it failed and cleared the session.
        match self.store.access_token() {
            None => return false,
            Some(current) if current != failed_access => return true,
            Some(_) => {}
        }

        let Some(refresh) = self.store.refresh_token() else {
            self.clear_quietly();
            return false;
        };

        match self.gateway.refresh(&refresh).await {
            Ok(response) => {
                // The backend only returns a refresh token when it
                // rotates them; otherwise the old one stays valid.
                let retained = response.refresh.unwrap_or(refresh);
                match self.store.set_session(&response.access, &retained, None) {
                    Ok(()) => {
                        tracing::debug!("access token refreshed");
                        true
                    }
                    Err(err) => {
                        tracing::warn!(%err, "failed to persist refreshed session");
                        self.clear_quietly();
                        false
                    }
                }
            }
            Err(err) => {
                tracing::debug!(%err, "refresh failed, clearing session");
                self.clear_quietly();
                false
            }
        }
    }

    fn set_error(&self, message: Option<String>) {
        let mut slot = self.last_error.lock().unwrap_or_else(|e| e.into_inner());
        *slot = message;
    }

    fn clear_quietly(&self) {
        if let Err(err) = self.store.clear_session() {
            tracing::warn!(%err, "failed to clear persisted session");
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("is_authenticated", &self.is_authenticated())
            .field("is_loading", &self.is_loading())
            .finish()
    }
}
