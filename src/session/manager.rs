//! # Session Manager
//!
//! Owns the bearer token and the identity it resolves to. The token is shared
//! with the [`ApiClient`] through its [`TokenHandle`](crate::api_clients::TokenHandle);
//! this manager is the only writer.
//!
//! ## Transitions
//!
//! ```text
//! unauthenticated --restore/login--> authenticating --identity ok--> authenticated
//!        ^                                  |                             |
//!        +------ identity rejected ---------+------------ logout ---------+
//! ```
//!
//! A failed identity fetch always discards the token, both in memory and in the
//! store, so the client never sits in a half-logged-in state.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::oauth::OAuthCallback;
use super::states::{Session, SessionStatus};
use super::token_store::TokenStore;
use crate::api_clients::ApiClient;
use crate::classifier::{classify, ErrorCode, ParsedError};
use crate::logging::log_failure;
use crate::models::User;

/// Explicitly constructed session owner; build one per client
#[derive(Debug)]
pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<dyn TokenStore>,
    state: RwLock<Session>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(Session::default()),
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.read().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }

    /// True iff both a token and a confirmed user are held.
    ///
    /// Route protection should consult this rather than the raw token, which
    /// may be stale.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Resolve the persisted token, if any, into a session.
    ///
    /// Never fails: an unreadable store, a missing token, or a rejected
    /// identity fetch all end in `Unauthenticated` with no token left behind.
    pub async fn restore(&self) -> SessionStatus {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token, starting unauthenticated");
                self.reset_state();
                return SessionStatus::Unauthenticated;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, starting unauthenticated");
                self.reset_state();
                return SessionStatus::Unauthenticated;
            }
        };

        match self.authenticate(token).await {
            Ok(_) => SessionStatus::Authenticated,
            Err(e) => {
                info!(code = %e.code, "Persisted token rejected, session discarded");
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Persist `token`, then confirm it with an identity fetch.
    ///
    /// Resolves only after the identity fetch completes, so callers may rely
    /// on [`is_authenticated`](Self::is_authenticated) afterwards. On failure
    /// the token is discarded and the classified error returned.
    pub async fn login(&self, token: impl Into<String>) -> Result<User, ParsedError> {
        let token = token.into();

        {
            let mut state = self.state.write();
            if let Err(e) = self.store.save(&token) {
                let parsed = classify(e);
                log_failure(&parsed, "session login");
                *state = Session::default();
                self.api.token_handle().clear();
                return Err(parsed);
            }
            self.api.token_handle().set(token.clone());
            *state = Session::authenticating(token.clone());
        }

        self.confirm_identity(token).await
    }

    /// Finish the OAuth handoff by logging in with the returned token
    pub async fn complete_oauth(&self, callback: OAuthCallback) -> Result<User, ParsedError> {
        let token = callback.into_token().map_err(|e| {
            log_failure(&e, "oauth callback");
            e
        })?;
        self.login(token).await
    }

    /// Drop the token and user immediately; never fails
    pub fn logout(&self) {
        {
            let mut state = self.state.write();
            *state = Session::default();
            self.api.token_handle().clear();
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear persisted token during logout");
            }
        }
        info!("Logged out");
    }

    /// Exchange the current token for a fresh one.
    ///
    /// The new token is persisted and adopted only if the session still holds
    /// the token that was refreshed; after a logout or a newer login the
    /// response is dropped. A reauth-class rejection ends the session under
    /// the same condition.
    pub async fn refresh(&self) -> Result<(), ParsedError> {
        let current = self.state.read().token.clone();
        let Some(current) = current else {
            return Err(ParsedError::new(ErrorCode::Unauthorized, "No active session"));
        };

        let response = match self.api.refresh_token().await {
            Ok(response) => response,
            Err(e) => {
                if e.requires_reauth() {
                    self.discard_if_current(&current);
                }
                return Err(e);
            }
        };

        let mut state = self.state.write();
        if state.token.as_deref() != Some(current.as_str()) {
            debug!("Session changed during token refresh, dropping refreshed token");
            return Ok(());
        }

        if let Err(e) = self.store.save(&response.token) {
            let parsed = classify(e);
            log_failure(&parsed, "session refresh");
            return Err(parsed);
        }

        state.token = Some(response.token.clone());
        self.api.token_handle().set(response.token);
        debug!("Session token refreshed");
        Ok(())
    }

    async fn authenticate(&self, token: String) -> Result<User, ParsedError> {
        {
            let mut state = self.state.write();
            self.api.token_handle().set(token.clone());
            *state = Session::authenticating(token.clone());
        }
        self.confirm_identity(token).await
    }

    async fn confirm_identity(&self, token: String) -> Result<User, ParsedError> {
        match self.api.fetch_identity().await {
            Ok(user) => {
                let mut state = self.state.write();
                if state.token.as_deref() == Some(token.as_str()) {
                    info!(user_id = %user.id, "Session authenticated");
                    *state = Session::authenticated(token, user.clone());
                } else {
                    debug!("Session changed during identity fetch, keeping newer state");
                }
                Ok(user)
            }
            Err(e) => {
                self.discard_if_current(&token);
                Err(e)
            }
        }
    }

    fn discard_if_current(&self, token: &str) {
        let mut state = self.state.write();
        if state.token.as_deref() != Some(token) {
            return;
        }
        *state = Session::default();
        self.api.token_handle().clear();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear rejected token");
        }
    }

    fn reset_state(&self) {
        *self.state.write() = Session::default();
        self.api.token_handle().clear();
    }
}
