//! The session manager: owns the admin session and every change to it.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Restoring the persisted token at startup
//! - Exchanging credentials for a token (and persisting it)
//! - Fetching the profile for the current token
//! - Signing out (and forgetting the persisted token)
//! - Publishing every state change to the view layer
//!
//! # Concurrency note
//!
//! The state lives in a `tokio::sync::watch` channel. Every mutation goes
//! through [`SessionManager::dispatch`], which applies one
//! [`SessionAction`] under the channel's lock, so there is a single
//! writer even though `login`, `fetch_current_user` and `logout` may run
//! on different tasks. Requests are not cancelled. A profile response
//! that outlives its session epoch is discarded by the reducer instead.

use careerlink_protocol::{Credentials, LoginResponse, UserProfile};
use careerlink_transport::{ApiError, IdentityApi};
use tokio::sync::watch;

use crate::guard::{self, RouteDecision};
use crate::{
    Session, SessionAction, SessionConfig, SessionError, TokenStore,
};

/// Shown when a login fails without a usable server message.
pub const LOGIN_FAILED: &str = "Login failed";

/// Shown when a profile fetch fails without a usable server message.
pub const FETCH_USER_FAILED: &str = "Failed to fetch user";

/// Owns the session state and mediates between the login form, the route
/// guard, and the identity API.
///
/// Share it behind an `Arc`. All methods take `&self`.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [token restored?] ──→ fetch_current_user() ──→ [authenticated]
///   │                                      ↑                     │
///   └──→ login() ──(ok: token saved)───────┘                     │
///                                                                ▼
///                                                      logout() → [logged out]
/// ```
pub struct SessionManager<A: IdentityApi, S: TokenStore> {
    api: A,
    store: S,
    config: SessionConfig,
    state: watch::Sender<Session>,
}

impl<A: IdentityApi, S: TokenStore> SessionManager<A, S> {
    /// Creates a manager and restores the session from `store`.
    ///
    /// A store that can't be read is treated as logged out (and logged at
    /// `warn`): the user can still sign in, which rewrites the entry.
    pub fn new(api: A, store: S, config: SessionConfig) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token, starting logged out");
                None
            }
        };
        tracing::debug!(restored = token.is_some(), "session initialized");

        let (state, _) = watch::channel(Session::restore(token));
        Self {
            api,
            store,
            config,
            state,
        }
    }

    /// Applies an action to the session and notifies subscribers if it
    /// changed anything. Returns whether the action was applied.
    pub fn dispatch(&self, action: SessionAction) -> bool {
        let name = action.name();
        let applied = self
            .state
            .send_if_modified(|session| session.apply(action, &self.config));
        tracing::trace!(action = name, applied, "session action");
        applied
    }

    /// Exchanges `credentials` for a token.
    ///
    /// On success the token is persisted, then installed in the session.
    /// On failure the session's `error` holds the server's message, or
    /// [`LOGIN_FAILED`] when the response had none. Either way the session
    /// is no longer loading when this returns.
    ///
    /// # Errors
    /// - [`SessionError::MissingCredential`]: a blank field; nothing sent
    /// - [`SessionError::Api`]: the identity API call failed
    /// - [`SessionError::Store`]: the token could not be persisted
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginResponse, SessionError> {
        if let Some(field) = credentials.missing_field() {
            return Err(SessionError::MissingCredential(field));
        }

        self.dispatch(SessionAction::LoginPending);

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "login rejected");
                self.dispatch(SessionAction::LoginFailed {
                    message: failure_message(&e, LOGIN_FAILED),
                });
                return Err(SessionError::Api(e));
            }
        };

        if let Err(e) = self.store.save(&response.token) {
            tracing::warn!(error = %e, "login succeeded but token could not be persisted");
            self.dispatch(SessionAction::LoginFailed {
                message: e.to_string(),
            });
            return Err(SessionError::Store(e));
        }

        self.dispatch(SessionAction::LoginSucceeded {
            token: response.token.clone(),
        });
        tracing::info!(email = %credentials.email, "login succeeded");
        Ok(response)
    }

    /// Fetches the profile for the persisted token and stores it in the
    /// session.
    ///
    /// Returns `Ok(None)` without any request when no token is persisted.
    /// A failed fetch records its message in `error` but leaves the token
    /// alone: the session is not treated as invalidated.
    ///
    /// # Errors
    /// - [`SessionError::Api`]: the identity API call failed
    /// - [`SessionError::Store`]: the persisted token could not be read
    /// - [`SessionError::Superseded`]: the session changed mid-request
    pub async fn fetch_current_user(
        &self,
    ) -> Result<Option<UserProfile>, SessionError> {
        let epoch = self.state.borrow().epoch;

        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.dispatch(SessionAction::ProfileFailed {
                    epoch,
                    message: FETCH_USER_FAILED.to_string(),
                });
                return Err(SessionError::Store(e));
            }
        };

        self.dispatch(SessionAction::ProfilePending { epoch });

        match self.api.current_user(&token).await {
            Ok(user) => {
                let applied = self.dispatch(SessionAction::ProfileFetched {
                    epoch,
                    user: user.clone(),
                });
                if !applied {
                    return Err(self.superseded(epoch));
                }
                tracing::info!(user = user.display_name(), role = %user.role, "profile loaded");
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, epoch, "profile fetch failed");
                let applied = self.dispatch(SessionAction::ProfileFailed {
                    epoch,
                    message: failure_message(&e, FETCH_USER_FAILED),
                });
                if !applied {
                    return Err(self.superseded(epoch));
                }
                Err(SessionError::Api(e))
            }
        }
    }

    /// Signs out: clears token and user, and removes the persisted token.
    ///
    /// Never fails. Calling it while already logged out leaves the session
    /// unchanged but still clears storage.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
        if self.dispatch(SessionAction::LoggedOut) {
            tracing::info!("logged out");
        }
    }

    /// A clone of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// A receiver that sees every future session change. The view layer
    /// re-renders on `changed()`.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The route guard's verdict for the current session.
    pub fn route_decision(&self) -> RouteDecision {
        guard::evaluate(&self.state.borrow())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn superseded(&self, started: u64) -> SessionError {
        let current = self.state.borrow().epoch;
        tracing::debug!(started, current, "discarded stale profile response");
        SessionError::Superseded { started, current }
    }
}

/// The message the session stores for a failed request: the server's,
/// or `fallback` when there was no usable one (network failure, empty or
/// non-JSON body, malformed body).
fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

// =========================================================================
// Tests
// =========================================================================
