//! Session types: the state the admin client keeps about who is signed in.
//!
//! A "session" is the client's record of the signed-in administrator. It
//! tracks:
//! - WHICH credential is in use (the bearer token)
//! - WHO it belongs to (the profile, once fetched)
//! - WHETHER a request is in flight (for the guard's loading state)
//! - WHAT went wrong last (for the login form's inline alert)
//!
//! Every change goes through [`Session::apply`] with a named
//! [`SessionAction`]. Nothing else mutates a `Session`.

use std::fmt;

use careerlink_protocol::UserProfile;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Drop profile responses that belong to an older session epoch.
    ///
    /// With this on, a `/users/me` response that lands after a logout (or
    /// after a different token was installed) is ignored. Turning it off
    /// restores the legacy behavior where a late response can repopulate
    /// `user` on a logged-out session.
    ///
    /// Default: `true`.
    pub discard_stale_responses: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            discard_stale_responses: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionAction
// ---------------------------------------------------------------------------

/// A named, serializable mutation of the session.
///
/// Profile actions carry the `epoch` the fetch was started in, so the
/// reducer can tell a current response from one that outlived its session.
///
/// `#[serde(tag = "type")]` produces `{ "type": "LoginFailed", "message": "..." }`,
/// which is what an action log or devtools bridge wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionAction {
    /// A login request was dispatched.
    LoginPending,

    /// The identity API issued a token (already persisted).
    LoginSucceeded { token: String },

    /// The login attempt failed; `message` is what the form should show.
    LoginFailed { message: String },

    /// A `/users/me` request was dispatched during `epoch`.
    ProfilePending { epoch: u64 },

    /// The profile for `epoch` arrived.
    ProfileFetched { epoch: u64, user: UserProfile },

    /// The profile fetch for `epoch` failed.
    ProfileFailed { epoch: u64, message: String },

    /// The administrator signed out.
    LoggedOut,
}

impl SessionAction {
    /// Short name for log lines. Never includes the token.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginPending => "login-pending",
            Self::LoginSucceeded { .. } => "login-succeeded",
            Self::LoginFailed { .. } => "login-failed",
            Self::ProfilePending { .. } => "profile-pending",
            Self::ProfileFetched { .. } => "profile-fetched",
            Self::ProfileFailed { .. } => "profile-failed",
            Self::LoggedOut => "logged-out",
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The signed-in administrator's session, as the view layer sees it.
///
/// `token` and `user` are not transactionally linked: right after startup
/// (or right after login) the token is set while the user is still `None`
/// until `/users/me` answers.
///
/// ```text
///   LoggedOut ──(login ok)──→ Token only ──(profile ok)──→ Token + User
///       ↑                         │                             │
///       └────────────(logout)─────┴─────────────(logout)────────┘
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential, or `None` when signed out.
    pub token: Option<String>,

    /// The profile `/users/me` returned for the token.
    pub user: Option<UserProfile>,

    /// Last authentication failure message. Cleared by the next login
    /// attempt, not by logout.
    pub error: Option<String>,

    /// Session generation. Bumped on every successful login and every
    /// logout, so responses started under an older session can be spotted
    /// and each login gets its own profile fetch.
    pub epoch: u64,

    login_in_flight: bool,
    // Profile requests dispatched in the current epoch and not yet answered.
    profile_requests: u32,
}

impl Session {
    /// Creates the startup session from whatever token storage held.
    pub fn restore(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// `true` while a login or profile request is in flight.
    pub fn is_loading(&self) -> bool {
        self.login_in_flight || self.profile_requests > 0
    }

    /// `true` while a login request is in flight. The login form disables
    /// its submit button on this.
    pub fn is_logging_in(&self) -> bool {
        self.login_in_flight
    }

    /// `true` once both a token and its profile are present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Applies one action. Returns `false` if the action was ignored
    /// (a stale profile response, or a logout on an empty session), in
    /// which case `self` is unchanged.
    pub fn apply(
        &mut self,
        action: SessionAction,
        config: &SessionConfig,
    ) -> bool {
        match action {
            SessionAction::LoginPending => {
                self.login_in_flight = true;
                self.error = None;
            }
            SessionAction::LoginSucceeded { token } => {
                self.epoch += 1;
                self.profile_requests = 0;
                self.token = Some(token);
                self.login_in_flight = false;
                self.error = None;
            }
            SessionAction::LoginFailed { message } => {
                self.login_in_flight = false;
                self.error = Some(message);
            }
            SessionAction::ProfilePending { epoch } => {
                if self.is_stale(epoch, config) {
                    return false;
                }
                self.profile_requests += 1;
            }
            SessionAction::ProfileFetched { epoch, user } => {
                if self.is_stale(epoch, config) {
                    return false;
                }
                self.user = Some(user);
                self.profile_requests = self.profile_requests.saturating_sub(1);
            }
            SessionAction::ProfileFailed { epoch, message } => {
                if self.is_stale(epoch, config) {
                    return false;
                }
                self.error = Some(message);
                self.profile_requests = self.profile_requests.saturating_sub(1);
            }
            SessionAction::LoggedOut => {
                if self.token.is_none()
                    && self.user.is_none()
                    && self.profile_requests == 0
                {
                    return false;
                }
                self.token = None;
                self.user = None;
                self.profile_requests = 0;
                self.epoch += 1;
            }
        }
        true
    }

    fn is_stale(&self, epoch: u64, config: &SessionConfig) -> bool {
        config.discard_stale_responses && epoch != self.epoch
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user.as_ref().map(|u| u.display_name()))
            .field("error", &self.error)
            .field("epoch", &self.epoch)
            .field("login_in_flight", &self.login_in_flight)
            .field("profile_requests", &self.profile_requests)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Reducer tests. Each one drives `Session::apply` directly; the
    //! manager tests cover the same transitions through real requests.

    use careerlink_protocol::Role;

    use super::*;

    fn user(name: &str) -> UserProfile {
        UserProfile {
            id: format!("id-{name}"),
            username: name.to_string(),
            email: format!("{name}@careerlink.test"),
            role: Role::Admin,
            avatar: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn strict() -> SessionConfig {
        SessionConfig::default()
    }

    fn legacy() -> SessionConfig {
        SessionConfig {
            discard_stale_responses: false,
        }
    }

    // =====================================================================
    // login actions
    // =====================================================================

    #[test]
    fn test_apply_login_pending_sets_loading_and_clears_error() {
        let mut s = Session {
            error: Some("old".into()),
            ..Session::default()
        };

        assert!(s.apply(SessionAction::LoginPending, &strict()));

        assert!(s.is_loading());
        assert!(s.is_logging_in());
        assert_eq!(s.error, None);
    }

    #[test]
    fn test_apply_login_succeeded_sets_token_and_bumps_epoch() {
        let mut s = Session::default();
        s.apply(SessionAction::LoginPending, &strict());

        s.apply(
            SessionAction::LoginSucceeded {
                token: "abc123".into(),
            },
            &strict(),
        );

        assert_eq!(s.token.as_deref(), Some("abc123"));
        assert!(!s.is_loading());
        assert_eq!(s.epoch, 1);
    }

    #[test]
    fn test_apply_login_succeeded_same_token_bumps_epoch() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());

        s.apply(
            SessionAction::LoginSucceeded {
                token: "abc123".into(),
            },
            &strict(),
        );

        assert_eq!(s.epoch, 1);
        assert!(!s.is_loading());
    }

    #[test]
    fn test_apply_login_failed_sets_error_and_keeps_token() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::LoginPending, &strict());

        s.apply(
            SessionAction::LoginFailed {
                message: "invalid credentials".into(),
            },
            &strict(),
        );

        assert_eq!(s.error.as_deref(), Some("invalid credentials"));
        assert_eq!(s.token.as_deref(), Some("abc123"));
        assert!(!s.is_loading());
    }

    // =====================================================================
    // profile actions
    // =====================================================================

    #[test]
    fn test_apply_profile_fetched_current_epoch_sets_user() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());
        assert!(s.is_loading());

        let applied = s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("root"),
            },
            &strict(),
        );

        assert!(applied);
        assert!(s.is_authenticated());
        assert!(!s.is_loading());
    }

    #[test]
    fn test_apply_overlapping_profile_requests_stay_loading_until_last() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());

        s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("root"),
            },
            &strict(),
        );
        assert!(s.is_loading(), "second request is still in flight");

        s.apply(
            SessionAction::ProfileFailed {
                epoch: 0,
                message: "Failed to fetch user".into(),
            },
            &strict(),
        );
        assert!(!s.is_loading());
    }

    #[test]
    fn test_apply_profile_failed_keeps_token() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());

        s.apply(
            SessionAction::ProfileFailed {
                epoch: 0,
                message: "Failed to fetch user".into(),
            },
            &strict(),
        );

        assert_eq!(s.token.as_deref(), Some("abc123"));
        assert_eq!(s.error.as_deref(), Some("Failed to fetch user"));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_apply_profile_fetched_after_logout_is_discarded() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::ProfilePending { epoch: 0 }, &strict());
        s.apply(SessionAction::LoggedOut, &strict());

        let applied = s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("root"),
            },
            &strict(),
        );

        assert!(!applied);
        assert_eq!(s.user, None);
    }

    #[test]
    fn test_apply_profile_fetched_after_logout_legacy_repopulates_user() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::LoggedOut, &legacy());

        let applied = s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("root"),
            },
            &legacy(),
        );

        assert!(applied);
        assert_eq!(s.token, None);
        assert!(s.user.is_some(), "legacy mode keeps the late response");
    }

    #[test]
    fn test_apply_profile_for_previous_token_is_discarded() {
        let mut s = Session::restore(Some("old".into()));
        s.apply(
            SessionAction::LoginSucceeded {
                token: "new".into(),
            },
            &strict(),
        );

        let applied = s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("previous"),
            },
            &strict(),
        );

        assert!(!applied);
        assert_eq!(s.user, None);
    }

    // =====================================================================
    // logout
    // =====================================================================

    #[test]
    fn test_apply_logged_out_clears_token_and_user() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(
            SessionAction::ProfileFetched {
                epoch: 0,
                user: user("root"),
            },
            &strict(),
        );

        assert!(s.apply(SessionAction::LoggedOut, &strict()));

        assert_eq!(s.token, None);
        assert_eq!(s.user, None);
        assert_eq!(s.epoch, 1);
    }

    #[test]
    fn test_apply_logged_out_twice_leaves_state_unchanged() {
        let mut s = Session::restore(Some("abc123".into()));
        s.apply(SessionAction::LoggedOut, &strict());
        let before = s.clone();

        let applied = s.apply(SessionAction::LoggedOut, &strict());

        assert!(!applied);
        assert_eq!(s, before);
    }

    // =====================================================================
    // serialization / debug
    // =====================================================================

    #[test]
    fn test_session_action_serializes_with_type_tag() {
        let action = SessionAction::LoginFailed {
            message: "invalid credentials".into(),
        };

        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["type"], "LoginFailed");
        assert_eq!(json["message"], "invalid credentials");
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let s = Session::restore(Some("abc123".into()));
        let printed = format!("{s:?}");

        assert!(!printed.contains("abc123"));
        assert!(printed.contains("<redacted>"));
    }
}
