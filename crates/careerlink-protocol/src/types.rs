//! Core wire types for the identity API.
//!
//! These are the bodies that get serialized to JSON, sent over HTTP, and
//! deserialized on the other side:
//!
//! ```text
//! POST /auth/login   Credentials  →  LoginResponse
//! GET  /users/me     (bearer)     →  UserProfile
//! any failure                     →  ErrorBody
//! ```

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The email/password pair the login form submits.
///
/// Serializes as `{"email": "...", "password": "..."}`. `Debug` is written
/// by hand so the password never ends up in a log line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns the name of the first required field that is blank.
    ///
    /// This is the whole of client-side validation: the login form marks
    /// both fields as required and nothing more.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.email.trim().is_empty() {
            Some("email")
        } else if self.password.trim().is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Role / UserProfile
// ---------------------------------------------------------------------------

/// The account role the identity API assigns.
///
/// `#[serde(other)]` catches roles this client doesn't know about yet, so
/// a new server-side role never breaks profile decoding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Company,
    JobSeeker,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Company => write!(f, "company"),
            Self::JobSeeker => write!(f, "job_seeker"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The profile returned by `GET /users/me`.
///
/// The server also sends a (blanked) `password` field. It is not declared
/// here, and serde skips unknown fields, so it is never held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: Role,

    /// Avatar URI. The server sends `""` when the user has none, which
    /// [`avatar_url`](Self::avatar_url) treats the same as `null`.
    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserProfile {
    /// The name shown in the navigation shell: the username, or the email
    /// when the username is blank.
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }

    /// The avatar URI, if the user has a non-empty one.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_deref().filter(|url| !url.is_empty())
    }
}

// ---------------------------------------------------------------------------
// LoginResponse
// ---------------------------------------------------------------------------

/// The success body of `POST /auth/login`.
///
/// Only `token` drives the session. The embedded `user` and `expiry` are
/// kept for callers that want them, but the session still fetches the
/// profile separately through `/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

// ---------------------------------------------------------------------------
// ErrorBody
// ---------------------------------------------------------------------------

/// A failure body. The identity API answers `{"error": "..."}`; proxies
/// and older endpoints answer `{"message": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The human-readable message, preferring `message` over `error`.
    /// Blank strings count as absent.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.error.filter(|e| !e.trim().is_empty()))
    }
}

/// Extracts the human-readable message from a raw failure body.
///
/// - JSON object → its `message` or `error` field.
/// - JSON string → the string itself.
/// - anything else (empty, non-JSON text such as a proxy's HTML page, JSON
///   without a usable message) → `None`, so the caller falls back to its
///   generic message.
#[cfg(feature = "json")]
pub fn error_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => {
            Some(text).filter(|t| !t.trim().is_empty())
        }
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value::<ErrorBody>(value)
                .ok()
                .and_then(ErrorBody::into_message)
        }
        _ => None,
    }
}

// =========================================================================
// Tests
// =========================================================================
