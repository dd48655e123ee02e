//! Identity API abstraction for the Career Link admin client.
//!
//! Provides the [`IdentityApi`] trait, the two remote calls the session
//! layer needs, and an HTTP implementation on top of `reqwest`.
//!
//! # Feature Flags
//!
//! - `http` (default): [`HttpIdentityApi`] via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::ApiError;
#[cfg(feature = "http")]
pub use http::HttpIdentityApi;

use careerlink_protocol::{Credentials, LoginResponse, UserProfile};

/// Path of the credential exchange endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path of the current-user endpoint, relative to the base URL.
pub const CURRENT_USER_PATH: &str = "/users/me";

/// The remote identity API, as seen by the session layer.
///
/// `Send + Sync + 'static` because the session manager is shared across
/// tokio tasks (the login form and the profile-sync task call it
/// concurrently). Tests implement this trait with canned responses
/// instead of running a server.
pub trait IdentityApi: Send + Sync + 'static {
    /// Exchanges credentials for a session token
    /// (`POST {base}/auth/login`).
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Fetches the profile the token belongs to
    /// (`GET {base}/users/me`, `Authorization: Bearer {token}`).
    fn current_user(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, ApiError>> + Send;
}

/// Joins a base URL and an endpoint path with exactly one slash between.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
