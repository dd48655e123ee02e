//! Admin session management for the Career Link admin client.
//!
//! This crate handles the lifecycle of the signed-in administrator:
//!
//! 1. **Storage**: where the bearer token survives restarts ([`TokenStore`] trait)
//! 2. **Session state**: token, user, loading, error ([`Session`]), changed
//!    only through named [`SessionAction`]s
//! 3. **Orchestration**: login, profile fetch, logout ([`SessionManager`])
//! 4. **Guarding**: may a protected view render? ([`evaluate`])
//!
//! # How it fits in the stack
//!
//! ```text
//! View layer (above)  ← subscribes to Session, asks the guard what to render
//!     ↕
//! Session layer (this crate)  ← owns the token/user lifecycle
//!     ↕
//! Transport layer (below)  ← IdentityApi: login, current user
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod guard;
mod manager;
#[cfg(test)]
mod mock;
mod session;
mod store;

pub use error::{SessionError, StoreError};
pub use guard::{evaluate, RouteDecision, HOME_ROUTE, LOGIN_ROUTE};
pub use manager::{SessionManager, FETCH_USER_FAILED, LOGIN_FAILED};
pub use session::{Session, SessionAction, SessionConfig};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
