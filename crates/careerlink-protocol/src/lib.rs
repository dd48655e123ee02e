//! Wire protocol for the Career Link identity API.
//!
//! This crate defines the "language" the admin client and the identity
//! API speak:
//!
//! - **Types** ([`Credentials`], [`LoginResponse`], [`UserProfile`], etc.):
//!   the JSON bodies that travel over HTTP.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies are
//!   converted to/from bytes. The same codec writes the persisted token
//!   file.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about HTTP or sessions. It only knows
//! the shapes of the messages:
//!
//! ```text
//! Transport (HTTP) → Protocol (typed bodies) → Session (token + user)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
#[cfg(feature = "json")]
pub use types::error_message;
pub use types::{Credentials, ErrorBody, LoginResponse, Role, UserProfile};
