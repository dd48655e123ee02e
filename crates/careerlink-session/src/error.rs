//! Error types for the session layer.

use std::path::PathBuf;

use careerlink_protocol::ProtocolError;
use careerlink_transport::ApiError;

/// Errors from reading or writing the persisted token.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage file could not be read, written, or removed.
    #[error("token storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage file exists but isn't a JSON object of strings.
    #[error("token storage is corrupt: {0}")]
    Codec(#[from] ProtocolError),
}

/// Errors that can occur during session management.
///
/// The session state only ever keeps a message string. These values are
/// what the caller of `login`/`fetch_current_user` gets back, so the form
/// can decide whether to navigate.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A required login field was blank. Nothing was sent.
    #[error("{0} is required")]
    MissingCredential(&'static str),

    /// The identity API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted or read back.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session changed (logout or a new login) while the profile
    /// request was in flight, so its result was discarded.
    #[error("profile response for session epoch {started} discarded (now {current})")]
    Superseded { started: u64, current: u64 },
}
