//! Unified error type for the Career Link admin client.

use careerlink_protocol::ProtocolError;
use careerlink_session::{SessionError, StoreError};
use careerlink_transport::ApiError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `careerlink` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant auto-generates `From` impls, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The identity API could not be reached, or refused the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A payload could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A login or profile operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The persisted token could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AdminError {
    /// The message the login form would show for this error, if the server
    /// supplied one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api(e) | Self::Session(SessionError::Api(e)) => {
                e.server_message()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err = ApiError::InvalidBaseUrl("ftp://nope".into());
        let admin_err: AdminError = err.into();
        assert!(matches!(admin_err, AdminError::Api(_)));
        assert!(admin_err.to_string().contains("ftp://nope"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let admin_err: AdminError = err.into();
        assert!(matches!(admin_err, AdminError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::MissingCredential("email");
        let admin_err: AdminError = err.into();
        assert!(matches!(admin_err, AdminError::Session(_)));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Io {
            path: "/tmp/storage.json".into(),
            source: std::io::Error::other("disk full"),
        };
        let admin_err: AdminError = err.into();
        assert!(matches!(admin_err, AdminError::Store(_)));
    }

    #[test]
    fn test_server_message_through_session_error() {
        let err: AdminError = SessionError::Api(ApiError::Rejected {
            status: 401,
            message: Some("invalid credentials".into()),
        })
        .into();

        assert_eq!(err.server_message(), Some("invalid credentials"));
    }

    #[test]
    fn test_server_message_absent_for_store_error() {
        let err: AdminError = StoreError::Io {
            path: "/tmp/storage.json".into(),
            source: std::io::Error::other("disk full"),
        }
        .into();

        assert_eq!(err.server_message(), None);
    }
}
