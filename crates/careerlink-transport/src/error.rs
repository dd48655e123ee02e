use careerlink_protocol::ProtocolError;

/// Errors that can occur while talking to the identity API.
///
/// The session layer collapses all of these into one message string for
/// display. The variants stay distinct here so callers and logs can tell a
/// refused connection from a 401.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection,
    /// TLS failure, body read interrupted).
    #[error("request failed: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status. `message` is the
    /// text extracted from the error body, if it had a usable one.
    #[error("server rejected request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The server answered 2xx but the body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(#[from] ProtocolError),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The server-provided message, if this is a rejection that carried
    /// one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(Box::new(err))
    }
}
