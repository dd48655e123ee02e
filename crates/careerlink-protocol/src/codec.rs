//! Codec trait and implementations for serializing/deserializing bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The HTTP client decodes response bodies through a [`Codec`] instead of
//! calling `serde_json` directly, so a malformed body surfaces as a
//! [`ProtocolError`] the session layer can tell apart from a network
//! failure.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// - `Send + Sync` → shared between the HTTP client and the token store,
///   which may run on any tokio worker thread.
/// - `'static` → the codec owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// The identity API speaks JSON, and the persisted token file is a small
/// JSON object, so this is the only codec the client needs. It sits behind
/// the `json` feature (enabled by default).
///
/// ## Example
///
/// ```rust
/// use careerlink_protocol::{Codec, Credentials, JsonCodec};
///
/// let codec = JsonCodec;
/// let creds = Credentials::new("admin@careerlink.test", "hunter2");
///
/// let bytes = codec.encode(&creds).unwrap();
/// let decoded: Credentials = codec.decode(&bytes).unwrap();
/// assert_eq!(creds, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
