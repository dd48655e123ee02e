//! Durable storage for the bearer token.
//!
//! The session layer doesn't care WHERE the token lives. It needs
//! something that implements [`TokenStore`]: a single key-value entry,
//! key `token`, absent when logged out.
//!
//! - [`MemoryTokenStore`] for tests and for hosts that persist elsewhere.
//! - [`FileTokenStore`] for a JSON file on disk, the native equivalent of
//!   browser local storage.
//!
//! The trait is synchronous, like local storage. The file store does a
//! small blocking read or write per call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use careerlink_protocol::{Codec, JsonCodec};

use crate::StoreError;

/// The key the token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Persists the bearer token across restarts.
///
/// `Send + Sync + 'static` → the store lives inside the session manager,
/// which is shared across tokio tasks.
pub trait TokenStore: Send + Sync + 'static {
    /// Returns the persisted token, or `None` if logged out.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persists `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Removes the persisted token. Removing an absent token is not an
    /// error.
    fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// A [`TokenStore`] that keeps the token in process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`, as if a previous run had
    /// saved it.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// A [`TokenStore`] backed by a JSON object file, e.g.
/// `{"token": "abc123"}`.
///
/// Other keys in the file are preserved. When the last key is removed the
/// file is deleted, so a logged-out client leaves nothing behind. Writes
/// go to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    codec: JsonCodec,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codec: JsonCodec,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        Ok(self.codec.decode(&data)?)
    }

    fn write_entries(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let bytes = self.codec.encode(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(TOKEN_KEY))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "persisted token removed");
        Ok(())
    }
}
