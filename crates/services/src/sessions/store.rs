use std::sync::Arc;

use quiz_core::model::{SessionSnapshot, SessionState};
use storage::repository::{KeyValueStore, StorageError};

/// Storage key for the persisted session blob.
///
/// The suffix is bumped whenever the blob format changes incompatibly, so
/// stale data under an old key is simply never read again.
pub const SESSION_STATE_KEY: &str = "quiz_state_v1";

/// Reads and writes the single persisted session blob.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: SESSION_STATE_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw persisted blob, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load_blob(&self) -> Result<Option<String>, StorageError> {
        self.kv.get(&self.key).await
    }

    /// Replace the persisted blob with the full session state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save(&self, state: &SessionState) -> Result<(), StorageError> {
        let blob = encode(&state.snapshot())?;
        self.kv.put(&self.key, &blob).await
    }

    /// Remove the persisted blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(&self.key).await
    }
}

/// Serialize a snapshot into the persisted JSON form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode(snapshot: &SessionSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Parse a persisted blob. Structural checks against the catalog happen later.
///
/// # Errors
///
/// Returns the JSON error for malformed or mistyped blobs.
pub fn decode(blob: &str) -> Result<SessionSnapshot, serde_json::Error> {
    serde_json::from_str(blob)
}
