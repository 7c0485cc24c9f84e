//! Key-value backend trait and the process-local fallback store.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

/// Transient failure talking to a key-value backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, timeout, body read).
    #[error("key-value backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with something other than success or absence.
    #[error("key-value backend returned status {0}")]
    Status(u16),
}

/// Uniform get/set/delete over string keys and payloads.
///
/// Implementations hand owned values across the boundary in both directions,
/// so a caller mutating a returned payload can never affect the stored copy
/// or another caller's view.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read a key. Absence is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Write a key, overwriting any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BackendError>;
}

/// Process-local fallback store used when no remote backend is reachable.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
