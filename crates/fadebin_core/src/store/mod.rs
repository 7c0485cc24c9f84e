//! Paste persistence: bounded retry, corruption repair, and the storage
//! strategy selected at process start.

/// Key-value backend trait and in-memory fallback.
pub mod backend;
/// Remote HTTP key-value client.
pub mod remote;

pub use backend::{BackendError, KvBackend, MemoryKv};
pub use remote::RemoteKv;

use crate::config::Config;
use crate::constants::{STORE_RETRY_ATTEMPTS, STORE_RETRY_BACKOFF_MS};
use crate::error::AppError;
use crate::models::paste::Paste;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Which storage strategy the process selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Remote,
    Memory,
}

impl StoreKind {
    /// Stable label for logs and the liveness endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Memory => "memory",
        }
    }
}

/// Record-granularity persistence over a key-value backend.
///
/// Every operation is idempotent per identifier and wrapped in bounded retry
/// with linearly growing backoff. The strategy behind the adapter is chosen
/// once, at construction, and held for the process lifetime.
pub struct PasteStore {
    backend: Arc<dyn KvBackend>,
    kind: StoreKind,
}

impl PasteStore {
    /// Select a storage strategy for the process lifetime.
    ///
    /// A configured remote URL is probed once; an unreachable remote falls
    /// back to the in-process map so the service stays available.
    ///
    /// # Returns
    /// A store bound to the selected backend.
    pub async fn connect(config: &Config) -> Self {
        if let Some(url) = config.store_url.as_deref() {
            match RemoteKv::new(url, config.store_token.clone()) {
                Ok(remote) => {
                    if remote.ping().await {
                        return Self::with_backend(Arc::new(remote), StoreKind::Remote);
                    }
                    tracing::warn!(
                        url,
                        "remote key-value store unreachable; falling back to in-memory store"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        url,
                        error = %err,
                        "could not build remote store client; falling back to in-memory store"
                    );
                }
            }
        }
        Self::in_memory()
    }

    /// Build a store over the process-local map.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryKv::default()), StoreKind::Memory)
    }

    /// Build a store over an explicit backend.
    ///
    /// Used by [`PasteStore::connect`] and by tests that inject failing
    /// backends.
    pub fn with_backend(backend: Arc<dyn KvBackend>, kind: StoreKind) -> Self {
        Self { backend, kind }
    }

    /// The strategy this store was built with.
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        key: &str,
        mut call: F,
    ) -> Result<T, BackendError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < STORE_RETRY_ATTEMPTS => {
                    tracing::debug!(
                        operation,
                        key,
                        attempt,
                        error = %err,
                        "transient store failure; retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(
                        STORE_RETRY_BACKOFF_MS * u64::from(attempt),
                    ))
                    .await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Persist a record, overwriting any prior value.
    ///
    /// # Errors
    /// Returns [`AppError::Storage`] after retry exhaustion; a failed write is
    /// never silently dropped.
    pub async fn save(&self, id: &str, paste: &Paste) -> Result<(), AppError> {
        let payload = serde_json::to_string(paste)?;
        self.with_retry("set", id, || self.backend.set(id, &payload))
            .await
            .map_err(|err| {
                tracing::error!(id, error = %err, "paste save failed after retries");
                AppError::Storage(format!("save of '{id}' failed: {err}"))
            })
    }

    /// Load a record.
    ///
    /// Read-retry exhaustion degrades to absence (a failed read is
    /// operationally a missing record). A payload that exists but no longer
    /// parses is corruption: the key is deleted and the record reported
    /// missing, never surfaced as a distinct error.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found and intact, otherwise `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`AppError::Storage`] only when corruption cleanup itself fails.
    pub async fn load(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let raw = match self.with_retry("get", id, || self.backend.get(id)).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(id, error = %err, "paste load failed after retries; treating as missing");
                return Ok(None);
            }
        };
        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_str::<Paste>(&raw) {
            Ok(paste) => Ok(Some(paste)),
            Err(err) => {
                tracing::warn!(id, error = %err, "corrupt paste payload; deleting");
                self.delete(id).await?;
                Ok(None)
            }
        }
    }

    /// Whether a record exists, without deserializing it.
    ///
    /// Used by the identifier-collision probe; retry exhaustion degrades to
    /// "absent" like [`PasteStore::load`] does.
    pub async fn exists(&self, id: &str) -> Result<bool, AppError> {
        match self.with_retry("get", id, || self.backend.get(id)).await {
            Ok(raw) => Ok(raw.is_some()),
            Err(err) => {
                tracing::warn!(id, error = %err, "existence probe failed after retries; assuming absent");
                Ok(false)
            }
        }
    }

    /// Remove a record. Removing an absent key is a no-op success.
    ///
    /// # Errors
    /// Returns [`AppError::Storage`] after retry exhaustion; deletes are
    /// writes and their failure must surface.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.with_retry("delete", id, || self.backend.delete(id))
            .await
            .map_err(|err| {
                tracing::error!(id, error = %err, "paste delete failed after retries");
                AppError::Storage(format!("delete of '{id}' failed: {err}"))
            })
    }
}

#[cfg(test)]
mod tests;
