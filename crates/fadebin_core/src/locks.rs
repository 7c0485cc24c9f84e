//! Per-identifier serialization locks for storage read-modify-write sequences.
//!
//! The key-value backend offers no compare-and-swap, so counted fetches are
//! linearized per paste id: the whole load / decide / persist-or-delete
//! sequence runs under that id's exclusive lock. Locks for distinct ids never
//! contend.

use crate::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Hands out per-identifier async mutexes, dropping table entries once no
/// task holds or waits on them.
#[derive(Default, Clone)]
pub struct IdLockTable {
    inner: LockMap,
}

/// Exclusive hold on one paste id.
///
/// Dropping releases the id and removes the table entry when no other task is
/// waiting on it, so the table never grows with the id space.
pub struct IdLockGuard {
    table: LockMap,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl IdLockTable {
    /// Acquire the exclusive lock for `id`, waiting behind current holders.
    ///
    /// # Returns
    /// A guard that releases the id when dropped.
    ///
    /// # Errors
    /// Returns [`AppError::Internal`] when the lock table is poisoned.
    pub async fn acquire(&self, id: &str) -> Result<IdLockGuard, AppError> {
        let entry = {
            let mut map = self.inner.lock().map_err(|_| AppError::Internal)?;
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = entry.lock_owned().await;
        Ok(IdLockGuard {
            table: self.inner.clone(),
            id: id.to_string(),
            guard: Some(guard),
        })
    }

    /// Number of ids with a live table entry. Used by tests to verify cleanup.
    pub fn entry_count(&self) -> usize {
        self.inner.lock().map(|map| map.len()).unwrap_or(0)
    }
}

impl Drop for IdLockGuard {
    fn drop(&mut self) {
        self.guard.take();
        let Ok(mut map) = self.table.lock() else {
            return;
        };
        if let Some(entry) = map.get(self.id.as_str()) {
            // Waiters hold their own clone of the entry, so a strong count of
            // one means nobody else can reach this mutex anymore.
            if Arc::strong_count(entry) == 1 {
                map.remove(self.id.as_str());
            }
        }
    }
}
