//! Unit tests for the persistence adapter: retry, corruption repair, copies.

use super::backend::{BackendError, KvBackend, MemoryKv};
use super::{PasteStore, StoreKind};
use crate::models::paste::Paste;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Backend that fails the first `failures` calls of each operation kind, then
/// delegates to an in-memory store.
#[derive(Default)]
struct FlakyKv {
    inner: MemoryKv,
    get_failures: AtomicU32,
    set_failures: AtomicU32,
    delete_failures: AtomicU32,
}

impl FlakyKv {
    fn failing_sets(failures: u32) -> Self {
        let kv = Self::default();
        kv.set_failures.store(failures, Ordering::SeqCst);
        kv
    }

    fn failing_gets(failures: u32) -> Self {
        let kv = Self::default();
        kv.get_failures.store(failures, Ordering::SeqCst);
        kv
    }

    fn failing_deletes(failures: u32) -> Self {
        let kv = Self::default();
        kv.delete_failures.store(failures, Ordering::SeqCst);
        kv
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok()
    }
}

#[async_trait]
impl KvBackend for FlakyKv {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        if Self::take_failure(&self.get_failures) {
            return Err(BackendError::Unreachable("injected get failure".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        if Self::take_failure(&self.set_failures) {
            return Err(BackendError::Unreachable("injected set failure".into()));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        if Self::take_failure(&self.delete_failures) {
            return Err(BackendError::Unreachable("injected delete failure".into()));
        }
        self.inner.delete(key).await
    }
}

fn memory_store() -> (PasteStore, Arc<MemoryKv>) {
    let backend = Arc::new(MemoryKv::default());
    let store = PasteStore::with_backend(backend.clone(), StoreKind::Memory);
    (store, backend)
}

fn sample_paste() -> Paste {
    Paste::new("sample content".to_string(), 1_000, Some(60), Some(3))
}

#[tokio::test]
async fn save_load_delete_round_trip() {
    let (store, _backend) = memory_store();
    let paste = sample_paste();

    store.save("abc", &paste).await.unwrap();
    let loaded = store.load("abc").await.unwrap().expect("stored paste");
    assert_eq!(loaded.content, "sample content");
    assert_eq!(loaded.remaining_views, Some(3));

    store.delete("abc").await.unwrap();
    assert!(store.load("abc").await.unwrap().is_none());

    // Idempotent: deleting again is a no-op success.
    store.delete("abc").await.unwrap();
}

#[tokio::test]
async fn loads_hand_out_independent_copies() {
    let (store, _backend) = memory_store();
    store.save("abc", &sample_paste()).await.unwrap();

    let mut first = store.load("abc").await.unwrap().unwrap();
    first.content.push_str(" mutated");
    first.remaining_views = Some(0);

    let second = store.load("abc").await.unwrap().unwrap();
    assert_eq!(second.content, "sample content");
    assert_eq!(second.remaining_views, Some(3));
}

#[tokio::test]
async fn corrupt_payload_is_deleted_and_reported_missing() {
    let (store, backend) = memory_store();
    backend.set("abc", "{ not json").await.unwrap();

    assert!(store.load("abc").await.unwrap().is_none());
    // The repair leaves no trace behind.
    assert_eq!(backend.get("abc").await.unwrap(), None);
    assert!(store.load("abc").await.unwrap().is_none());
}

#[tokio::test]
async fn save_retries_transient_failures_silently() {
    let backend = Arc::new(FlakyKv::failing_sets(2));
    let store = PasteStore::with_backend(backend.clone(), StoreKind::Memory);

    store.save("abc", &sample_paste()).await.unwrap();
    assert!(backend.inner.get("abc").await.unwrap().is_some());
}

#[tokio::test]
async fn save_surfaces_storage_error_after_retry_exhaustion() {
    let backend = Arc::new(FlakyKv::failing_sets(10));
    let store = PasteStore::with_backend(backend, StoreKind::Memory);

    let err = store.save("abc", &sample_paste()).await.unwrap_err();
    assert!(matches!(err, crate::AppError::Storage(_)), "got {:?}", err);
}

#[tokio::test]
async fn load_retry_exhaustion_degrades_to_absent() {
    let backend = Arc::new(FlakyKv::failing_gets(10));
    backend.inner.set("abc", "ignored").await.unwrap();
    let store = PasteStore::with_backend(backend, StoreKind::Memory);

    assert!(store.load("abc").await.unwrap().is_none());
}

#[tokio::test]
async fn load_recovers_within_the_retry_bound() {
    let backend = Arc::new(FlakyKv::failing_gets(2));
    let store = PasteStore::with_backend(backend.clone(), StoreKind::Memory);
    store.save("abc", &sample_paste()).await.unwrap();

    assert!(store.load("abc").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_surfaces_storage_error_after_retry_exhaustion() {
    let backend = Arc::new(FlakyKv::failing_deletes(10));
    backend.inner.set("abc", "value").await.unwrap();
    let store = PasteStore::with_backend(backend, StoreKind::Memory);

    let err = store.delete("abc").await.unwrap_err();
    assert!(matches!(err, crate::AppError::Storage(_)), "got {:?}", err);
}

#[tokio::test]
async fn exists_reports_presence_without_deserializing() {
    let (store, backend) = memory_store();
    assert!(!store.exists("abc").await.unwrap());

    // Even a payload that would fail to parse counts as "taken".
    backend.set("abc", "{ not json").await.unwrap();
    assert!(store.exists("abc").await.unwrap());
}

#[tokio::test]
async fn in_memory_constructor_reports_its_kind() {
    let store = PasteStore::in_memory();
    assert_eq!(store.kind(), StoreKind::Memory);
    assert_eq!(store.kind().as_str(), "memory");
}
