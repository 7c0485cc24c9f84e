//! Paste lifecycle: creation, counted fetches, and expiry accounting.
//!
//! All mutation of a stored record happens here, under that record's
//! per-identifier lock, so overlapping requests can never both act on the
//! same pre-decrement view budget.

use crate::constants::{ID_ALLOC_ATTEMPTS, MAX_TTL_SECONDS, MAX_VIEW_LIMIT};
use crate::error::AppError;
use crate::locks::IdLockTable;
use crate::models::paste::{CreateParams, CreatedPaste, Paste, PasteDetails, ViewedPaste};
use crate::naming;
use crate::store::PasteStore;
use std::sync::Arc;

type IdSource = Arc<dyn Fn() -> String + Send + Sync>;

/// Coordinates validation, identifier allocation, and the atomic
/// view-decrement protocol over the paste store.
pub struct PasteService {
    store: Arc<PasteStore>,
    locks: IdLockTable,
    id_source: IdSource,
    max_paste_size: usize,
}

impl PasteService {
    /// Build a service over `store` using the default identifier generator.
    pub fn new(store: Arc<PasteStore>, max_paste_size: usize) -> Self {
        Self::with_id_source(store, max_paste_size, Arc::new(naming::generate_id))
    }

    /// Build a service with a custom identifier source.
    ///
    /// Useful for embedders with their own id scheme and for tests that force
    /// collisions.
    pub fn with_id_source(
        store: Arc<PasteStore>,
        max_paste_size: usize,
        id_source: IdSource,
    ) -> Self {
        Self {
            store,
            locks: IdLockTable::default(),
            id_source,
            max_paste_size,
        }
    }

    /// Create a paste from validated-for-type input.
    ///
    /// Range and content validation run first and leave no side effects on
    /// failure. Identifier allocation retries generation up to
    /// [`ID_ALLOC_ATTEMPTS`] times; the existence probe and the insert are
    /// serialized per candidate id, so a concurrent creation of the same
    /// candidate cannot slip in between them.
    ///
    /// # Arguments
    /// - `params`: Creation input (content plus optional ttl/view budget).
    /// - `now`: Resolved creation timestamp in ms.
    ///
    /// # Returns
    /// The identifier and creation metadata of the stored paste.
    ///
    /// # Errors
    /// [`AppError::Validation`] for bad input, [`AppError::IdExhausted`] when
    /// allocation keeps colliding, [`AppError::Storage`] when the final write
    /// fails.
    pub async fn create(&self, params: CreateParams, now: i64) -> Result<CreatedPaste, AppError> {
        self.validate_content(&params.content)?;
        let ttl_seconds = validate_ttl(params.ttl_seconds)?;
        let max_views = validate_max_views(params.max_views)?;

        let paste = Paste::new(params.content, now, ttl_seconds, max_views);
        for _ in 0..ID_ALLOC_ATTEMPTS {
            let id = (self.id_source)();
            let _guard = self.locks.acquire(&id).await?;
            if self.store.exists(&id).await? {
                tracing::debug!(id = %id, "generated id already taken; retrying");
                continue;
            }
            self.store.save(&id, &paste).await?;
            return Ok(CreatedPaste {
                id,
                created_at: paste.created_at,
                expires_at: paste.expires_at,
                max_views: paste.max_views,
            });
        }
        tracing::error!("exhausted id allocation attempts");
        Err(AppError::IdExhausted)
    }

    /// Fetch a paste, consuming one view from its budget.
    ///
    /// The load / decide / persist-or-delete sequence runs under the
    /// identifier's exclusive lock: two racing calls on a one-view paste see
    /// exactly one success. Expiry is evaluated lazily here, with an
    /// inclusive boundary, and deletes the record as part of the evaluation.
    ///
    /// # Arguments
    /// - `id`: Paste identifier.
    /// - `now`: Resolved evaluation timestamp in ms.
    ///
    /// # Returns
    /// Content plus the post-decrement `remaining_views` and `expires_at`.
    ///
    /// # Errors
    /// [`AppError::NotFound`] for unknown, expired, or exhausted pastes (and
    /// for implausible identifiers, without a storage round trip);
    /// [`AppError::Storage`] when the decrement cannot be persisted.
    pub async fn fetch_counted(&self, id: &str, now: i64) -> Result<ViewedPaste, AppError> {
        if !naming::plausible_id(id) {
            return Err(AppError::NotFound);
        }
        let _guard = self.locks.acquire(id).await?;
        let Some(mut paste) = self.store.load(id).await? else {
            return Err(AppError::NotFound);
        };
        if paste.is_expired(now) {
            self.store.delete(id).await?;
            return Err(AppError::NotFound);
        }

        let remaining_views = match paste.remaining_views {
            None => {
                paste.view_count += 1;
                self.store.save(id, &paste).await?;
                None
            }
            // Exhausted records are deleted in the same step that drains
            // them, so this branch only fires if that delete was lost.
            Some(0) => {
                tracing::warn!(id, "exhausted paste still stored; deleting");
                self.store.delete(id).await?;
                return Err(AppError::NotFound);
            }
            Some(views) => {
                let left = views - 1;
                paste.view_count += 1;
                if left == 0 {
                    // Terminal view: the record goes away, no final save.
                    self.store.delete(id).await?;
                } else {
                    paste.remaining_views = Some(left);
                    self.store.save(id, &paste).await?;
                }
                Some(left)
            }
        };

        Ok(ViewedPaste {
            content: paste.content,
            remaining_views,
            expires_at: paste.expires_at,
        })
    }

    /// Fetch a paste without consuming its view budget.
    ///
    /// Shares the identifier, expiry, and exhaustion checks with
    /// [`PasteService::fetch_counted`] but performs no decrement and no
    /// persistence; re-rendering a share page costs nothing.
    ///
    /// # Arguments
    /// - `id`: Paste identifier.
    /// - `now`: Resolved evaluation timestamp in ms.
    ///
    /// # Returns
    /// Content plus unchanged `remaining_views`, `expires_at`, `created_at`.
    ///
    /// # Errors
    /// [`AppError::NotFound`] for unknown, expired, or exhausted pastes.
    pub async fn fetch_metadata(&self, id: &str, now: i64) -> Result<PasteDetails, AppError> {
        if !naming::plausible_id(id) {
            return Err(AppError::NotFound);
        }
        let _guard = self.locks.acquire(id).await?;
        let Some(paste) = self.store.load(id).await? else {
            return Err(AppError::NotFound);
        };
        if paste.is_expired(now) {
            self.store.delete(id).await?;
            return Err(AppError::NotFound);
        }
        if let Some(0) = paste.remaining_views {
            tracing::warn!(id, "exhausted paste still stored; deleting");
            self.store.delete(id).await?;
            return Err(AppError::NotFound);
        }

        Ok(PasteDetails {
            content: paste.content,
            remaining_views: paste.remaining_views,
            expires_at: paste.expires_at,
            created_at: paste.created_at,
        })
    }

    fn validate_content(&self, content: &str) -> Result<(), AppError> {
        if content.trim().is_empty() {
            return Err(AppError::validation("content", "must be a non-empty string"));
        }
        if content.len() > self.max_paste_size {
            return Err(AppError::validation(
                "content",
                format!("must not exceed {} bytes", self.max_paste_size),
            ));
        }
        Ok(())
    }
}

fn validate_ttl(ttl_seconds: Option<i64>) -> Result<Option<i64>, AppError> {
    match ttl_seconds {
        None => Ok(None),
        Some(value) if (1..=MAX_TTL_SECONDS).contains(&value) => Ok(Some(value)),
        Some(_) => Err(AppError::validation(
            "ttl_seconds",
            format!("must be an integer between 1 and {MAX_TTL_SECONDS}"),
        )),
    }
}

fn validate_max_views(max_views: Option<i64>) -> Result<Option<u32>, AppError> {
    match max_views {
        None => Ok(None),
        Some(value) if (1..=MAX_VIEW_LIMIT).contains(&value) => Ok(Some(value as u32)),
        Some(_) => Err(AppError::validation(
            "max_views",
            format!("must be an integer between 1 and {MAX_VIEW_LIMIT}"),
        )),
    }
}
