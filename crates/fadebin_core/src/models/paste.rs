//! Paste record and API payload types.

use serde::{Deserialize, Serialize};

/// The persisted paste record.
///
/// Serialized as JSON; this shape is the durable storage contract and any
/// backend substituted underneath must round-trip it exactly. All timestamps
/// are milliseconds since the Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
    pub content: String,
    pub created_at: i64,
    pub expires_at: Option<i64>,
    pub max_views: Option<u32>,
    /// Mirrors `max_views` at creation and counts down on counted fetches.
    /// `None` means unlimited and is never decremented.
    pub remaining_views: Option<u32>,
    /// Total successful counted fetches. Observability only; lifecycle
    /// decisions never consult it.
    pub view_count: u64,
}

impl Paste {
    /// Build a fresh record created at `now`.
    ///
    /// # Arguments
    /// - `content`: Paste payload, stored as submitted.
    /// - `now`: Creation timestamp in ms.
    /// - `ttl_seconds`: Optional validated time-to-live.
    /// - `max_views`: Optional validated view budget.
    ///
    /// # Returns
    /// A new [`Paste`] with `remaining_views` mirroring `max_views`.
    pub fn new(content: String, now: i64, ttl_seconds: Option<i64>, max_views: Option<u32>) -> Self {
        Self {
            content,
            created_at: now,
            expires_at: ttl_seconds.map(|ttl| now + ttl * 1000),
            max_views,
            remaining_views: max_views,
            view_count: 0,
        }
    }

    /// Whether the record is expired at `now`.
    ///
    /// The comparison is inclusive: a record expires at the exact instant it
    /// reaches its expiry timestamp, not only strictly after.
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }
}

/// Validated creation input handed to the lifecycle layer.
///
/// `ttl_seconds` and `max_views` are kept wide here; range checks happen in
/// the lifecycle layer so every violation reports its field.
#[derive(Debug, Clone, Default)]
pub struct CreateParams {
    pub content: String,
    pub ttl_seconds: Option<i64>,
    pub max_views: Option<i64>,
}

/// Response payload for a successful creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPaste {
    pub id: String,
    pub created_at: i64,
    pub expires_at: Option<i64>,
    pub max_views: Option<u32>,
}

/// Response payload for a counted fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewedPaste {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<i64>,
}

/// Response payload for a metadata fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteDetails {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<i64>,
    pub created_at: i64,
}
