//! Shared constants used across Fadebin crates.

/// Default API port for Fadebin.
pub const DEFAULT_PORT: u16 = 38422;

/// Default maximum paste content size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Upper bound for `ttl_seconds` (one year).
pub const MAX_TTL_SECONDS: i64 = 31_536_000;

/// Upper bound for `max_views`.
pub const MAX_VIEW_LIMIT: i64 = 1_000_000;

/// Length of generated paste identifiers.
pub const ID_LENGTH: usize = 10;

/// Longest identifier accepted on fetch paths. Anything longer can never have
/// been issued and is rejected before reaching storage.
pub const MAX_ID_LENGTH: usize = 100;

/// Attempts allowed when allocating a fresh identifier.
pub const ID_ALLOC_ATTEMPTS: usize = 10;

/// Attempts allowed per storage operation before giving up.
pub const STORE_RETRY_ATTEMPTS: u32 = 3;

/// Base backoff between storage retries; the delay grows linearly per attempt.
pub const STORE_RETRY_BACKOFF_MS: u64 = 50;
