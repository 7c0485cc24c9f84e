//! Core domain library for Fadebin (config, storage, paste lifecycle).

/// Wall-clock access with a deterministic override for tests.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across Fadebin crates.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Per-identifier serialization locks.
pub mod locks;
/// Data models for API payloads and persistence.
pub mod models;
/// Paste identifier generation.
pub mod naming;
/// Paste lifecycle operations.
pub mod paste_ops;
/// Persistence adapter and storage strategies.
pub mod store;

pub use clock::Clock;
pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use error::AppError;
pub use paste_ops::PasteService;
pub use store::{PasteStore, StoreKind};
