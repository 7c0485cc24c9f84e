//! Data models for API payloads and persistence.

/// Paste record and API payload types.
pub mod paste;
