//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
use std::env;

/// Runtime configuration for Fadebin.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the remote key-value store. `None` selects the in-memory
    /// strategy without probing anything.
    pub store_url: Option<String>,
    /// Optional bearer token for the remote key-value store.
    pub store_token: Option<String>,
    pub max_paste_size: usize,
    /// Enables the deterministic time override channel.
    pub test_mode: bool,
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
///
/// # Arguments
/// - `name`: Environment variable name.
///
/// # Returns
/// `true` when the value is a recognized truthy value.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            store_url: env::var("STORE_URL").ok().and_then(non_empty),
            store_token: env::var("STORE_TOKEN").ok().and_then(non_empty),
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            test_mode: env_flag_enabled("TEST_MODE"),
        }
    }
}
