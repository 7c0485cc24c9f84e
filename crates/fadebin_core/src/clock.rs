//! Wall-clock access with a deterministic override for tests.

use chrono::Utc;

/// Resolves "now" for creation timestamps and expiry checks.
///
/// Constructed once at startup; the test-mode flag decides whether the
/// per-request override channel is honored at all.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    test_mode: bool,
}

impl Clock {
    /// Build a clock. `test_mode` enables the override channel.
    pub fn new(test_mode: bool) -> Self {
        Self { test_mode }
    }

    /// Current time in milliseconds since the Unix epoch.
    ///
    /// In test mode, a caller-supplied override that trims and parses as a
    /// non-negative integer replaces the wall clock. A missing, malformed, or
    /// negative override silently falls back to the wall clock; this channel
    /// never produces an error. Outside test mode the override is ignored.
    ///
    /// # Arguments
    /// - `override_raw`: Raw override value from the calling context, if any.
    ///
    /// # Returns
    /// Milliseconds since the Unix epoch.
    pub fn now_ms(&self, override_raw: Option<&str>) -> i64 {
        if self.test_mode {
            if let Some(raw) = override_raw {
                if let Ok(value) = raw.trim().parse::<i64>() {
                    if value >= 0 {
                        return value;
                    }
                }
            }
        }
        Utc::now().timestamp_millis()
    }
}
