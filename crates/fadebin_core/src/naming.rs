//! Paste identifier generation and shape checks.

use crate::constants::{ID_LENGTH, MAX_ID_LENGTH};
use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random base62 paste identifier.
///
/// Ten characters over a 62-symbol alphabet give ~8e17 combinations, so a
/// single generation colliding with an existing paste is astronomically
/// unlikely; callers still confirm against storage before committing.
///
/// # Returns
/// A freshly generated identifier of [`ID_LENGTH`] characters.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Cheap shape check applied before any storage round trip.
///
/// Empty or over-length identifiers can never have been issued, so fetch
/// paths treat them as missing without asking the backend.
///
/// # Returns
/// `true` when `id` is non-empty and at most [`MAX_ID_LENGTH`] characters.
pub fn plausible_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LENGTH
}
