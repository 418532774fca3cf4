//! Deterministic pseudo-random word derivation for the oracle simulator.
//!
//! Uses HMAC-SHA256 keyed by the simulator's secret to produce a 32-byte
//! base output that is deterministic (same inputs = same output) but
//! unpredictable without the secret, then expands it into as many words as
//! the request asked for.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Compute the 32-byte base randomness for a request.
///
/// ```text
/// base = HMAC-SHA256(secret, request_id_le || nonce_le)
/// ```
///
/// The `nonce` is the simulator's per-request counter snapshotted at
/// request time, so two requests that somehow shared an id would still
/// derive different outputs.
pub fn compute_base_randomness(hmac_secret: &[u8], request_id: u64, nonce: u64) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(hmac_secret).expect("HMAC accepts keys of any size");

    mac.update(&request_id.to_le_bytes());
    mac.update(&nonce.to_le_bytes());

    let bytes = mac.finalize().into_bytes();

    let mut output = [0u8; 32];
    output.copy_from_slice(&bytes);
    output
}

/// Expand base randomness into multiple words: `word[i] = SHA256(base || i_le)`.
pub fn expand_randomness(base: &[u8; 32], num_words: u32) -> Vec<[u8; 32]> {
    let mut words = Vec::with_capacity(num_words as usize);
    for i in 0..num_words {
        let mut hasher = Sha256::new();
        hasher.update(base);
        hasher.update(i.to_le_bytes());
        let hash = hasher.finalize();
        let mut word = [0u8; 32];
        word.copy_from_slice(&hash);
        words.push(word);
    }
    words
}

/// Fold a 32-byte word into a `u64` by reading its first 8 bytes
/// little-endian. Bias from the fold is negligible at 2^64 range.
pub fn word_to_u64(word: &[u8; 32]) -> u64 {
    u64::from_le_bytes(word[0..8].try_into().expect("slice is 8 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_inputs() {
        let secret = b"test-secret";

        let r1 = compute_base_randomness(secret, 0, 0);
        let r2 = compute_base_randomness(secret, 0, 0);
        assert_eq!(r1, r2);
    }

    #[test]
    fn different_for_different_ids() {
        let secret = b"test-secret";

        let r1 = compute_base_randomness(secret, 0, 0);
        let r2 = compute_base_randomness(secret, 1, 0);
        assert_ne!(r1, r2);
    }

    #[test]
    fn different_for_different_nonces() {
        let secret = b"test-secret";

        let r1 = compute_base_randomness(secret, 0, 0);
        let r2 = compute_base_randomness(secret, 0, 1);
        assert_ne!(r1, r2);
    }

    #[test]
    fn expansion_yields_distinct_words() {
        let base = compute_base_randomness(b"test-secret", 42, 0);
        let words = expand_randomness(&base, 3);

        assert_eq!(words.len(), 3);
        assert_ne!(words[0], words[1]);
        assert_ne!(words[1], words[2]);
    }

    #[test]
    fn fold_reads_first_eight_bytes_le() {
        let mut word = [0u8; 32];
        word[0] = 7;
        assert_eq!(word_to_u64(&word), 7);

        word[1] = 1;
        assert_eq!(word_to_u64(&word), 263);
    }
}
