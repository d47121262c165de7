use sha2::{Digest, Sha256};

/// Deterministic content fingerprint for stable display keys.
///
/// Returns the first 16 bytes of the SHA-256 digest as 32 hex characters.
/// At that width an accidental collision needs on the order of 2^64 distinct
/// inputs, far beyond any client-resident collection; equal inputs always
/// produce equal keys across sessions.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}
