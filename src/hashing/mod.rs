//! BLAKE3 fingerprints for generated artifacts.

/// Full 32-byte BLAKE3 hash of `data`.
#[inline]
pub fn hash_artifact(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Lowercase hex BLAKE3 digest of `data` (64 characters).
pub fn digest_hex(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// First `len` hex characters of a digest, for display.
pub fn short_digest(digest: &str, len: usize) -> &str {
    digest.get(..len).unwrap_or(digest)
}
