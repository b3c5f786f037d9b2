//! Keccak-256, the digest the bridge wire format is built on.

use sha3::{Digest, Keccak256};

/// Keccak-256 digest of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
