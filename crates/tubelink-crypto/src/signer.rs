//! Deterministic test signer. **Never use in production**: real validator
//! keys live off-engine.

use k256::ecdsa::SigningKey;
use tubelink_types::{constants::SIGNATURE_WIDTH, Address, WithdrawalKey};

use crate::recover::address_of;

/// A secp256k1 signer with a fixed seed, for tests and fixtures.
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    /// Build a signer from a 32-byte scalar seed.
    ///
    /// # Panics
    /// Panics if the seed is not a valid secp256k1 scalar (zero or >= the
    /// group order). Fixed low-valued test seeds are always valid.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_slice(&seed).expect("test seed must be a valid scalar");
        Self { key }
    }

    /// The signer's 20-byte identity.
    #[must_use]
    pub fn address(&self) -> Address {
        address_of(self.key.verifying_key())
    }

    /// Sign a withdrawal key, producing the 65-byte `r || s || v` wire form.
    #[must_use]
    pub fn sign(&self, message: &WithdrawalKey) -> [u8; SIGNATURE_WIDTH] {
        let (signature, recovery) = self
            .key
            .sign_prehash_recoverable(message.as_bytes())
            .expect("prehash signing cannot fail on a 32-byte digest");
        let mut out = [0u8; SIGNATURE_WIDTH];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery.to_byte();
        out
    }
}
