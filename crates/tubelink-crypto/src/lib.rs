//! # tubelink-crypto
//!
//! Deterministic withdrawal-key derivation and recoverable signature-bundle
//! decoding for the Tubelink settlement engine.
//!
//! - [`derive_withdrawal_key`] / [`concat_keys`]: Keccak-256 over the
//!   canonical byte encoding of the withdrawal parameters. Pure functions:
//!   the same inputs always produce the same key.
//! - [`recover_signers`]: splits a concatenated `r || s || v` signature blob
//!   and recovers the 20-byte signer address of each entry via secp256k1
//!   public-key recovery.
//!
//! Membership, duplicate, and quorum checks live in `tubelink-engine`; this
//! crate knows nothing about validator sets.

pub mod hash;
pub mod keys;
pub mod recover;

#[cfg(any(test, feature = "test-helpers"))]
pub mod signer;

pub use hash::keccak256;
pub use keys::{concat_keys, derive_withdrawal_key};
pub use recover::{recover_signer, recover_signers};

#[cfg(any(test, feature = "test-helpers"))]
pub use signer::Signer;
