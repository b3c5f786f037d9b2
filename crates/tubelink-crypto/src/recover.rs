//! Recoverable signature bundles.
//!
//! A bundle is the byte concatenation of N signatures, each exactly
//! [`SIGNATURE_WIDTH`] bytes: `r(32) || s(32) || v(1)`. The recovery id `v`
//! is accepted both raw (0/1) and with the legacy 27 offset.
//!
//! Signer identity is derived the usual way: Keccak-256 of the uncompressed
//! public key, last 20 bytes.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use tubelink_types::{constants::SIGNATURE_WIDTH, Address, Result, TubeError, WithdrawalKey};

use crate::hash::keccak256;

/// The 20-byte address of a verifying key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag.
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    Address(addr)
}

/// Recover the signer of one 65-byte signature over `message`.
///
/// Returns `None` when the signature does not decode or recovery fails
/// (e.g. an all-zero placeholder signature).
#[must_use]
pub fn recover_signer(message: &WithdrawalKey, sig: &[u8]) -> Option<Address> {
    if sig.len() != SIGNATURE_WIDTH {
        return None;
    }
    let signature = Signature::from_slice(&sig[..64]).ok()?;
    let v = sig[64];
    let recovery = RecoveryId::from_byte(if v >= 27 { v - 27 } else { v })?;
    let key = VerifyingKey::recover_from_prehash(message.as_bytes(), &signature, recovery).ok()?;
    Some(address_of(&key))
}

/// Split `bundle` into individual signatures and recover each signer,
/// preserving bundle order.
///
/// # Errors
/// - [`TubeError::InvalidSignatureLength`] if the bundle is empty or not a
///   multiple of [`SIGNATURE_WIDTH`].
/// - [`TubeError::InvalidValidator`] with the null identity if any entry is
///   unrecoverable; such an entry can never name a real validator.
pub fn recover_signers(message: &WithdrawalKey, bundle: &[u8]) -> Result<Vec<Address>> {
    if bundle.is_empty() || bundle.len() % SIGNATURE_WIDTH != 0 {
        return Err(TubeError::InvalidSignatureLength);
    }
    bundle
        .chunks_exact(SIGNATURE_WIDTH)
        .map(|sig| {
            recover_signer(message, sig).ok_or(TubeError::InvalidValidator(Address::ZERO))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Signer;

    fn message() -> WithdrawalKey {
        WithdrawalKey(keccak256(b"withdrawal under test"))
    }

    #[test]
    fn recovers_the_signing_address() {
        let signer = Signer::from_seed([7u8; 32]);
        let msg = message();
        let sig = signer.sign(&msg);
        assert_eq!(recover_signer(&msg, &sig), Some(signer.address()));
    }

    #[test]
    fn different_message_recovers_different_address() {
        let signer = Signer::from_seed([7u8; 32]);
        let sig = signer.sign(&message());
        let other = WithdrawalKey(keccak256(b"some other withdrawal"));
        let recovered = recover_signer(&other, &sig);
        assert_ne!(recovered, Some(signer.address()));
    }

    #[test]
    fn legacy_v_offset_accepted() {
        let signer = Signer::from_seed([9u8; 32]);
        let msg = message();
        let mut sig = signer.sign(&msg);
        sig[64] += 27;
        assert_eq!(recover_signer(&msg, &sig), Some(signer.address()));
    }

    #[test]
    fn zero_signature_is_unrecoverable() {
        assert_eq!(recover_signer(&message(), &[0u8; 65]), None);
    }

    #[test]
    fn bundle_order_preserved() {
        let a = Signer::from_seed([1u8; 32]);
        let b = Signer::from_seed([2u8; 32]);
        let msg = message();
        let mut bundle = Vec::new();
        bundle.extend_from_slice(&b.sign(&msg));
        bundle.extend_from_slice(&a.sign(&msg));
        let signers = recover_signers(&msg, &bundle).unwrap();
        assert_eq!(signers, vec![b.address(), a.address()]);
    }

    #[test]
    fn empty_bundle_rejected() {
        let err = recover_signers(&message(), &[]).unwrap_err();
        assert!(matches!(err, TubeError::InvalidSignatureLength));
    }

    #[test]
    fn ragged_bundle_rejected() {
        let err = recover_signers(&message(), &[0u8; 64]).unwrap_err();
        assert!(matches!(err, TubeError::InvalidSignatureLength));
    }

    #[test]
    fn unrecoverable_entry_surfaces_null_identity() {
        let err = recover_signers(&message(), &[0u8; 65]).unwrap_err();
        assert!(matches!(err, TubeError::InvalidValidator(addr) if addr.is_zero()));
    }
}
