//! Quorum signature verification.
//!
//! One function, identical for single and batch withdrawal; only the
//! message differs (single key vs. aggregate key):
//!
//! 1. reject a bundle whose length is not a positive multiple of one
//!    signature (in `tubelink-crypto`);
//! 2. recover each signer in bundle order;
//! 3. reject any identity outside the validator set;
//! 4. reject repeats within the bundle (single linear pass over a seen-set;
//!    bundle order is otherwise free);
//! 5. reject bundles below the two-thirds quorum threshold;
//! 6. return the recovered identities, in bundle order, for the audit trail.
//!
//! Verification mutates nothing: every failure leaves the engine untouched.

use std::collections::HashSet;

use tubelink_types::{Address, Result, TubeError, WithdrawalKey};

use crate::validator_set::ValidatorSet;

/// Verify `bundle` as a quorum attestation of `message`.
///
/// Returns the attesting identities in bundle order.
pub fn verify(
    message: &WithdrawalKey,
    bundle: &[u8],
    validators: &ValidatorSet,
) -> Result<Vec<Address>> {
    let recovered = tubelink_crypto::recover_signers(message, bundle)?;

    let mut seen = HashSet::with_capacity(recovered.len());
    for signer in &recovered {
        if !validators.contains(signer) {
            return Err(TubeError::InvalidValidator(*signer));
        }
        if !seen.insert(*signer) {
            return Err(TubeError::DuplicateValidator(*signer));
        }
    }

    if !validators.satisfies_quorum(seen.len()) {
        return Err(TubeError::InsufficientValidators {
            got: seen.len(),
            need: validators.quorum_threshold(),
        });
    }

    Ok(recovered)
}
