//! Withdrawal-key derivation.
//!
//! A withdrawal key is the Keccak-256 digest of the canonical encoding of
//! the withdrawal parameters, in a fixed field order with fixed-width
//! big-endian integers:
//!
//! ```text
//! local_network(4) || home_network(4) || token(20) || sequence(8)
//!   || recipient(20) || amount(16) || payload(N)
//! ```
//!
//! The engine's own network id leads the encoding, so a quorum attestation
//! collected for one engine can never be replayed against another. The key
//! is both the anti-replay index and the message validators sign.

use tubelink_types::{Address, Amount, NetworkId, WithdrawalKey};

use crate::hash::keccak256;

/// Derive the unique key for one withdrawal.
///
/// Pure and deterministic: identical inputs always yield the identical key,
/// and changing any single field changes the key.
#[must_use]
pub fn derive_withdrawal_key(
    local_network: NetworkId,
    home_network: NetworkId,
    token: Address,
    sequence: u64,
    recipient: Address,
    amount: Amount,
    payload: &[u8],
) -> WithdrawalKey {
    let mut encoded = Vec::with_capacity(72 + payload.len());
    encoded.extend_from_slice(&local_network.to_be_bytes());
    encoded.extend_from_slice(&home_network.to_be_bytes());
    encoded.extend_from_slice(token.as_bytes());
    encoded.extend_from_slice(&sequence.to_be_bytes());
    encoded.extend_from_slice(recipient.as_bytes());
    encoded.extend_from_slice(&amount.to_be_bytes());
    encoded.extend_from_slice(payload);
    WithdrawalKey(keccak256(&encoded))
}

/// Combine an ordered sequence of withdrawal keys into one aggregate key.
///
/// Order-sensitive: permuting the input changes the result, so a single
/// signature bundle over the aggregate authenticates both batch membership
/// and batch order.
#[must_use]
pub fn concat_keys(keys: &[WithdrawalKey]) -> WithdrawalKey {
    let mut encoded = Vec::with_capacity(keys.len() * 32);
    for key in keys {
        encoded.extend_from_slice(key.as_bytes());
    }
    WithdrawalKey(keccak256(&encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_key() -> WithdrawalKey {
        derive_withdrawal_key(
            NetworkId(4690),
            NetworkId(4689),
            Address([2u8; 20]),
            0,
            Address([3u8; 20]),
            1000,
            b"",
        )
    }

    #[test]
    fn derivation_is_pure() {
        assert_eq!(base_key(), base_key());
    }

    #[test]
    fn every_field_affects_the_key() {
        let base = base_key();
        let variants = [
            derive_withdrawal_key(
                NetworkId(4691),
                NetworkId(4689),
                Address([2u8; 20]),
                0,
                Address([3u8; 20]),
                1000,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(1),
                Address([2u8; 20]),
                0,
                Address([3u8; 20]),
                1000,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(4689),
                Address([9u8; 20]),
                0,
                Address([3u8; 20]),
                1000,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(4689),
                Address([2u8; 20]),
                1,
                Address([3u8; 20]),
                1000,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(4689),
                Address([2u8; 20]),
                0,
                Address([4u8; 20]),
                1000,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(4689),
                Address([2u8; 20]),
                0,
                Address([3u8; 20]),
                1001,
                b"",
            ),
            derive_withdrawal_key(
                NetworkId(4690),
                NetworkId(4689),
                Address([2u8; 20]),
                0,
                Address([3u8; 20]),
                1000,
                b"\x01",
            ),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn concat_is_order_sensitive() {
        let k1 = WithdrawalKey([1u8; 32]);
        let k2 = WithdrawalKey([2u8; 32]);
        assert_ne!(concat_keys(&[k1, k2]), concat_keys(&[k2, k1]));
    }

    #[test]
    fn concat_differs_from_members() {
        let k1 = base_key();
        let agg = concat_keys(&[k1]);
        assert_ne!(agg, k1);
    }
}
