//! Escrow vault for failed payload deliveries.
//!
//! When a withdrawal carries an execution payload and the recipient's
//! notification fails, the released funds stay in engine custody. The vault
//! records which key the retained funds belong to, so recovery tooling can
//! identify them later. Settlement itself is final either way; an escrowed
//! withdrawal can never be resubmitted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tubelink_types::{Address, Amount, WithdrawalKey};

/// Funds retained after a failed payload notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEntry {
    /// The local asset held.
    pub token: Address,
    /// The recipient the funds were destined for.
    pub recipient: Address,
    /// Amount retained.
    pub amount: Amount,
    /// When the escrow was recorded.
    pub escrowed_at: DateTime<Utc>,
}

/// Escrowed funds indexed by withdrawal key.
#[derive(Debug, Default)]
pub struct EscrowVault {
    entries: HashMap<WithdrawalKey, EscrowEntry>,
}

impl EscrowVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record retained funds for `key`. A key settles at most once, so an
    /// entry is never overwritten.
    pub fn record(&mut self, key: WithdrawalKey, token: Address, recipient: Address, amount: Amount) {
        self.entries.insert(
            key,
            EscrowEntry {
                token,
                recipient,
                amount,
                escrowed_at: Utc::now(),
            },
        );
    }

    /// Escrow entry for `key`, if its payload delivery failed.
    #[must_use]
    pub fn get(&self, key: &WithdrawalKey) -> Option<&EscrowEntry> {
        self.entries.get(key)
    }

    /// Total retained amount of `token` across all entries.
    #[must_use]
    pub fn total_escrowed(&self, token: Address) -> Amount {
        self.entries
            .values()
            .filter(|entry| entry.token == token)
            .map(|entry| entry.amount)
            .sum()
    }

    /// Number of escrowed withdrawals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is escrowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> WithdrawalKey {
        WithdrawalKey([byte; 32])
    }

    #[test]
    fn record_and_get() {
        let mut vault = EscrowVault::new();
        vault.record(key(1), Address([2u8; 20]), Address([3u8; 20]), 999);

        let entry = vault.get(&key(1)).unwrap();
        assert_eq!(entry.amount, 999);
        assert_eq!(entry.recipient, Address([3u8; 20]));
        assert!(vault.get(&key(2)).is_none());
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = EscrowEntry {
            token: Address([2u8; 20]),
            recipient: Address([3u8; 20]),
            amount: 999,
            escrowed_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: EscrowEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn totals_per_token() {
        let mut vault = EscrowVault::new();
        let token_a = Address([1u8; 20]);
        let token_b = Address([2u8; 20]);
        vault.record(key(1), token_a, Address([9u8; 20]), 100);
        vault.record(key(2), token_a, Address([9u8; 20]), 50);
        vault.record(key(3), token_b, Address([9u8; 20]), 7);

        assert_eq!(vault.total_escrowed(token_a), 150);
        assert_eq!(vault.total_escrowed(token_b), 7);
        assert_eq!(vault.len(), 3);
    }
}
