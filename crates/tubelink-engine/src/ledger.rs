//! The settlement ledger, which prevents double payout.
//!
//! Each withdrawal key can be settled exactly once. Attempting to settle the
//! same key a second time returns [`TubeError::AlreadySettled`].
//!
//! Unlike a transient idempotency cache, the ledger never evicts: a settled
//! key stays settled for the lifetime of the engine. Eviction would reopen
//! the double-spend window for old withdrawals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tubelink_types::{Address, Result, TubeError, WithdrawalKey};

/// Audit record kept per settled key.
#[derive(Debug, Clone)]
pub struct SettledRecord {
    /// Validators that attested, in bundle order.
    pub validators: Vec<Address>,
    /// When the key was committed.
    pub settled_at: DateTime<Utc>,
}

/// Persistent record of which withdrawal keys have been settled.
///
/// Owned exclusively by the engine; nothing else mutates it.
#[derive(Debug, Default)]
pub struct SettlementLedger {
    settled: HashMap<WithdrawalKey, SettledRecord>,
}

impl SettlementLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a key. Irreversible.
    ///
    /// # Errors
    /// Returns [`TubeError::AlreadySettled`] if the key was already committed.
    pub fn mark_settled(&mut self, key: WithdrawalKey, validators: Vec<Address>) -> Result<()> {
        if self.settled.contains_key(&key) {
            return Err(TubeError::AlreadySettled(key));
        }
        self.settled.insert(
            key,
            SettledRecord {
                validators,
                settled_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Whether a key has been settled.
    #[must_use]
    pub fn is_settled(&self, key: &WithdrawalKey) -> bool {
        self.settled.contains_key(key)
    }

    /// Audit record for a settled key.
    #[must_use]
    pub fn record(&self, key: &WithdrawalKey) -> Option<&SettledRecord> {
        self.settled.get(key)
    }

    /// Number of settled keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    /// Whether no key has been settled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> WithdrawalKey {
        WithdrawalKey([byte; 32])
    }

    #[test]
    fn first_settle_ok() {
        let mut ledger = SettlementLedger::new();
        ledger.mark_settled(key(1), vec![Address([9u8; 20])]).unwrap();
        assert!(ledger.is_settled(&key(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn double_settle_blocked() {
        let mut ledger = SettlementLedger::new();
        ledger.mark_settled(key(1), vec![]).unwrap();
        let err = ledger.mark_settled(key(1), vec![]).unwrap_err();
        assert!(matches!(err, TubeError::AlreadySettled(k) if k == key(1)));
    }

    #[test]
    fn record_keeps_attesters_in_order() {
        let mut ledger = SettlementLedger::new();
        let attesters = vec![Address([3u8; 20]), Address([1u8; 20]), Address([2u8; 20])];
        ledger.mark_settled(key(7), attesters.clone()).unwrap();
        assert_eq!(ledger.record(&key(7)).unwrap().validators, attesters);
    }

    #[test]
    fn distinct_keys_independent() {
        let mut ledger = SettlementLedger::new();
        ledger.mark_settled(key(1), vec![]).unwrap();
        ledger.mark_settled(key(2), vec![]).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.is_settled(&key(3)));
    }

    #[test]
    fn empty_ledger() {
        let ledger = SettlementLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.record(&key(1)).is_none());
    }
}
