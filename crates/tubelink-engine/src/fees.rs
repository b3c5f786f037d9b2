//! Per-destination deposit fees.

use std::collections::HashMap;

use tubelink_types::{Amount, NetworkId};

/// Deposit fee per destination network, in the engine's fee token.
/// Unset networks charge nothing.
#[derive(Debug, Default)]
pub struct FeeSchedule {
    fees: HashMap<NetworkId, Amount>,
}

impl FeeSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fee for deposits destined to `network`. Zero clears it.
    pub fn set(&mut self, network: NetworkId, fee: Amount) {
        if fee == 0 {
            self.fees.remove(&network);
        } else {
            self.fees.insert(network, fee);
        }
    }

    /// Fee charged for deposits destined to `network`.
    #[must_use]
    pub fn get(&self, network: NetworkId) -> Amount {
        self.fees.get(&network).copied().unwrap_or(0)
    }
}
