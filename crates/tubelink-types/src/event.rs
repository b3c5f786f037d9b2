//! Events emitted by the settlement engine.
//!
//! Events are returned from the calls that produce them and appended to the
//! engine's in-memory audit trail. A failed call emits nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, NetworkId, WithdrawalKey};

/// One-shot record of an accepted deposit.
///
/// The `sequence` field is the per-route counter value at the time of the
/// deposit; the destination engine reuses it as the withdrawal's sequence
/// number, which is what makes otherwise-identical deposits distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Network the deposit is destined for.
    pub destination_network: NetworkId,
    /// Token deposited on this side.
    pub token: Address,
    /// Per-route monotonic sequence number (starts at 0).
    pub sequence: u64,
    /// Who paid the deposit in.
    pub sender: Address,
    /// Who may withdraw on the destination side.
    pub recipient: Address,
    /// Amount taken into engine custody.
    pub amount: Amount,
    /// Opaque execution payload forwarded to the destination side.
    pub payload: Vec<u8>,
    /// Fee charged in the engine's fee token (zero if no fee configured).
    pub fee: Amount,
    /// When the receipt was issued.
    pub issued_at: DateTime<Utc>,
}

/// Record of one settled withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The withdrawal key that was settled.
    pub key: WithdrawalKey,
    /// Attesting validators, in bundle order.
    pub validators: Vec<Address>,
    /// `true` if funds reached the recipient; `false` if the payload
    /// notification failed and the funds were escrowed instead.
    pub success: bool,
    /// When settlement was committed.
    pub settled_at: DateTime<Utc>,
}

/// Everything the engine emits, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A validator joined the set.
    ValidatorAdded { validator: Address },
    /// A validator left the set.
    ValidatorRemoved { validator: Address },
    /// A deposit was accepted.
    Receipt(DepositReceipt),
    /// A withdrawal was settled (successfully paid out or escrowed).
    Settled(Settlement),
}
