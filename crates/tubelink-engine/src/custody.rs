//! Collaborator interfaces.
//!
//! The engine never reaches for ambient authority: it holds owned handles
//! to its collaborators, passed in at construction. These traits are the
//! whole surface the engine consumes: token bookkeeping, asset-pair
//! resolution, and recipient notification are implemented elsewhere.

use tubelink_types::{Address, Amount, NetworkId, Result};

/// Token custody: the engine's vault.
///
/// `transfer_in` pulls funds from a holder into engine custody;
/// `transfer_out` releases engine custody to a holder. Both fail on
/// insufficient balance or allowance, and a failure must leave balances
/// untouched.
pub trait TokenCustody {
    /// Pull `amount` of `token` from `from` into engine custody.
    fn transfer_in(&mut self, token: Address, from: Address, amount: Amount) -> Result<()>;

    /// Release `amount` of `token` from engine custody to `to`.
    fn transfer_out(&mut self, token: Address, to: Address, amount: Amount) -> Result<()>;

    /// Current balance of `who` in `token`.
    fn balance_of(&self, token: Address, who: Address) -> Amount;

    /// Amount of `token` currently held in engine custody.
    fn custody_balance(&self, token: Address) -> Amount;
}

/// Cross-network asset-pair registry.
pub trait AssetRegistry {
    /// The local asset that `(home_network, token)` maps to, if the route
    /// is registered.
    fn resolve_route(&self, home_network: NetworkId, token: Address) -> Option<Address>;
}

/// Programmable-receiver notification.
///
/// Invoked after a withdrawal that carries an execution payload. The engine
/// treats any `Err` (and any panic) as a failed notification and escrows
/// the funds instead of releasing them.
pub trait PayloadReceiver {
    /// Notify `recipient` that `amount` of `token` is being delivered,
    /// with the withdrawal's opaque payload.
    fn notify(
        &mut self,
        recipient: Address,
        token: Address,
        amount: Amount,
        payload: &[u8],
    ) -> std::result::Result<(), String>;
}
