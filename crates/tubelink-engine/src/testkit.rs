//! In-memory collaborators for tests. **Never use in production.**

use std::collections::HashMap;

use tubelink_types::{Address, Amount, NetworkId, Result, TubeError};

use crate::custody::{AssetRegistry, PayloadReceiver, TokenCustody};

// ---------------------------------------------------------------------------
// InMemoryCustody
// ---------------------------------------------------------------------------

/// Token custody backed by a per-(token, holder) balance map. The engine's
/// vault is just another holder, identified by `vault`.
pub struct InMemoryCustody {
    vault: Address,
    balances: HashMap<(Address, Address), Amount>,
}

impl InMemoryCustody {
    #[must_use]
    pub fn new(vault: Address) -> Self {
        Self {
            vault,
            balances: HashMap::new(),
        }
    }

    /// Credit `who` with `amount` of `token` out of thin air.
    pub fn mint(&mut self, token: Address, who: Address, amount: Amount) {
        *self.balances.entry((token, who)).or_insert(0) += amount;
    }

    /// The vault identity.
    #[must_use]
    pub fn vault(&self) -> Address {
        self.vault
    }

    fn debit(&mut self, token: Address, who: Address, amount: Amount) -> Result<()> {
        let balance = self.balances.entry((token, who)).or_insert(0);
        if *balance < amount {
            return Err(TubeError::InsufficientBalance {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }
}

impl TokenCustody for InMemoryCustody {
    fn transfer_in(&mut self, token: Address, from: Address, amount: Amount) -> Result<()> {
        self.debit(token, from, amount)?;
        let vault = self.vault;
        self.mint(token, vault, amount);
        Ok(())
    }

    fn transfer_out(&mut self, token: Address, to: Address, amount: Amount) -> Result<()> {
        let vault = self.vault;
        self.debit(token, vault, amount)?;
        self.mint(token, to, amount);
        Ok(())
    }

    fn balance_of(&self, token: Address, who: Address) -> Amount {
        self.balances.get(&(token, who)).copied().unwrap_or(0)
    }

    fn custody_balance(&self, token: Address) -> Amount {
        self.balance_of(token, self.vault)
    }
}

// ---------------------------------------------------------------------------
// StaticRegistry
// ---------------------------------------------------------------------------

/// Asset registry backed by a fixed route table.
#[derive(Default)]
pub struct StaticRegistry {
    routes: HashMap<(NetworkId, Address), Address>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `(home_network, token)` to a local asset.
    pub fn register(&mut self, home_network: NetworkId, token: Address, local: Address) {
        self.routes.insert((home_network, token), local);
    }
}

impl AssetRegistry for StaticRegistry {
    fn resolve_route(&self, home_network: NetworkId, token: Address) -> Option<Address> {
        self.routes.get(&(home_network, token)).copied()
    }
}

// ---------------------------------------------------------------------------
// ScriptedReceiver
// ---------------------------------------------------------------------------

/// What the scripted receiver does when notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverBehavior {
    /// Accept the delivery and credit downstream bookkeeping.
    Accept,
    /// Return an error.
    Reject,
    /// Panic mid-call.
    Panic,
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: Address,
    pub token: Address,
    pub amount: Amount,
    pub payload: Vec<u8>,
}

/// Programmable receiver: accepts, rejects, or panics on demand, and keeps
/// per-(token, recipient) bookkeeping of accepted deliveries.
pub struct ScriptedReceiver {
    behavior: ReceiverBehavior,
    /// Every notification attempted against this receiver.
    pub notified: Vec<Notification>,
    /// Accepted amounts per (token, recipient).
    pub points: HashMap<(Address, Address), Amount>,
}

impl ScriptedReceiver {
    #[must_use]
    pub fn accepting() -> Self {
        Self::with_behavior(ReceiverBehavior::Accept)
    }

    #[must_use]
    pub fn rejecting() -> Self {
        Self::with_behavior(ReceiverBehavior::Reject)
    }

    #[must_use]
    pub fn panicking() -> Self {
        Self::with_behavior(ReceiverBehavior::Panic)
    }

    #[must_use]
    pub fn with_behavior(behavior: ReceiverBehavior) -> Self {
        Self {
            behavior,
            notified: Vec::new(),
            points: HashMap::new(),
        }
    }
}

impl PayloadReceiver for ScriptedReceiver {
    fn notify(
        &mut self,
        recipient: Address,
        token: Address,
        amount: Amount,
        payload: &[u8],
    ) -> std::result::Result<(), String> {
        self.notified.push(Notification {
            recipient,
            token,
            amount,
            payload: payload.to_vec(),
        });
        match self.behavior {
            ReceiverBehavior::Accept => {
                *self.points.entry((token, recipient)).or_insert(0) += amount;
                Ok(())
            }
            ReceiverBehavior::Reject => Err("delivery rejected".into()),
            ReceiverBehavior::Panic => panic!("scripted receiver panic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address([1u8; 20])
    }

    #[test]
    fn custody_transfer_in_and_out() {
        let vault = Address([0xee; 20]);
        let holder = Address([2u8; 20]);
        let mut custody = InMemoryCustody::new(vault);
        custody.mint(token(), holder, 1000);

        custody.transfer_in(token(), holder, 300).unwrap();
        assert_eq!(custody.balance_of(token(), holder), 700);
        assert_eq!(custody.balance_of(token(), vault), 300);
        assert_eq!(custody.custody_balance(token()), 300);

        custody.transfer_out(token(), holder, 100).unwrap();
        assert_eq!(custody.balance_of(token(), holder), 800);
        assert_eq!(custody.balance_of(token(), vault), 200);
    }

    #[test]
    fn custody_insufficient_balance() {
        let mut custody = InMemoryCustody::new(Address([0xee; 20]));
        let err = custody
            .transfer_in(token(), Address([2u8; 20]), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            TubeError::InsufficientBalance {
                needed: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn registry_resolves_registered_routes_only() {
        let mut registry = StaticRegistry::new();
        let local = Address([9u8; 20]);
        registry.register(NetworkId(1), token(), local);

        assert_eq!(registry.resolve_route(NetworkId(1), token()), Some(local));
        assert_eq!(registry.resolve_route(NetworkId(2), token()), None);
    }

    #[test]
    fn receiver_accepts_and_keeps_points() {
        let mut receiver = ScriptedReceiver::accepting();
        let recipient = Address([5u8; 20]);
        receiver.notify(recipient, token(), 42, b"data").unwrap();
        assert_eq!(receiver.points.get(&(token(), recipient)), Some(&42));
        assert_eq!(receiver.notified.len(), 1);
    }

    #[test]
    fn receiver_rejects() {
        let mut receiver = ScriptedReceiver::rejecting();
        assert!(receiver
            .notify(Address([5u8; 20]), token(), 42, b"data")
            .is_err());
        assert!(receiver.points.is_empty());
    }
}
