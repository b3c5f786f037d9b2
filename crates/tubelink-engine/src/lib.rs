//! # tubelink-engine
//!
//! The **Tube** settlement engine: the security-critical core of the bridge.
//!
//! ## Architecture
//!
//! A deposit flows: fee charge → token custody pull → receipt event.
//! A withdrawal flows: key derivation → quorum signature verification →
//! replay check → settlement commit → token release → optional payload
//! notification with escrow fallback. A batch withdrawal runs the per-item
//! pipeline under one combined signature check.
//!
//! ## Components
//!
//! - [`ValidatorSet`]: ordered attested signer identities; mutation gated
//!   by administrative mode.
//! - [`SettlementLedger`]: permanent record of settled withdrawal keys,
//!   the anti-double-spend guarantee. Never evicts.
//! - [`verifier`]: recovers a signature bundle and checks membership,
//!   duplicates, and the two-thirds quorum.
//! - [`EscrowVault`]: funds retained when a payload notification fails.
//! - [`Tube`]: the engine itself, holding owned handles to the custody,
//!   registry, and receiver collaborators.

pub mod custody;
pub mod engine;
pub mod escrow;
pub mod fees;
pub mod ledger;
pub mod validator_set;
pub mod verifier;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testkit;

pub use custody::{AssetRegistry, PayloadReceiver, TokenCustody};
pub use engine::Tube;
pub use escrow::{EscrowEntry, EscrowVault};
pub use fees::FeeSchedule;
pub use ledger::SettlementLedger;
pub use validator_set::ValidatorSet;
