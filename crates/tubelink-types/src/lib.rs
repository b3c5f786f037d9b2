//! # tubelink-types
//!
//! Shared types, errors, and configuration for the **Tubelink** bridge
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`NetworkId`], [`Address`], [`WithdrawalKey`], [`Amount`]
//! - **Mode**: [`PauseMode`] (operational vs. administrative)
//! - **Events**: [`Event`], [`DepositReceipt`], [`Settlement`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`TubeError`] with `TUBE_ERR_` prefix codes
//! - **Constants**: signature width, key width, batch limits

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod mode;

// Re-export all primary types at crate root for ergonomic imports:
//   use tubelink_types::{Address, NetworkId, TubeError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use mode::*;

// Constants are accessed via `tubelink_types::constants::FOO`
// (not re-exported to avoid name collisions).
