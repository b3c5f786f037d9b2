//! System-wide constants for the Tubelink settlement engine.

/// Width of one recoverable secp256k1 signature: r(32) || s(32) || v(1).
pub const SIGNATURE_WIDTH: usize = 65;

/// Width of a withdrawal key (Keccak-256 digest).
pub const KEY_WIDTH: usize = 32;

/// Width of an identity address.
pub const ADDRESS_WIDTH: usize = 20;

/// Default maximum number of items in one batch withdrawal.
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 256;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tubelink";
