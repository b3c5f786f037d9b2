//! Engine pause mode.

use serde::{Deserialize, Serialize};

/// Process-wide two-state flag gating which operations are permitted.
///
/// User-facing calls (deposit, withdraw) require [`PauseMode::Operational`];
/// validator-set mutation requires [`PauseMode::Administrative`]. The
/// transition itself is access-controlled by the surrounding system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseMode {
    /// Normal operation: deposits and withdrawals are accepted.
    Operational,
    /// Paused for administration: validator-set changes are accepted.
    Administrative,
}

impl std::fmt::Display for PauseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operational => write!(f, "OPERATIONAL"),
            Self::Administrative => write!(f, "ADMINISTRATIVE"),
        }
    }
}
