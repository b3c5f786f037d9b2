//! Configuration for a Tubelink settlement engine instance.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, NetworkId};

/// Static configuration for one engine instance.
///
/// One engine is deployed per network; `network_id` is bound into every
/// withdrawal key so attestations for one engine can never be replayed
/// against another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The network this engine settles on.
    pub network_id: NetworkId,
    /// Token fees are charged in.
    pub fee_token: Address,
    /// Where charged fees end up.
    pub fee_sink: Address,
    /// Maximum items accepted in one batch withdrawal.
    pub max_batch_items: usize,
}

impl EngineConfig {
    /// Config for an engine on the given network with no fee routing set up.
    #[must_use]
    pub fn for_network(network_id: NetworkId) -> Self {
        Self {
            network_id,
            fee_token: Address::ZERO,
            fee_sink: Address::ZERO,
            max_batch_items: constants::DEFAULT_MAX_BATCH_ITEMS,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_network(NetworkId(0))
    }
}
