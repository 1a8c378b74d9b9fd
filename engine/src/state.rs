//! Durable engine state
//!
//! Everything the engine must remember across operations — buckets, claim
//! balances, per-market tick tracking, the event journal — collected in one
//! serializable struct so a host can persist it and restore after a restart.

use crate::bucket::BucketLedger;
use crate::claims::InMemoryClaimLedger;
use crate::events::EventJournal;
use crate::market::MarketConfig;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tickfill_common::{EngineError, EngineResult, MarketId, Tick};

/// Per-market mutable state tracked by the crossing detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    /// Static trading parameters
    pub config: MarketConfig,
    /// Tick observed after the last processed trade
    pub last_observed_tick: Tick,
}

/// Complete serializable snapshot of an engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState {
    /// Registered markets and their tick tracking
    pub markets: FxHashMap<MarketId, MarketState>,
    /// All order buckets
    pub buckets: BucketLedger,
    /// Claim-unit balances and supplies
    pub claims: InMemoryClaimLedger,
    /// Mutation journal
    pub journal: EventJournal,
}

impl EngineState {
    /// Encode to bytes for durable storage
    pub fn encode(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot produced by [`EngineState::encode`]
    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickfill_common::{Amount, BucketKey, OrderDirection};

    #[test]
    fn snapshot_round_trips() {
        let mut state = EngineState::default();
        state.markets.insert(
            MarketId::new(1),
            MarketState {
                config: MarketConfig::default(),
                last_observed_tick: Tick::new(-120),
            },
        );
        let key = BucketKey::new(MarketId::new(1), Tick::new(60), OrderDirection::ZeroForOne);
        state.buckets.deposit(key, Amount::new(42)).unwrap();

        let bytes = state.encode().unwrap();
        let restored = EngineState::decode(&bytes).unwrap();
        assert_eq!(restored.markets, state.markets);
        assert_eq!(restored.buckets.get(&key), state.buckets.get(&key));
    }

    #[test]
    fn garbage_bytes_fail_cleanly() {
        let err = EngineState::decode(&[0xff; 3]).unwrap_err();
        assert!(matches!(err, EngineError::Snapshot(_)));
    }
}
