//! Engine event journal
//!
//! Every state mutation appends a sequenced record. The journal is an
//! in-memory audit trail a host can drain after each operation to feed its
//! own persistence or notification layer.

use crate::market::MarketConfig;
use serde::{Deserialize, Serialize};
use tickfill_common::{AccountId, Amount, BucketKey, MarketId, Tick};

/// A state mutation the engine performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A market was registered
    MarketRegistered {
        /// Market identifier
        market: MarketId,
        /// Its trading parameters
        config: MarketConfig,
        /// The market's tick at registration
        initial_tick: Tick,
    },
    /// Pending input added to a bucket
    Deposited {
        /// Bucket receiving the deposit
        key: BucketKey,
        /// Depositor credited with claim units
        holder: AccountId,
        /// Input amount added (and units minted)
        amount: Amount,
    },
    /// Pending input returned before settlement
    Withdrawn {
        /// Bucket the withdrawal drained
        key: BucketKey,
        /// Holder whose units were burned
        holder: AccountId,
        /// Input amount returned (and units burned)
        amount: Amount,
    },
    /// A crossing converted a bucket's pending input
    Settled {
        /// Bucket that settled
        key: BucketKey,
        /// Input liquidated on the venue
        input: Amount,
        /// Output fixed for redemption
        output: Amount,
    },
    /// A holder redeemed units from a settled bucket
    Redeemed {
        /// Bucket redeemed against
        key: BucketKey,
        /// Holder whose units were burned
        holder: AccountId,
        /// Units burned
        units: Amount,
        /// Output paid out
        payout: Amount,
        /// Recipient of the payout
        recipient: AccountId,
    },
}

/// An event together with its journal sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Monotonically increasing sequence, starting at 1
    pub seq: u64,
    /// The recorded mutation
    pub event: EngineEvent,
}

/// Append-only journal of engine mutations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventJournal {
    next_seq: u64,
    entries: Vec<SequencedEvent>,
}

impl EventJournal {
    /// Create an empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning its sequence number
    pub fn record(&mut self, event: EngineEvent) -> u64 {
        self.next_seq += 1;
        self.entries.push(SequencedEvent {
            seq: self.next_seq,
            event,
        });
        self.next_seq
    }

    /// Undrained events
    #[must_use]
    pub fn entries(&self) -> &[SequencedEvent] {
        &self.entries
    }

    /// Take all pending events, leaving the sequence counter intact
    pub fn drain(&mut self) -> Vec<SequencedEvent> {
        std::mem::take(&mut self.entries)
    }

    /// Number of undrained events
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal holds no undrained events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
