//! Error types shared by the engine and its callers
//!
//! Every failure is surfaced synchronously and aborts the whole operation
//! that raised it; nothing is retried or swallowed inside the engine.

use crate::types::{Amount, BucketKey, MarketId};
use thiserror::Error;

/// Convenience alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

/// All failure modes of the resting-order engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Tick outside the market's bounds, or a misaligned/zero spacing
    #[error("invalid tick: {0}")]
    InvalidTick(String),

    /// Deposit, withdraw or redeem of a zero amount
    #[error("amount must be positive")]
    ZeroAmount,

    /// Mutation of a bucket that has already settled
    #[error("bucket {0} already settled")]
    AlreadySettled(BucketKey),

    /// Redemption attempted before the bucket settled
    #[error("bucket {0} not settled")]
    NotSettled(BucketKey),

    /// Caller asked to burn more claim units than the bucket carries
    #[error("insufficient claim units: have {have}, need {need}")]
    InsufficientUnits {
        /// Units actually available
        have: Amount,
        /// Units the operation required
        need: Amount,
    },

    /// Claim ledger burn exceeds the holder's balance
    #[error("insufficient claim balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Balance actually held
        have: Amount,
        /// Balance the burn required
        need: Amount,
    },

    /// Operation referenced a market that was never registered
    #[error("unknown market {0}")]
    UnknownMarket(MarketId),

    /// Market registered twice
    #[error("market {0} already registered")]
    MarketExists(MarketId),

    /// Checked integer arithmetic overflowed
    #[error("amount arithmetic overflow")]
    Overflow,

    /// The venue rejected or failed a liquidation trade
    #[error("venue trade failed: {0}")]
    TradeFailed(String),

    /// Durable snapshot could not be encoded or decoded
    #[error("snapshot codec error: {0}")]
    Snapshot(String),
}
