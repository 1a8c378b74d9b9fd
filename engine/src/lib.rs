//! Resting take-profit order engine for tick-based markets
//!
//! Traders commit input at a target price tick; when trading on the watched
//! market moves the price across that tick, the engine liquidates the
//! bucket's pending input with an auxiliary trade and fixes the proceeds for
//! pro-rata redemption by the bucket's depositors.
//!
//! The engine is synchronous and transactional: every entry point validates
//! before it mutates and runs to completion before the next call. The market
//! itself and token custody stay outside, behind the [`Venue`] trait; claim
//! receipts sit behind [`ClaimLedger`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bucket;
pub mod claims;
pub mod engine;
pub mod events;
pub mod market;
pub mod state;
pub mod tick;

pub use bucket::{Bucket, BucketLedger};
pub use claims::{ClaimLedger, InMemoryClaimLedger};
pub use engine::{Payout, TickfillEngine};
pub use events::{EngineEvent, EventJournal, SequencedEvent};
pub use market::{MarketConfig, TradeOutcome, Venue};
pub use state::{EngineState, MarketState};
pub use tick::{crossed_ticks, usable_tick, CrossedTicks, PriceMovement};
