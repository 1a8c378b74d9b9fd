//! Shared types for the tickfill resting-order engine
//!
//! Newtypes, constants and the common error enum used by the engine crate
//! and by anything that embeds it. Everything here is plain data with
//! exact-integer semantics; no business logic lives in this crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod types;

pub use errors::{EngineError, EngineResult};
pub use types::{Amount, AccountId, BucketKey, MarketId, OrderDirection, Tick};
