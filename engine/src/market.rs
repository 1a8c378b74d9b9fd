//! Market collaborator interface
//!
//! The engine never touches the price curve or token custody itself; it
//! watches an external venue and, on a crossing, asks it to liquidate a
//! bucket's pending input. Everything the engine needs from the venue sits
//! behind the [`Venue`] trait so tests run against an in-memory fake.

use crate::tick;
use serde::{Deserialize, Serialize};
use tickfill_common::constants::{DEFAULT_TICK_SPACING, MAX_TICK, MIN_TICK};
use tickfill_common::{Amount, EngineError, EngineResult, MarketId, OrderDirection, Tick};

/// Static per-market trading parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Distance between usable ticks
    pub tick_spacing: u16,
    /// Lowest valid raw tick
    pub min_tick: i32,
    /// Highest valid raw tick
    pub max_tick: i32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            tick_spacing: DEFAULT_TICK_SPACING,
            min_tick: MIN_TICK,
            max_tick: MAX_TICK,
        }
    }
}

impl MarketConfig {
    /// Validate the configuration at registration time
    pub fn validate(&self) -> EngineResult<()> {
        if self.tick_spacing == 0 {
            return Err(EngineError::InvalidTick(
                "tick spacing must be positive".to_string(),
            ));
        }
        if self.min_tick >= self.max_tick {
            return Err(EngineError::InvalidTick(format!(
                "bounds [{}, {}] are empty",
                self.min_tick, self.max_tick
            )));
        }
        if self.min_tick < MIN_TICK || self.max_tick > MAX_TICK {
            return Err(EngineError::InvalidTick(format!(
                "bounds [{}, {}] exceed global tick range",
                self.min_tick, self.max_tick
            )));
        }
        Ok(())
    }

    /// Reject a raw tick outside this market's bounds
    pub fn check_bounds(&self, raw: Tick) -> EngineResult<()> {
        if raw.index() < self.min_tick || raw.index() > self.max_tick {
            return Err(EngineError::InvalidTick(format!(
                "{} outside bounds [{}, {}]",
                raw, self.min_tick, self.max_tick
            )));
        }
        Ok(())
    }

    /// Bounds-checked usable-tick rounding for this market
    pub fn usable_tick(&self, raw: Tick) -> EngineResult<Tick> {
        self.check_bounds(raw)?;
        tick::usable_tick(raw, self.tick_spacing)
    }
}

/// Result of a liquidation trade executed on the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOutcome {
    /// Output-asset amount the trade realized
    pub output: Amount,
    /// The market's tick after the trade's own price impact
    pub tick_after: Tick,
}

/// External market the engine watches and trades against
///
/// `execute_trade` must be all-or-nothing: on an error the venue has moved
/// no funds and no price. The engine propagates such errors unchanged,
/// aborting the whole crossing callback.
pub trait Venue {
    /// Sell exactly `input` in `direction` on `market`, returning the
    /// realized output and the post-trade tick
    fn execute_trade(
        &mut self,
        market: MarketId,
        direction: OrderDirection,
        input: Amount,
    ) -> EngineResult<TradeOutcome>;
}
