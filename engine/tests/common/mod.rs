//! Shared helpers for engine integration tests

use std::collections::VecDeque;
use tickfill_common::{Amount, EngineError, EngineResult, MarketId, OrderDirection, Tick};
use tickfill_engine::{MarketConfig, TickfillEngine, TradeOutcome, Venue};

/// One quintillion base units, the usual 18-decimal token scale
pub const E18: u128 = 1_000_000_000_000_000_000;

/// The market every test trades on
pub const MARKET: MarketId = MarketId::new(1);

pub const ALICE: tickfill_common::AccountId = tickfill_common::AccountId::new(1);
pub const BOB: tickfill_common::AccountId = tickfill_common::AccountId::new(2);

/// A trade the fake venue executed on the engine's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedTrade {
    pub market: MarketId,
    pub direction: OrderDirection,
    pub input: Amount,
}

/// Scripted in-memory venue
///
/// Pays out `input * rate_num / rate_den` per liquidation. `tick_after`
/// entries are consumed one per trade; once exhausted the venue reports
/// `resting_tick` (set it to the trade's target tick when the auxiliary
/// trades should have no price impact of their own).
#[derive(Debug)]
pub struct FakeVenue {
    pub rate_num: u128,
    pub rate_den: u128,
    pub resting_tick: Tick,
    pub tick_after: VecDeque<Tick>,
    pub trades: Vec<RecordedTrade>,
    /// Fail the nth trade (0-based) with `TradeFailed`
    pub fail_on_trade: Option<usize>,
}

impl FakeVenue {
    /// Venue paying out double the input, auxiliary trades price-neutral
    pub fn doubling(resting_tick: Tick) -> Self {
        Self {
            rate_num: 2,
            rate_den: 1,
            resting_tick,
            tick_after: VecDeque::new(),
            trades: Vec::new(),
            fail_on_trade: None,
        }
    }
}

impl Venue for FakeVenue {
    fn execute_trade(
        &mut self,
        market: MarketId,
        direction: OrderDirection,
        input: Amount,
    ) -> EngineResult<TradeOutcome> {
        if self.fail_on_trade == Some(self.trades.len()) {
            return Err(EngineError::TradeFailed("insufficient liquidity".into()));
        }
        self.trades.push(RecordedTrade {
            market,
            direction,
            input,
        });
        let output = input
            .as_u128()
            .checked_mul(self.rate_num)
            .map(|p| Amount::new(p / self.rate_den))
            .ok_or(EngineError::Overflow)?;
        let tick_after = self.tick_after.pop_front().unwrap_or(self.resting_tick);
        Ok(TradeOutcome { output, tick_after })
    }
}

/// Engine with one spacing-60 market registered at tick 0
pub fn engine_at_zero() -> TickfillEngine {
    let mut engine = TickfillEngine::new();
    engine
        .register_market(MARKET, MarketConfig::default(), Tick::ZERO)
        .unwrap();
    engine
}
