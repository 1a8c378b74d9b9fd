//! Crossing detector, executor and user entry points
//!
//! [`TickfillEngine`] owns every durable piece of engine state and exposes
//! the full surface: market registration, deposit/withdraw/redeem, the
//! post-trade crossing callback, and read-only queries. Each call runs to
//! completion before the next; validation happens before mutation so a
//! failed call leaves no partial state behind.

use crate::bucket::{Bucket, BucketLedger};
use crate::claims::{ClaimLedger, InMemoryClaimLedger};
use crate::events::{EngineEvent, EventJournal, SequencedEvent};
use crate::market::{MarketConfig, Venue};
use crate::state::{EngineState, MarketState};
use crate::tick::{self, PriceMovement};
use rustc_hash::FxHashMap;
use tickfill_common::{
    AccountId, Amount, BucketKey, EngineError, EngineResult, MarketId, OrderDirection, Tick,
};
use tracing::{debug, info};

/// Output owed to a recipient after a withdrawal or redemption
///
/// The engine does not move tokens; it hands this back for the host's
/// transfer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    /// Who receives the output
    pub recipient: AccountId,
    /// How much they receive
    pub amount: Amount,
}

/// The resting-order engine
///
/// Generic over the claim ledger so hosts can supply their own receipt
/// bookkeeping; defaults to the in-memory ledger.
#[derive(Debug, Clone)]
pub struct TickfillEngine<L: ClaimLedger = InMemoryClaimLedger> {
    markets: FxHashMap<MarketId, MarketState>,
    buckets: BucketLedger,
    claims: L,
    journal: EventJournal,
}

impl TickfillEngine<InMemoryClaimLedger> {
    /// Engine backed by the in-memory claim ledger
    #[must_use]
    pub fn new() -> Self {
        Self::with_ledger(InMemoryClaimLedger::new())
    }

    /// Serialize all durable state
    pub fn snapshot(&self) -> EngineResult<Vec<u8>> {
        let state = EngineState {
            markets: self.markets.clone(),
            buckets: self.buckets.clone(),
            claims: self.claims.clone(),
            journal: self.journal.clone(),
        };
        state.encode()
    }

    /// Rebuild an engine from a snapshot produced by [`Self::snapshot`]
    pub fn restore(bytes: &[u8]) -> EngineResult<Self> {
        let state = EngineState::decode(bytes)?;
        Ok(Self {
            markets: state.markets,
            buckets: state.buckets,
            claims: state.claims,
            journal: state.journal,
        })
    }
}

impl Default for TickfillEngine<InMemoryClaimLedger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ClaimLedger> TickfillEngine<L> {
    /// Engine backed by a caller-supplied claim ledger
    #[must_use]
    pub fn with_ledger(claims: L) -> Self {
        Self {
            markets: FxHashMap::default(),
            buckets: BucketLedger::new(),
            claims,
            journal: EventJournal::new(),
        }
    }

    /// Register a market before accepting orders on it
    ///
    /// `current_tick` seeds the crossing detector's observed tick.
    pub fn register_market(
        &mut self,
        market: MarketId,
        config: MarketConfig,
        current_tick: Tick,
    ) -> EngineResult<()> {
        config.validate()?;
        config.check_bounds(current_tick)?;
        if self.markets.contains_key(&market) {
            return Err(EngineError::MarketExists(market));
        }
        self.markets.insert(
            market,
            MarketState {
                config,
                last_observed_tick: current_tick,
            },
        );
        self.journal.record(EngineEvent::MarketRegistered {
            market,
            config,
            initial_tick: current_tick,
        });
        info!(%market, tick = %current_tick, "market registered");
        Ok(())
    }

    /// Place a take-profit order: commit `amount` of input at `raw_tick`
    ///
    /// Returns the usable tick the order rests at and the bucket key that
    /// identifies the position. Mints `amount` claim units to `holder`.
    pub fn deposit(
        &mut self,
        market: MarketId,
        raw_tick: Tick,
        direction: OrderDirection,
        holder: AccountId,
        amount: Amount,
    ) -> EngineResult<(Tick, BucketKey)> {
        let config = self.market_config(market)?;
        let usable = config.usable_tick(raw_tick)?;
        let key = BucketKey::new(market, usable, direction);

        self.buckets.deposit(key, amount)?;
        // Units mirror pending input exactly, so this mint cannot fail
        // after the bucket accepted the same amount.
        self.claims.mint(key, holder, amount)?;

        self.journal.record(EngineEvent::Deposited {
            key,
            holder,
            amount,
        });
        debug!(%key, %holder, %amount, "deposit");
        Ok((usable, key))
    }

    /// Cancel resting input before settlement by burning claim units
    ///
    /// Returns the input amount to hand back to the caller.
    pub fn withdraw(
        &mut self,
        market: MarketId,
        raw_tick: Tick,
        direction: OrderDirection,
        holder: AccountId,
        units: Amount,
    ) -> EngineResult<Amount> {
        let config = self.market_config(market)?;
        let usable = config.usable_tick(raw_tick)?;
        let key = BucketKey::new(market, usable, direction);

        if units.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        if self.buckets.get(&key).is_some_and(|b| b.settled) {
            return Err(EngineError::AlreadySettled(key));
        }
        let have = self.claims.balance_of(key, holder);
        if have < units {
            return Err(EngineError::InsufficientUnits { have, need: units });
        }

        let amount = self.buckets.withdraw(key, units)?;
        self.claims.burn(key, holder, units)?;

        self.journal.record(EngineEvent::Withdrawn {
            key,
            holder,
            amount,
        });
        debug!(%key, %holder, %amount, "withdraw");
        Ok(amount)
    }

    /// Post-trade callback from the venue: settle every crossed bucket
    ///
    /// Walks the usable ticks between the last observed tick and `new_tick`
    /// in strict price order. An upward move settles `ZeroForOne` buckets,
    /// a downward move `OneForZero` ones. Each eligible bucket is liquidated
    /// with an auxiliary trade on `venue` for exactly its pending input; the
    /// auxiliary trades' own price impact updates the observed tick but
    /// never triggers a nested walk. A venue failure aborts the callback
    /// with the error propagated to the caller.
    pub fn on_price_change(
        &mut self,
        venue: &mut dyn Venue,
        market: MarketId,
        new_tick: Tick,
    ) -> EngineResult<()> {
        let state = *self
            .markets
            .get(&market)
            .ok_or(EngineError::UnknownMarket(market))?;
        state.config.check_bounds(new_tick)?;

        let prev = state.last_observed_tick;
        let Some(movement) = PriceMovement::between(prev, new_tick) else {
            debug!(%market, tick = %new_tick, "no tick movement");
            return Ok(());
        };
        let direction = movement.fill_direction();
        let spacing = state.config.tick_spacing;

        // The walk is bounded by the raw ticks: a usable tick settles only
        // once the price actually reached it, and the raw tick a previous
        // trade rested at is never revisited.
        let mut tick_after_fills: Option<Tick> = None;
        for crossed in tick::crossed_ticks(prev, new_tick, spacing) {
            let key = BucketKey::new(market, crossed, direction);
            let pending = match self.buckets.get(&key) {
                Some(b) if !b.settled && !b.pending_input.is_zero() => b.pending_input,
                _ => {
                    debug!(%key, "crossed tick without eligible bucket");
                    continue;
                }
            };

            let outcome = venue.execute_trade(market, direction, pending)?;
            let total_units = self.claims.total_supply(key);
            self.buckets.settle(key, outcome.output, total_units)?;
            tick_after_fills = Some(outcome.tick_after);

            self.journal.record(EngineEvent::Settled {
                key,
                input: pending,
                output: outcome.output,
            });
            info!(%key, input = %pending, output = %outcome.output, "bucket settled");
        }

        // The liquidation trades move the price too; their final tick is
        // the market's real position and becomes the observed tick, without
        // re-walking. With no fills the trade's own tick stands.
        let final_tick = tick_after_fills.unwrap_or(new_tick);
        if let Some(entry) = self.markets.get_mut(&market) {
            entry.last_observed_tick = final_tick;
        }
        Ok(())
    }

    /// Burn `units` against a settled bucket for a pro-rata output share
    ///
    /// Floor division: `claimable_output * units / total_units_at_settlement`.
    /// Residual dust from rounding stays in the bucket unclaimed.
    pub fn redeem(
        &mut self,
        key: BucketKey,
        holder: AccountId,
        units: Amount,
        recipient: AccountId,
    ) -> EngineResult<Payout> {
        if units.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        let bucket = self
            .buckets
            .get(&key)
            .copied()
            .ok_or(EngineError::NotSettled(key))?;
        let amount = bucket.payout_for(key, units)?;
        let have = self.claims.balance_of(key, holder);
        if have < units {
            return Err(EngineError::InsufficientUnits { have, need: units });
        }
        self.claims.burn(key, holder, units)?;

        self.journal.record(EngineEvent::Redeemed {
            key,
            holder,
            units,
            payout: amount,
            recipient,
        });
        debug!(%key, %holder, %units, %amount, "redeem");
        Ok(Payout { recipient, amount })
    }

    /// Pending input resting at (market, usable tick of `raw_tick`, direction)
    ///
    /// Zero when no bucket exists. After settlement this reports the
    /// historical converted quantity.
    pub fn pending_amount(
        &self,
        market: MarketId,
        raw_tick: Tick,
        direction: OrderDirection,
    ) -> EngineResult<Amount> {
        let config = self.market_config(market)?;
        let usable = config.usable_tick(raw_tick)?;
        let key = BucketKey::new(market, usable, direction);
        Ok(self
            .buckets
            .get(&key)
            .map_or(Amount::ZERO, |b| b.pending_input))
    }

    /// Output redeemable against a bucket; zero until it settles
    #[must_use]
    pub fn claimable_amount(&self, key: BucketKey) -> Amount {
        self.buckets
            .get(&key)
            .map_or(Amount::ZERO, |b| b.claimable_output)
    }

    /// Full bucket state, if the bucket exists
    #[must_use]
    pub fn bucket(&self, key: BucketKey) -> Option<&Bucket> {
        self.buckets.get(&key)
    }

    /// Claim units `holder` carries for `key`
    #[must_use]
    pub fn claim_balance(&self, key: BucketKey, holder: AccountId) -> Amount {
        self.claims.balance_of(key, holder)
    }

    /// Outstanding claim units for `key`
    #[must_use]
    pub fn claim_supply(&self, key: BucketKey) -> Amount {
        self.claims.total_supply(key)
    }

    /// Tick observed after the last processed trade on `market`
    #[must_use]
    pub fn last_observed_tick(&self, market: MarketId) -> Option<Tick> {
        self.markets.get(&market).map(|s| s.last_observed_tick)
    }

    /// Undrained mutation events
    #[must_use]
    pub fn events(&self) -> &[SequencedEvent] {
        self.journal.entries()
    }

    /// Take all pending mutation events
    pub fn drain_events(&mut self) -> Vec<SequencedEvent> {
        self.journal.drain()
    }

    fn market_config(&self, market: MarketId) -> EngineResult<MarketConfig> {
        self.markets
            .get(&market)
            .map(|s| s.config)
            .ok_or(EngineError::UnknownMarket(market))
    }
}
