//! Order bucket ledger
//!
//! A bucket aggregates every resting order at one (market, usable tick,
//! direction). Buckets are created lazily on first deposit and keyed in a
//! hash map; there is no global order list to scan.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tickfill_common::{Amount, BucketKey, EngineError, EngineResult};

/// Aggregated order state for one bucket key
///
/// While `settled` is false, `claimable_output` is zero. Settlement flips
/// `settled` exactly once; afterwards `pending_input` freezes and records
/// the quantity that was converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Input-asset amount deposited and not yet settled
    pub pending_input: Amount,
    /// Output-asset amount fixed at settlement, available to redeem
    pub claimable_output: Amount,
    /// Whether the bucket has been settled (monotonic false -> true)
    pub settled: bool,
    /// Claim-unit supply snapshotted at the instant of settlement
    pub total_units_at_settlement: Amount,
}

impl Bucket {
    /// An unsettled bucket with nothing pending holds no position at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.settled && self.pending_input.is_zero()
    }

    /// Floor-division share of the settled output for `units` claim units
    pub fn payout_for(&self, key: BucketKey, units: Amount) -> EngineResult<Amount> {
        if !self.settled {
            return Err(EngineError::NotSettled(key));
        }
        self.claimable_output
            .mul_div_floor(units, self.total_units_at_settlement)
            .ok_or(EngineError::Overflow)
    }
}

/// All order buckets, keyed by (market, usable tick, direction)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketLedger {
    buckets: FxHashMap<BucketKey, Bucket>,
}

impl BucketLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket state, if one exists at `key`
    #[must_use]
    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    /// Number of live buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no buckets exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Add `amount` of pending input at `key`, creating the bucket lazily
    pub fn deposit(&mut self, key: BucketKey, amount: Amount) -> EngineResult<()> {
        if amount.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        let bucket = self.buckets.entry(key).or_default();
        if bucket.settled {
            return Err(EngineError::AlreadySettled(key));
        }
        bucket.pending_input = bucket
            .pending_input
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;
        Ok(())
    }

    /// Remove `amount` of pending input from an unsettled bucket
    ///
    /// A bucket drained to zero is deleted so the key can be reused by a
    /// later deposit.
    pub fn withdraw(&mut self, key: BucketKey, amount: Amount) -> EngineResult<Amount> {
        if amount.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return Err(EngineError::InsufficientUnits {
                have: Amount::ZERO,
                need: amount,
            });
        };
        if bucket.settled {
            return Err(EngineError::AlreadySettled(key));
        }
        bucket.pending_input =
            bucket
                .pending_input
                .checked_sub(amount)
                .ok_or(EngineError::InsufficientUnits {
                    have: bucket.pending_input,
                    need: amount,
                })?;
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        Ok(amount)
    }

    /// One-shot settlement: fix the output and freeze the bucket
    ///
    /// `total_units` is the claim-unit supply at this instant, snapshotted
    /// for later pro-rata redemption.
    pub fn settle(
        &mut self,
        key: BucketKey,
        output: Amount,
        total_units: Amount,
    ) -> EngineResult<()> {
        // A missing bucket has nothing pending; same failure as zero input.
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return Err(EngineError::ZeroAmount);
        };
        if bucket.settled {
            return Err(EngineError::AlreadySettled(key));
        }
        if bucket.pending_input.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        bucket.claimable_output = output;
        bucket.total_units_at_settlement = total_units;
        bucket.settled = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tickfill_common::{MarketId, OrderDirection, Tick};

    fn key() -> BucketKey {
        BucketKey::new(MarketId::new(1), Tick::new(60), OrderDirection::ZeroForOne)
    }

    #[test]
    fn deposit_then_withdraw_round_trips() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(500)).unwrap();
        let returned = ledger.withdraw(key(), Amount::new(500)).unwrap();
        assert_eq!(returned, Amount::new(500));
        // Drained bucket is gone and the key is reusable.
        assert!(ledger.get(&key()).is_none());
        ledger.deposit(key(), Amount::new(1)).unwrap();
        assert_eq!(ledger.get(&key()).unwrap().pending_input, Amount::new(1));
    }

    #[test]
    fn zero_deposit_rejected() {
        let mut ledger = BucketLedger::new();
        assert_eq!(
            ledger.deposit(key(), Amount::ZERO).unwrap_err(),
            EngineError::ZeroAmount
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn deposits_accumulate_across_depositors() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(3)).unwrap();
        ledger.deposit(key(), Amount::new(7)).unwrap();
        assert_eq!(ledger.get(&key()).unwrap().pending_input, Amount::new(10));
    }

    #[test]
    fn withdraw_beyond_pending_fails() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(5)).unwrap();
        let err = ledger.withdraw(key(), Amount::new(6)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientUnits {
                have: Amount::new(5),
                need: Amount::new(6),
            }
        );
    }

    #[test]
    fn settlement_is_one_shot() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(10)).unwrap();
        ledger
            .settle(key(), Amount::new(25), Amount::new(10))
            .unwrap();

        let bucket = *ledger.get(&key()).unwrap();
        assert_eq!(
            bucket,
            Bucket {
                pending_input: Amount::new(10),
                claimable_output: Amount::new(25),
                settled: true,
                total_units_at_settlement: Amount::new(10),
            }
        );

        assert_eq!(
            ledger
                .settle(key(), Amount::new(25), Amount::new(10))
                .unwrap_err(),
            EngineError::AlreadySettled(key())
        );
    }

    #[test]
    fn settled_bucket_rejects_deposit_and_withdraw() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(10)).unwrap();
        ledger
            .settle(key(), Amount::new(20), Amount::new(10))
            .unwrap();
        assert_eq!(
            ledger.deposit(key(), Amount::new(1)).unwrap_err(),
            EngineError::AlreadySettled(key())
        );
        assert_eq!(
            ledger.withdraw(key(), Amount::new(1)).unwrap_err(),
            EngineError::AlreadySettled(key())
        );
    }

    #[test]
    fn empty_bucket_cannot_settle() {
        let mut ledger = BucketLedger::new();
        ledger.deposit(key(), Amount::new(10)).unwrap();
        ledger.withdraw(key(), Amount::new(10)).unwrap();
        // Bucket removed entirely.
        assert!(ledger
            .settle(key(), Amount::new(1), Amount::new(1))
            .is_err());
    }

    #[test]
    fn payout_floors_and_requires_settlement() {
        let mut bucket = Bucket {
            pending_input: Amount::new(10),
            ..Bucket::default()
        };
        assert_eq!(
            bucket.payout_for(key(), Amount::new(1)).unwrap_err(),
            EngineError::NotSettled(key())
        );

        bucket.settled = true;
        bucket.claimable_output = Amount::new(100);
        bucket.total_units_at_settlement = Amount::new(3);
        assert_eq!(
            bucket.payout_for(key(), Amount::new(1)).unwrap(),
            Amount::new(33)
        );
        assert_eq!(
            bucket.payout_for(key(), Amount::new(3)).unwrap(),
            Amount::new(100)
        );
    }
}
