//! Claim accounting
//!
//! Fungible claim units minted 1:1 with deposited input per bucket key.
//! Pure bookkeeping: the only semantics are conservation (per key, the sum
//! of balances always equals the supply) and that mint/burn are the sole
//! mutators. The engine takes the ledger as an injected collaborator so
//! callers can substitute their own receipt mechanism.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tickfill_common::{AccountId, Amount, BucketKey, EngineError, EngineResult};

/// Narrow interface over a multi-asset fungible claim ledger
pub trait ClaimLedger {
    /// Credit `amount` units of `key` to `holder`
    fn mint(&mut self, key: BucketKey, holder: AccountId, amount: Amount) -> EngineResult<()>;

    /// Debit `amount` units of `key` from `holder`
    ///
    /// Fails with `InsufficientBalance` if the holder has fewer units.
    fn burn(&mut self, key: BucketKey, holder: AccountId, amount: Amount) -> EngineResult<()>;

    /// Units of `key` held by `holder` (zero if never minted)
    fn balance_of(&self, key: BucketKey, holder: AccountId) -> Amount;

    /// Outstanding units of `key` across all holders
    fn total_supply(&self, key: BucketKey) -> Amount;
}

/// Hash-map claim ledger used in production and tests alike
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryClaimLedger {
    balances: FxHashMap<(BucketKey, AccountId), Amount>,
    supplies: FxHashMap<BucketKey, Amount>,
}

impl InMemoryClaimLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimLedger for InMemoryClaimLedger {
    fn mint(&mut self, key: BucketKey, holder: AccountId, amount: Amount) -> EngineResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let supply = self.supplies.entry(key).or_default();
        *supply = supply.checked_add(amount).ok_or(EngineError::Overflow)?;
        let balance = self.balances.entry((key, holder)).or_default();
        *balance = balance.checked_add(amount).ok_or(EngineError::Overflow)?;
        Ok(())
    }

    fn burn(&mut self, key: BucketKey, holder: AccountId, amount: Amount) -> EngineResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let have = self.balance_of(key, holder);
        let remaining = have
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientBalance { have, need: amount })?;
        if remaining.is_zero() {
            self.balances.remove(&(key, holder));
        } else {
            self.balances.insert((key, holder), remaining);
        }
        // Supply cannot underflow while balances are conserved.
        let supply = self.supplies.entry(key).or_default();
        *supply = supply.checked_sub(amount).ok_or(EngineError::Overflow)?;
        if supply.is_zero() {
            self.supplies.remove(&key);
        }
        Ok(())
    }

    fn balance_of(&self, key: BucketKey, holder: AccountId) -> Amount {
        self.balances
            .get(&(key, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn total_supply(&self, key: BucketKey) -> Amount {
        self.supplies.get(&key).copied().unwrap_or(Amount::ZERO)
    }
}
