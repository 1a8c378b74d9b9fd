//! Core newtypes for the tickfill engine
//!
//! All quantities are exact integers. Arithmetic helpers are checked; the
//! engine never rounds except for the floor division in pro-rata payouts.

use ruint::aliases::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an external market (pair/fee/spacing configuration)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarketId(pub u32);

impl MarketId {
    /// Create a new market identifier
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MKT_{}", self.0)
    }
}

/// Identifier of a claim-unit holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Create a new account identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACCT_{}", self.0)
    }
}

/// Discretized price coordinate
///
/// Usable ticks are multiples of a market's tick spacing; raw ticks can be
/// anything inside the market's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(i32);

impl Tick {
    /// Create a tick from a raw index
    #[must_use]
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    /// Raw tick index
    #[must_use]
    pub const fn index(self) -> i32 {
        self.0
    }

    /// Tick zero
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exact integer asset quantity
///
/// Wide enough for 1e18-scale token amounts. All arithmetic is checked;
/// overflow surfaces as an error at the call site, never as a wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Create an amount from raw units
    #[must_use]
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Raw unit count
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Whether this amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// `self * numerator / denominator` with floor division
    ///
    /// The product is taken at 256-bit width, so the intermediate never
    /// overflows even for 1e18-scale operands. Returns `None` only on a zero
    /// denominator or when the quotient itself exceeds `u128`. Used for
    /// pro-rata payout apportionment.
    #[must_use]
    pub fn mul_div_floor(self, numerator: Self, denominator: Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let quotient = U256::from(self.0) * U256::from(numerator.0) / U256::from(denominator.0);
        if quotient > U256::from(u128::MAX) {
            return None;
        }
        Some(Self(quotient.to::<u128>()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a market's two assets an order sells for the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Sell asset0 for asset1; profits when the price rises past the target
    ZeroForOne,
    /// Sell asset1 for asset0; profits when the price falls past the target
    OneForZero,
}

impl OrderDirection {
    /// The mirror direction
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::ZeroForOne => Self::OneForZero,
            Self::OneForZero => Self::ZeroForOne,
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroForOne => write!(f, "0->1"),
            Self::OneForZero => write!(f, "1->0"),
        }
    }
}

/// Identity of an order bucket: one (market, usable tick, direction) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    /// Market the bucket rests on
    pub market: MarketId,
    /// Usable tick the bucket fills at
    pub tick: Tick,
    /// Side the bucket sells
    pub direction: OrderDirection,
}

impl BucketKey {
    /// Create a bucket key
    #[must_use]
    pub const fn new(market: MarketId, tick: Tick, direction: OrderDirection) -> Self {
        Self {
            market,
            tick,
            direction,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.market, self.tick, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn amount_checked_arithmetic() {
        let a = Amount::new(10);
        let b = Amount::new(3);
        assert_eq!(a.checked_add(b), Some(Amount::new(13)));
        assert_eq!(a.checked_sub(b), Some(Amount::new(7)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn amount_mul_div_floors() {
        let output = Amount::new(100);
        // 100 * 1 / 3 floors to 33
        assert_eq!(
            output.mul_div_floor(Amount::new(1), Amount::new(3)),
            Some(Amount::new(33))
        );
        assert_eq!(output.mul_div_floor(Amount::new(1), Amount::ZERO), None);
        assert_eq!(
            Amount::new(u128::MAX).mul_div_floor(Amount::new(2), Amount::new(1)),
            None
        );
    }

    #[test]
    fn amount_mul_div_survives_wide_intermediate() {
        // 1e18-scale operands: the raw product exceeds u128 but the
        // quotient does not.
        let e18 = 1_000_000_000_000_000_000u128;
        let output = Amount::new(400 * e18);
        let units = Amount::new(200 * e18);
        let total = Amount::new(200 * e18);
        assert_eq!(output.mul_div_floor(units, total), Some(output));

        // Half the units claim half the output.
        let half = Amount::new(100 * e18);
        assert_eq!(
            output.mul_div_floor(half, total),
            Some(Amount::new(200 * e18))
        );

        // The quotient itself can still exceed u128.
        assert_eq!(
            Amount::new(u128::MAX).mul_div_floor(Amount::new(u128::MAX), Amount::new(1)),
            None
        );
    }

    #[rstest]
    #[case(OrderDirection::OneForZero, "MKT_7@-120/1->0")]
    #[case(OrderDirection::ZeroForOne, "MKT_7@-120/0->1")]
    fn bucket_key_display(#[case] direction: OrderDirection, #[case] expected: &str) {
        let key = BucketKey::new(MarketId::new(7), Tick::new(-120), direction);
        assert_eq!(key.to_string(), expected);
    }

    #[test]
    fn bucket_key_serde_round_trip() {
        let key = BucketKey::new(MarketId::new(3), Tick::new(60), OrderDirection::ZeroForOne);
        let json = serde_json::to_string(&key).unwrap();
        let back: BucketKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn direction_opposite_round_trips() {
        assert_eq!(
            OrderDirection::ZeroForOne.opposite(),
            OrderDirection::OneForZero
        );
        assert_eq!(
            OrderDirection::OneForZero.opposite().opposite(),
            OrderDirection::OneForZero
        );
    }
}
