//! Price-tick space
//!
//! Usable-tick rounding and the ordered walk over ticks crossed by a price
//! move. Rounding is floor division toward negative infinity, identical for
//! both order directions; direction only decides which bucket a tick maps to.

use tickfill_common::{EngineError, EngineResult, OrderDirection, Tick};

/// Round a raw tick down to the nearest multiple of `spacing`
///
/// Floor is toward negative infinity: raw −100 with spacing 60 rounds to
/// −120, not −60. Rejects a zero spacing; bounds checking against a market's
/// min/max is the caller's job (see `MarketConfig::usable_tick`).
pub fn usable_tick(raw: Tick, spacing: u16) -> EngineResult<Tick> {
    if spacing == 0 {
        return Err(EngineError::InvalidTick(
            "tick spacing must be positive".to_string(),
        ));
    }
    let s = i32::from(spacing);
    Ok(Tick::new(raw.index().div_euclid(s) * s))
}

/// Direction the market's price moved during a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMovement {
    /// Price increased
    Up,
    /// Price decreased
    Down,
}

impl PriceMovement {
    /// Movement from `prev` to `new`, or `None` if the tick did not change
    #[must_use]
    pub fn between(prev: Tick, new: Tick) -> Option<Self> {
        match new.index().cmp(&prev.index()) {
            std::cmp::Ordering::Greater => Some(Self::Up),
            std::cmp::Ordering::Less => Some(Self::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The order side a crossing in this movement fills
    ///
    /// An upward crossing reaches sell-asset0 targets from below; a downward
    /// crossing is the mirror.
    #[must_use]
    pub const fn fill_direction(self) -> OrderDirection {
        match self {
            Self::Up => OrderDirection::ZeroForOne,
            Self::Down => OrderDirection::OneForZero,
        }
    }
}

/// Ordered iterator over the usable ticks a price move crossed
///
/// Built by [`crossed_ticks`]. Yields in strict price order: ascending for an
/// upward move, descending for a downward one. Each tick is yielded at most
/// once per trade; consecutive trades never revisit a tick because both
/// bounds are strict against the raw tick the previous trade rested at.
#[derive(Debug, Clone)]
pub struct CrossedTicks {
    next: i32,
    last: i32,
    step: i32,
    exhausted: bool,
}

/// Walk the usable ticks crossed moving from raw tick `prev` to raw `new`
///
/// A usable tick counts as crossed only once the raw price actually reached
/// it. Upward: yields the multiples `t` of `spacing` with `prev < t <= new`,
/// ascending. Downward: the mirror, `new <= t < prev`, descending. An
/// unchanged tick yields nothing. Bounds come from the raw ticks, not their
/// floors: a move stopping short of the next multiple crosses nothing, and a
/// move off an exact multiple leaves that multiple behind without revisiting
/// it.
#[must_use]
pub fn crossed_ticks(prev: Tick, new: Tick, spacing: u16) -> CrossedTicks {
    let s = i32::from(spacing);
    let (prev, new) = (prev.index(), new.index());
    debug_assert!(s > 0);

    if new > prev {
        // Smallest multiple above prev, largest at or below new.
        let first = prev.div_euclid(s) * s + s;
        let last = new.div_euclid(s) * s;
        CrossedTicks {
            next: first,
            last,
            step: s,
            exhausted: first > last,
        }
    } else if new < prev {
        // Largest multiple below prev, smallest at or above new.
        let floor_prev = prev.div_euclid(s) * s;
        let first = if floor_prev == prev {
            prev - s
        } else {
            floor_prev
        };
        let floor_new = new.div_euclid(s) * s;
        let last = if floor_new == new { new } else { floor_new + s };
        CrossedTicks {
            next: first,
            last,
            step: -s,
            exhausted: first < last,
        }
    } else {
        CrossedTicks {
            next: prev,
            last: prev,
            step: s,
            exhausted: true,
        }
    }
}

impl Iterator for CrossedTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.exhausted {
            return None;
        }
        let tick = self.next;
        if tick == self.last {
            self.exhausted = true;
        } else {
            self.next += self.step;
        }
        Some(Tick::new(tick))
    }
}
