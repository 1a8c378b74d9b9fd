//! Engine-wide constants
//!
//! Single source of truth for tick bounds and default market parameters.

/// Lowest price tick any market may quote (concentrated-liquidity convention)
pub const MIN_TICK: i32 = -887_272;

/// Highest price tick any market may quote
pub const MAX_TICK: i32 = 887_272;

/// Default distance between usable ticks when a market does not override it
pub const DEFAULT_TICK_SPACING: u16 = 60;
