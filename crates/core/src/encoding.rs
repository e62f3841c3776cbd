//! Fixed-point encoding for store annotations.
//!
//! The backing store indexes only exact integers and strings, so every
//! floating-point domain value is scaled to a fixed decimal before it is
//! written or embedded in a query: USD amounts become cents (×100), rates
//! become basis points (×10,000). Thresholds in query expressions go through
//! the same functions so a query compares like with like.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Scale factor for USD amounts (cents).
pub const USD_SCALE: i64 = 100;

/// Scale factor for percentage rates (basis points).
pub const RATE_SCALE: i64 = 10_000;

/// Encodes a USD amount as integer cents, rounding to the nearest cent.
#[must_use]
pub fn encode_usd(amount: Decimal) -> i64 {
    // Half-away-from-zero, not the Decimal default of banker's rounding:
    // 1.005 USD must become 101 cents.
    (amount * Decimal::from(USD_SCALE))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Decodes integer cents back to a USD amount.
#[must_use]
pub fn decode_usd(cents: i64) -> Decimal {
    Decimal::from(cents) / Decimal::from(USD_SCALE)
}

/// Encodes a percentage rate as integer basis points.
#[must_use]
pub fn encode_rate(rate: Decimal) -> i64 {
    (rate * Decimal::from(RATE_SCALE))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Decodes integer basis points back to a percentage rate.
#[must_use]
pub fn decode_rate(basis_points: i64) -> Decimal {
    Decimal::from(basis_points) / Decimal::from(RATE_SCALE)
}

/// Encodes an optional rate for storage.
///
/// Returns `None` for absent, zero, and negative rates: the store cannot
/// index signed or zero-valued rate annotations without colliding with
/// "field absent", so those values are dropped rather than stored. A record
/// with `apy = 0` is indistinguishable, after storage, from one with `apy`
/// absent.
#[must_use]
pub fn encode_positive_rate(rate: Option<Decimal>) -> Option<i64> {
    rate.map(encode_rate).filter(|&bps| bps > 0)
}
