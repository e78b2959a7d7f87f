//! Tiered margin interest-rate lookup.

use serde::{Deserialize, Serialize};

/// One rate band: balances in `[min, max)` borrow at `rate` percent
/// annualized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    pub min: f64,
    pub max: f64,
    pub rate: f64,
}

impl RateBand {
    pub const fn new(min: f64, max: f64, rate: f64) -> Self {
        Self { min, max, rate }
    }

    /// Whether a balance falls inside this band's half-open range.
    pub fn contains(&self, balance: f64) -> bool {
        self.min <= balance && balance < self.max
    }
}

/// Standard annualized margin rates, from the TD Ameritrade price sheet as
/// of June 2021. Bands are half-open and contiguous: each band's `min` is
/// the previous band's `max`, so no balance below the last edge falls in a
/// gap.
pub const STANDARD_RATE_BANDS: [RateBand; 6] = [
    RateBand::new(0.0, 10_000.0, 9.50),
    RateBand::new(10_000.0, 25_000.0, 9.25),
    RateBand::new(25_000.0, 50_000.0, 9.00),
    RateBand::new(50_000.0, 100_000.0, 8.00),
    RateBand::new(100_000.0, 250_000.0, 7.75),
    RateBand::new(250_000.0, 500_000.0, 7.50),
];

/// Annualized margin interest rate for a cash balance.
///
/// Non-positive balances are clamped to zero before lookup. Balances at or
/// above the last band's edge resolve to the lowest rate in the table.
pub fn margin_interest_rate(balance: f64) -> f64 {
    let balance = balance.max(0.0);
    for band in &STANDARD_RATE_BANDS {
        if band.contains(balance) {
            return band.rate;
        }
    }
    lowest_rate(&STANDARD_RATE_BANDS)
}

/// The fallback rate: the lowest rate anywhere in the table.
fn lowest_rate(bands: &[RateBand]) -> f64 {
    bands
        .iter()
        .map(|band| band.rate)
        .fold(f64::INFINITY, f64::min)
}
