//! Transaction fee schedules, keyed by equity type.

use crate::types::EquityType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The three fee components charged when a record trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFee {
    /// Flat exchange fee charged per order item.
    #[serde(default)]
    pub exchange: f64,
    /// Flat broker fee charged per order.
    #[serde(default)]
    pub order: f64,
    /// Fee charged per unit of amount traded.
    #[serde(default)]
    pub amount: f64,
}

impl TransactionFee {
    pub fn new(exchange: f64, order: f64, amount: f64) -> Self {
        Self {
            exchange,
            order,
            amount,
        }
    }

    /// Scale every component by a factor. Used by the ramp-up cost model.
    pub(crate) fn scale(&mut self, factor: f64) {
        self.exchange *= factor;
        self.order *= factor;
        self.amount *= factor;
    }
}

/// Per-equity-type fee configuration.
///
/// A schedule may be partial; pricing a record whose equity type has no
/// entry fails rather than silently assuming zero fees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    fees: HashMap<EquityType, TransactionFee>,
}

impl FeeSchedule {
    /// An empty schedule with no fees configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// A schedule charging nothing for all four equity types.
    pub fn free() -> Self {
        let mut schedule = Self::new();
        for equity_type in EquityType::ALL {
            schedule.fees.insert(equity_type, TransactionFee::default());
        }
        schedule
    }

    /// The canonical schedule, from fees posted by TD Ameritrade and
    /// Coinbase: cash is free to hold and exchange, stocks carry an
    /// exchange fee, options an exchange and per-contract fee, and crypto
    /// a flat per-order fee.
    pub fn standard() -> Self {
        Self::new()
            .with_fee(EquityType::Cash, TransactionFee::default())
            .with_fee(EquityType::Stock, TransactionFee::new(0.75, 0.0, 0.0))
            .with_fee(EquityType::Option, TransactionFee::new(0.75, 0.0, 0.65))
            .with_fee(EquityType::Crypto, TransactionFee::new(0.0, 0.99, 0.0))
    }

    /// Set the fee for one equity type, builder style.
    pub fn with_fee(mut self, equity_type: EquityType, fee: TransactionFee) -> Self {
        self.fees.insert(equity_type, fee);
        self
    }

    /// Look up the fee for an equity type, if configured.
    pub fn fee(&self, equity_type: EquityType) -> Option<&TransactionFee> {
        self.fees.get(&equity_type)
    }

    /// Whether all four equity types have a configured fee.
    pub fn is_complete(&self) -> bool {
        EquityType::ALL
            .iter()
            .all(|equity_type| self.fees.contains_key(equity_type))
    }

    /// Scale every fee component of every equity type by a factor.
    pub(crate) fn scale(&mut self, factor: f64) {
        for fee in self.fees.values_mut() {
            fee.scale(factor);
        }
    }
}
