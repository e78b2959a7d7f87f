//! Cost models converting an order batch into cash and margin deltas.

use crate::error::{LedgerError, Result};
use crate::fees::FeeSchedule;
use crate::order::Order;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use tracing::debug;

/// Signed cash and margin effect of opening or closing an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Cash paid out (negative) or received (positive), fees included.
    pub cash: f64,
    /// Margin consumed (positive) or released (negative).
    pub margin: f64,
}

impl BalanceChange {
    pub fn new(cash: f64, margin: f64) -> Self {
        Self { cash, margin }
    }
}

impl Neg for BalanceChange {
    type Output = BalanceChange;

    fn neg(self) -> BalanceChange {
        BalanceChange {
            cash: -self.cash,
            margin: -self.margin,
        }
    }
}

/// Pricing engine computing the cost of an order batch.
///
/// Closing an order is always the exact additive inverse of what opening
/// it would currently compute; close results are produced by negating the
/// open computation, never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum CostModel {
    /// No trading, maintenance, or brokerage fees, and no margin use.
    /// A benchmark for the theoretical optimum, not a realistic backtest.
    NoFee,
    /// The usual per-item, per-order, and per-unit fees apply.
    Standard { fees: FeeSchedule },
    /// Fees escalate by a fixed percentage before every open and
    /// de-escalate before every close, simulating a volatile or
    /// adversarial market that punishes repeated entries.
    ///
    /// The escalation level is call-order-dependent instance state: one
    /// model belongs to one sequential backtest run, and reproducing a fee
    /// trajectory means replaying the same calls against a fresh or
    /// `reset` model.
    RampUp {
        fees: FeeSchedule,
        increase_pct: f64,
        /// Current escalation level; starts at zero.
        #[serde(default)]
        level: i32,
    },
}

impl CostModel {
    /// A fee-free benchmark model.
    pub fn no_fee() -> Self {
        CostModel::NoFee
    }

    /// A standard model with the given schedule.
    pub fn standard(fees: FeeSchedule) -> Self {
        CostModel::Standard { fees }
    }

    /// The pre-canned standard model using the canonical fee schedule.
    pub fn default_standard() -> Self {
        CostModel::Standard {
            fees: FeeSchedule::standard(),
        }
    }

    /// A ramp-up model starting from the given schedule.
    pub fn ramp_up(fees: FeeSchedule, increase_pct: f64) -> Self {
        CostModel::RampUp {
            fees,
            increase_pct,
            level: 0,
        }
    }

    /// Cash and margin effect of opening the order under this model.
    pub fn balance_change_on_open(&mut self, order: &Order) -> Result<BalanceChange> {
        match self {
            CostModel::NoFee => no_fee_change(order),
            CostModel::Standard { fees } => fee_change(fees, order),
            CostModel::RampUp {
                fees,
                increase_pct,
                level,
            } => {
                *level += 1;
                let change = fee_change(&escalated(fees, *increase_pct, *level), order)?;
                debug!("ramp-up open at level {}: cash {:.4}", level, change.cash);
                Ok(change)
            }
        }
    }

    /// Cash and margin effect of closing the order under this model: the
    /// exact negation of the open computation at the current fee state.
    pub fn balance_change_on_close(&mut self, order: &Order) -> Result<BalanceChange> {
        match self {
            CostModel::NoFee => Ok(-no_fee_change(order)?),
            CostModel::Standard { fees } => Ok(-fee_change(fees, order)?),
            CostModel::RampUp {
                fees,
                increase_pct,
                level,
            } => {
                *level -= 1;
                let change = fee_change(&escalated(fees, *increase_pct, *level), order)?;
                Ok(-change)
            }
        }
    }

    /// The fee schedule as currently in effect: the configured schedule
    /// for standard models, the escalated one for ramp-up models, and all
    /// zeroes for the fee-free model.
    pub fn effective_fees(&self) -> FeeSchedule {
        match self {
            CostModel::NoFee => FeeSchedule::free(),
            CostModel::Standard { fees } => fees.clone(),
            CostModel::RampUp {
                fees,
                increase_pct,
                level,
            } => escalated(fees, *increase_pct, *level),
        }
    }

    /// Drop any accumulated ramp-up escalation, for reuse across runs.
    /// No-op for the other variants.
    pub fn reset(&mut self) {
        if let CostModel::RampUp { level, .. } = self {
            *level = 0;
        }
    }
}

/// Sum of bare notionals; no fees, no margin.
fn no_fee_change(order: &Order) -> Result<BalanceChange> {
    let free = FeeSchedule::free();
    let change = fee_change(&free, order)?;
    Ok(BalanceChange::new(change.cash, 0.0))
}

/// Price every item under the schedule, summing cash and margin effects.
fn fee_change(fees: &FeeSchedule, order: &Order) -> Result<BalanceChange> {
    let mut cash = 0.0;
    let mut margin = 0.0;
    for item in order.items() {
        let fee = fees
            .fee(item.equity_type)
            .ok_or(LedgerError::OutOfRange(item.equity_type))?;
        cash += item.priced_with(fee);
        margin += item.margin_requirement();
    }
    Ok(BalanceChange::new(cash, margin))
}

/// The schedule scaled to an escalation level. Level zero returns the base
/// schedule unchanged, so a close immediately after an open restores the
/// pre-escalation fees exactly.
fn escalated(fees: &FeeSchedule, increase_pct: f64, level: i32) -> FeeSchedule {
    if level == 0 {
        return fees.clone();
    }
    let mut output = fees.clone();
    output.scale((1.0 + increase_pct).powi(level));
    output
}
