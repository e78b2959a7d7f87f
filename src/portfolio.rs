//! Position grouping and portfolio-level valuation.

use crate::cost::{BalanceChange, CostModel};
use crate::error::Result;
use crate::order::{Order, Orders};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A named, possibly multi-leg group of orders sharing one grouping key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub key: String,
    pub orders: Orders,
}

impl Position {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            orders: Orders::new(),
        }
    }

    /// Every distinct symbol referenced by any contained order, sorted
    /// lexicographically.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .orders
            .iter()
            .flat_map(|order| order.items())
            .map(|item| item.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    /// Whether every symbol traded in this position has been fully
    /// unwound.
    pub fn is_closed(&self) -> bool {
        self.orders.is_closed()
    }
}

/// The full set of positions plus the cost model used to value them.
///
/// Valuation takes `&mut self` because a ramp-up cost model mutates its
/// fee escalation on every call; a portfolio belongs to one sequential
/// backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    positions: HashMap<String, Orders>,
    cost_model: CostModel,
}

impl Portfolio {
    /// Create an empty portfolio valued by the given cost model.
    pub fn new(cost_model: CostModel) -> Self {
        Self {
            positions: HashMap::new(),
            cost_model,
        }
    }

    /// Append an order to the position for a grouping key, creating the
    /// position on first use.
    pub fn add_order(&mut self, key: impl Into<String>, order: Order) {
        let key = key.into();
        debug!(
            "Recording {} order of {} items for {}",
            order.order_type,
            order.len(),
            key
        );
        self.positions.entry(key).or_default().push(order);
    }

    /// The order ledger for a grouping key.
    pub fn position(&self, key: &str) -> Option<&Orders> {
        self.positions.get(key)
    }

    /// Grouping keys currently in the book, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.positions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether the position for a key is fully unwound. Unknown keys are
    /// vacuously closed.
    pub fn is_closed(&self, key: &str) -> bool {
        self.positions
            .get(key)
            .map(Orders::is_closed)
            .unwrap_or(true)
    }

    /// The cost model valuing this portfolio.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Replace the cost model.
    pub fn set_cost_model(&mut self, cost_model: CostModel) {
        self.cost_model = cost_model;
    }

    /// Value one position: opening-stage orders through the cost model's
    /// open computation, closing-stage orders through its close
    /// computation, summed in ledger order. An unknown key values to zero.
    pub fn position_value(&mut self, key: &str) -> Result<BalanceChange> {
        let Some(orders) = self.positions.get(key) else {
            return Ok(BalanceChange::default());
        };

        let mut total = BalanceChange::default();
        for order in orders {
            let change = if order.order_type.is_opening() {
                self.cost_model.balance_change_on_open(order)?
            } else {
                self.cost_model.balance_change_on_close(order)?
            };
            total.cash += change.cash;
            total.margin += change.margin;
        }
        Ok(total)
    }

    /// Value the whole book, position by position in key order.
    pub fn value(&mut self) -> Result<BalanceChange> {
        let keys: Vec<String> = {
            let mut keys: Vec<String> = self.positions.keys().cloned().collect();
            keys.sort_unstable();
            keys
        };

        let mut total = BalanceChange::default();
        for key in keys {
            let change = self.position_value(&key)?;
            total.cash += change.cash;
            total.margin += change.margin;
        }
        Ok(total)
    }
}
