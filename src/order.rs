//! Timestamped, lifecycle-tagged batches of trade records.

use crate::record::TradeRecord;
use crate::types::{OrderType, TradeDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A batch of trade records purchased or sold in a single instant.
///
/// Items are moved in by value, so the ledger never aliases a caller's
/// record. For backtesting, all orders are assumed filled immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_type: OrderType,
    /// Unix timestamp the whole batch was placed at.
    pub unix_time: i64,
    items: Vec<TradeRecord>,
}

impl Order {
    pub fn new(
        order_type: OrderType,
        timestamp: DateTime<Utc>,
        items: impl IntoIterator<Item = TradeRecord>,
    ) -> Self {
        Self {
            order_type,
            unix_time: timestamp.timestamp(),
            items: items.into_iter().collect(),
        }
    }

    /// Add an item at the end of the batch.
    pub fn append(&mut self, item: TradeRecord) {
        self.items.push(item);
    }

    /// Add an item at a position, shifting later items right. An index past
    /// the end appends.
    pub fn insert_item(&mut self, index: usize, item: TradeRecord) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove the item at a position, or `None` when out of bounds.
    pub fn remove_item(&mut self, index: usize) -> Option<TradeRecord> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// The records in this batch, in insertion order.
    pub fn items(&self) -> &[TradeRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The ledger for one grouping key: an ordered sequence of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orders(Vec<Order>);

impl Orders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.0.push(order);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every symbol bought has been fully sold back, and vice
    /// versa.
    ///
    /// Buys add to a symbol's running amount, everything else subtracts;
    /// a symbol leaves the book when its running amount is exactly zero.
    /// The comparison is exact floating point, so amounts accumulated from
    /// repeated fractional fills may never cancel.
    pub fn is_closed(&self) -> bool {
        let mut running: HashMap<&str, f64> = HashMap::new();
        for order in &self.0 {
            for item in order.items() {
                let entry = running.entry(item.symbol.as_str()).or_insert(0.0);
                if item.direction == TradeDirection::Buy {
                    *entry += item.amount;
                } else {
                    *entry -= item.amount;
                }
                if *entry == 0.0 {
                    running.remove(item.symbol.as_str());
                }
            }
        }
        running.is_empty()
    }

    /// Orders that seeded capital into the portfolio.
    pub fn funds_added(&self) -> Orders {
        self.filter_by_type(OrderType::PortfolioOpen)
    }

    /// Orders that removed capital from the portfolio.
    pub fn funds_removed(&self) -> Orders {
        self.filter_by_type(OrderType::PortfolioClose)
    }

    /// Orders that entered a position.
    pub fn entries(&self) -> Orders {
        self.filter_by_type(OrderType::PositionOpen)
    }

    /// Orders that exited a position.
    pub fn exits(&self) -> Orders {
        self.filter_by_type(OrderType::PositionClose)
    }

    /// Mid-life adjustment orders.
    pub fn adjustments(&self) -> Orders {
        self.filter_by_type(OrderType::PositionAdjustment)
    }

    fn filter_by_type(&self, order_type: OrderType) -> Orders {
        self.0
            .iter()
            .filter(|order| order.order_type == order_type)
            .cloned()
            .collect()
    }
}

impl From<Vec<Order>> for Orders {
    fn from(orders: Vec<Order>) -> Self {
        Self(orders)
    }
}

impl FromIterator<Order> for Orders {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Orders {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Orders {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeSchedule;
    use chrono::TimeZone;

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    fn stock(direction: TradeDirection, amount: f64) -> TradeRecord {
        TradeRecord::stock(&FeeSchedule::free(), direction, "ABC", amount, 10.0).unwrap()
    }

    fn order_of(order_type: OrderType, items: Vec<TradeRecord>) -> Order {
        Order::new(order_type, sample_timestamp(), items)
    }

    #[test]
    fn test_order_item_editing() {
        let mut order = order_of(OrderType::PositionOpen, vec![stock(TradeDirection::Buy, 100.0)]);
        assert_eq!(order.unix_time, sample_timestamp().timestamp());

        order.append(stock(TradeDirection::Buy, 50.0));
        order.insert_item(1, stock(TradeDirection::Sell, 25.0));
        assert_eq!(order.len(), 3);
        assert_eq!(order.items()[1].direction, TradeDirection::Sell);

        // Past-the-end insert appends.
        order.insert_item(99, stock(TradeDirection::Sell, 10.0));
        assert_eq!(order.items()[3].amount, 10.0);

        let removed = order.remove_item(1).unwrap();
        assert_eq!(removed.amount, 25.0);
        assert_eq!(order.len(), 3);
        assert!(order.remove_item(99).is_none());
    }

    #[test]
    fn test_is_closed_fully_unwound() {
        let mut orders = Orders::new();
        orders.push(order_of(
            OrderType::PositionOpen,
            vec![stock(TradeDirection::Buy, 100.0)],
        ));
        orders.push(order_of(
            OrderType::PositionClose,
            vec![stock(TradeDirection::Sell, 100.0)],
        ));
        assert!(orders.is_closed());
    }

    #[test]
    fn test_is_closed_partial_unwind() {
        let mut orders = Orders::new();
        orders.push(order_of(
            OrderType::PositionOpen,
            vec![stock(TradeDirection::Buy, 100.0)],
        ));
        orders.push(order_of(
            OrderType::PositionClose,
            vec![stock(TradeDirection::Sell, 50.0)],
        ));
        assert!(!orders.is_closed());
    }

    #[test]
    fn test_is_closed_empty_ledger() {
        assert!(Orders::new().is_closed());
    }

    #[test]
    fn test_lifecycle_filters_preserve_order() {
        let mut orders = Orders::new();
        orders.push(order_of(OrderType::PortfolioOpen, vec![]));
        orders.push(order_of(
            OrderType::PositionOpen,
            vec![stock(TradeDirection::Buy, 10.0)],
        ));
        orders.push(order_of(
            OrderType::PositionOpen,
            vec![stock(TradeDirection::Buy, 20.0)],
        ));
        orders.push(order_of(OrderType::PositionAdjustment, vec![]));
        orders.push(order_of(OrderType::PositionClose, vec![]));
        orders.push(order_of(OrderType::PortfolioClose, vec![]));

        assert_eq!(orders.funds_added().len(), 1);
        assert_eq!(orders.funds_removed().len(), 1);
        assert_eq!(orders.exits().len(), 1);
        assert_eq!(orders.adjustments().len(), 1);

        let entries = orders.entries();
        assert_eq!(entries.len(), 2);
        let amounts: Vec<f64> = entries
            .iter()
            .map(|order| order.items()[0].amount)
            .collect();
        assert_eq!(amounts, vec![10.0, 20.0]);

        // Filters never mutate the source.
        assert_eq!(orders.len(), 6);
    }
}
