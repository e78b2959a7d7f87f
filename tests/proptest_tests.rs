//! Property-based tests using proptest for fuzzing and invariant testing.
//!
//! These tests verify that:
//! 1. Opposite mappings are involutions on every variant
//! 2. Cost-model open/close results are exact additive inverses
//! 3. Ramp-up escalation is strictly increasing and restores on close
//! 4. The margin-rate table is contiguous with no gaps or overlaps
//! 5. Funding failures never mutate the factory

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use tally::cost::CostModel;
use tally::factory::TradeRecordFactory;
use tally::fees::FeeSchedule;
use tally::margin::{margin_interest_rate, STANDARD_RATE_BANDS};
use tally::order::Order;
use tally::record::TradeRecord;
use tally::types::{OrderType, TradeDirection};

fn direction_strategy() -> impl Strategy<Value = TradeDirection> {
    prop_oneof![
        Just(TradeDirection::Buy),
        Just(TradeDirection::Neutral),
        Just(TradeDirection::Sell),
    ]
}

fn order_type_strategy() -> impl Strategy<Value = OrderType> {
    prop_oneof![
        Just(OrderType::PortfolioOpen),
        Just(OrderType::PortfolioClose),
        Just(OrderType::PositionOpen),
        Just(OrderType::PositionClose),
        Just(OrderType::PositionAdjustment),
    ]
}

/// A record of any tradable equity type with bounded amount and price.
fn record_strategy() -> impl Strategy<Value = TradeRecord> {
    (direction_strategy(), 0u8..3, 1.0..1000.0f64, 0.01..500.0f64).prop_map(
        |(direction, kind, amount, price)| {
            let fees = FeeSchedule::standard();
            match kind {
                0 => TradeRecord::stock(&fees, direction, "ABC", amount, price).unwrap(),
                1 => TradeRecord::option(
                    &fees,
                    direction,
                    "ABC CALL @ 10.0",
                    1_700_000_000,
                    10.0,
                    amount,
                    price,
                )
                .unwrap(),
                _ => TradeRecord::crypto(&fees, direction, "BTC", amount, price).unwrap(),
            }
        },
    )
}

fn order_strategy() -> impl Strategy<Value = Order> {
    proptest::collection::vec(record_strategy(), 0..8).prop_map(|records| {
        Order::new(
            OrderType::PositionOpen,
            Utc.with_ymd_and_hms(2021, 6, 1, 9, 30, 0).unwrap(),
            records,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // Opposite Mapping Tests
    // ========================================================================

    #[test]
    fn direction_opposite_is_an_involution(direction in direction_strategy()) {
        prop_assert_eq!(direction.opposite().opposite(), direction);
    }

    #[test]
    fn order_type_opposite_is_an_involution(order_type in order_type_strategy()) {
        prop_assert_eq!(order_type.opposite().opposite(), order_type);
    }

    #[test]
    fn record_opposite_preserves_everything_but_direction(record in record_strategy()) {
        let flipped = record.opposite();
        prop_assert_eq!(flipped.direction, record.direction.opposite());
        prop_assert_eq!(&flipped.symbol, &record.symbol);
        prop_assert_eq!(flipped.amount, record.amount);
        prop_assert_eq!(flipped.quantity_per_amount, record.quantity_per_amount);
        prop_assert_eq!(flipped.price, record.price);
        prop_assert_eq!(flipped.strike_price, record.strike_price);
        prop_assert_eq!(flipped.expiration_date, record.expiration_date);
    }

    // ========================================================================
    // Cost Model Inverse Tests
    // ========================================================================

    #[test]
    fn no_fee_close_is_exact_negation_of_open(order in order_strategy()) {
        let mut model = CostModel::no_fee();
        let open = model.balance_change_on_open(&order).unwrap();
        let close = model.balance_change_on_close(&order).unwrap();
        prop_assert_eq!(close.cash, -open.cash);
        prop_assert_eq!(close.margin, -open.margin);
        prop_assert_eq!(open.margin, 0.0);
    }

    #[test]
    fn standard_close_is_exact_negation_of_open(order in order_strategy()) {
        let mut model = CostModel::default_standard();
        let open = model.balance_change_on_open(&order).unwrap();
        let close = model.balance_change_on_close(&order).unwrap();
        prop_assert_eq!(close.cash, -open.cash);
        prop_assert_eq!(close.margin, -open.margin);
    }

    #[test]
    fn standard_model_is_bit_identical_across_calls(order in order_strategy()) {
        let mut model = CostModel::default_standard();
        let first = model.balance_change_on_open(&order).unwrap();
        let second = model.balance_change_on_open(&order).unwrap();
        prop_assert_eq!(first, second);
    }

    // ========================================================================
    // Ramp-Up Escalation Tests
    // ========================================================================

    #[test]
    fn ramp_up_fee_costs_strictly_increase(
        increase_pct in 0.001..0.30f64,
        opens in 2usize..10,
    ) {
        let fees = FeeSchedule::standard();
        let order = Order::new(
            OrderType::PositionOpen,
            Utc.with_ymd_and_hms(2021, 6, 1, 9, 30, 0).unwrap(),
            vec![TradeRecord::stock(&fees, TradeDirection::Buy, "ABC", 100.0, 10.01).unwrap()],
        );

        let mut model = CostModel::ramp_up(FeeSchedule::standard(), increase_pct);
        let mut previous = f64::NEG_INFINITY;
        for _ in 0..opens {
            let open = model.balance_change_on_open(&order).unwrap();
            let cost = open.cash.abs();
            prop_assert!(cost > previous);
            previous = cost;
        }
    }

    #[test]
    fn ramp_up_close_after_open_restores_the_schedule(
        increase_pct in 0.001..0.30f64,
        order in order_strategy(),
    ) {
        let base = FeeSchedule::standard();
        let mut model = CostModel::ramp_up(base.clone(), increase_pct);
        model.balance_change_on_open(&order).unwrap();
        model.balance_change_on_close(&order).unwrap();
        prop_assert_eq!(model.effective_fees(), base);
    }

    // ========================================================================
    // Margin Rate Table Tests
    // ========================================================================

    #[test]
    fn every_in_table_balance_has_exactly_one_band(balance in 0.0..500_000.0f64) {
        let containing = STANDARD_RATE_BANDS
            .iter()
            .filter(|band| band.contains(balance))
            .count();
        prop_assert_eq!(containing, 1);

        let band = STANDARD_RATE_BANDS
            .iter()
            .find(|band| band.contains(balance))
            .unwrap();
        prop_assert_eq!(margin_interest_rate(balance), band.rate);
    }

    #[test]
    fn out_of_table_balances_get_the_lowest_rate(balance in 500_000.0..1.0e12f64) {
        prop_assert_eq!(margin_interest_rate(balance), 7.50);
    }

    #[test]
    fn negative_balances_clamp_to_the_first_band(balance in -1.0e9..0.0f64) {
        prop_assert_eq!(margin_interest_rate(balance), 9.50);
    }

    // ========================================================================
    // Funding Invariant Tests
    // ========================================================================

    #[test]
    fn failed_withdrawals_never_mutate_the_factory(
        funded in 1.0..1.0e6f64,
        excess in 0.0..1000.0f64,
    ) {
        let mut factory = TradeRecordFactory::new("ABC", FeeSchedule::standard());
        factory.add_funds(funded).unwrap();

        let result = factory.remove_funds(funded + excess);
        prop_assert!(result.is_err());
        prop_assert_eq!(factory.current_funds(), funded);
        prop_assert_eq!(factory.records().len(), 1);
    }

    #[test]
    fn partial_withdrawals_debit_exactly(
        funded in 1.0..1.0e6f64,
        fraction in 0.01..0.99f64,
    ) {
        let mut factory = TradeRecordFactory::new("ABC", FeeSchedule::standard());
        factory.add_funds(funded).unwrap();

        let part = funded * fraction;
        factory.remove_funds(part).unwrap();
        prop_assert_eq!(factory.current_funds(), funded - part);
    }
}
