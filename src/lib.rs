//! Tally - a trade ledger and cost-model engine for backtesting.
//!
//! # Overview
//!
//! Tally models the economics of placing and unwinding trades: given a
//! batch of buy/sell actions on cash, stock, option, or crypto
//! instruments, it computes the signed cash and margin effect of opening
//! or closing that batch under a configurable fee schedule, and maintains
//! a ledger whose funding and lifecycle invariants hold at every step.
//!
//! - **Priced records**: every movement computes its own signed net cash
//!   effect, fees included
//! - **Funding safety**: the record factory checks cash sufficiency before
//!   every withdrawal-causing action, atomically
//! - **Three fee regimes**: fee-free benchmark, standard schedule, and an
//!   escalating ramp-up model for adversarial markets
//! - **Lifecycle-tagged batches**: orders carry their portfolio/position
//!   stage and filter accordingly
//! - **Closure detection**: a position knows when every leg has been fully
//!   unwound
//!
//! # Quick Start
//!
//! ```
//! use tally::cost::CostModel;
//! use tally::factory::TradeRecordFactory;
//! use tally::fees::FeeSchedule;
//! use tally::order::Order;
//! use tally::portfolio::Portfolio;
//! use tally::record::TradeRecord;
//! use tally::types::{OrderType, TradeDirection};
//! use chrono::{TimeZone, Utc};
//!
//! // Accumulate funded, individually priced records for one session.
//! let mut factory = TradeRecordFactory::new("ABC", FeeSchedule::standard());
//! factory.add_funds(10_000.0).unwrap();
//! factory.buy_stock(100.0, 10.01).unwrap();
//! assert_eq!(factory.current_funds(), 10_000.0 - 1001.75);
//!
//! // Or build records directly and group them into a tagged batch.
//! let fees = FeeSchedule::standard();
//! let record = TradeRecord::stock(&fees, TradeDirection::Buy, "ABC", 100.0, 10.01).unwrap();
//! let timestamp = Utc.with_ymd_and_hms(2021, 6, 1, 9, 30, 0).unwrap();
//! let order = Order::new(OrderType::PositionOpen, timestamp, vec![record]);
//!
//! // Value it through the portfolio's cost model.
//! let mut portfolio = Portfolio::new(CostModel::default_standard());
//! portfolio.add_order("abc-long", order);
//! let value = portfolio.position_value("abc-long").unwrap();
//! assert_eq!(value.cash, -1001.75); // buys pay out, fees included
//! assert_eq!(value.margin, 1001.0); // buys consume margin
//! ```
//!
//! # Modules
//!
//! - [`types`]: Equity type, trade direction, and order lifecycle enums
//! - [`fees`]: Per-equity-type transaction fee schedules
//! - [`record`]: Priced trade records and their sign/fee arithmetic
//! - [`factory`]: Session builder enforcing funding sufficiency
//! - [`order`]: Order batches, lifecycle filters, closure detection
//! - [`cost`]: Cost models converting batches into cash/margin deltas
//! - [`margin`]: Tiered margin interest-rate lookup
//! - [`portfolio`]: Position grouping and portfolio valuation
//! - [`config`]: TOML configuration for fee schedules and cost models

pub mod config;
pub mod cost;
pub mod error;
pub mod factory;
pub mod fees;
pub mod margin;
pub mod order;
pub mod portfolio;
pub mod record;
pub mod types;

// Re-exports for convenience
pub use config::{CostModelConfig, CostModelKind, FeeTable};
pub use cost::{BalanceChange, CostModel};
pub use error::{LedgerError, Result};
pub use factory::TradeRecordFactory;
pub use fees::{FeeSchedule, TransactionFee};
pub use margin::{margin_interest_rate, RateBand, STANDARD_RATE_BANDS};
pub use order::{Order, Orders};
pub use portfolio::{Portfolio, Position};
pub use record::{TradeRecord, CASH_SYMBOL, OPTION_CONTRACT_MULTIPLIER};
pub use types::{EquityType, OrderType, TradeDirection};
