//! A single priced movement of one instrument.

use crate::error::{LedgerError, Result};
use crate::fees::{FeeSchedule, TransactionFee};
use crate::types::{EquityType, TradeDirection};
use serde::{Deserialize, Serialize};

/// Shares controlled per option contract, by convention.
pub const OPTION_CONTRACT_MULTIPLIER: f64 = 100.0;

/// Symbol used for cash movements.
pub const CASH_SYMBOL: &str = "USD";

/// One priced movement of one instrument.
///
/// The net price is derived at construction from the sign/fee rule and is
/// never set independently: negative when buying, positive when selling or
/// receiving a neutral credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Key grouping related legs, e.g. the stock and option of a covered
    /// call share one group.
    pub transaction_group: String,
    pub direction: TradeDirection,
    pub equity_type: EquityType,
    pub symbol: String,
    /// Price at which a derivative can be exercised. Options only.
    pub strike_price: f64,
    /// Unix timestamp when a derivative expires. Options only.
    pub expiration_date: i64,
    /// How many of the items are traded: shares, contracts, or coins.
    pub amount: f64,
    /// Units controlled per amount: 1 for stock/cash/crypto, 100 for
    /// options by convention.
    pub quantity_per_amount: f64,
    /// Price per unit.
    pub price: f64,
    /// Signed cash effect of this record, fees included.
    pub net_price: f64,
    /// Reserved for maintenance-margin tracking.
    pub margin_maintenance: f64,
}

impl TradeRecord {
    /// Build a cash movement. The amount carries its own sign: positive
    /// deposits, negative withdraws.
    pub fn cash(fees: &FeeSchedule, direction: TradeDirection, amount: f64) -> Result<Self> {
        Self::build(
            fees,
            direction,
            EquityType::Cash,
            CASH_SYMBOL,
            amount,
            1.0,
            1.0,
            0.0,
            0,
        )
    }

    /// Build a stock movement.
    pub fn stock(
        fees: &FeeSchedule,
        direction: TradeDirection,
        symbol: impl Into<String>,
        amount: f64,
        price: f64,
    ) -> Result<Self> {
        Self::build(
            fees,
            direction,
            EquityType::Stock,
            symbol,
            amount,
            1.0,
            price,
            0.0,
            0,
        )
    }

    /// Build an option movement with the conventional 100x multiplier.
    pub fn option(
        fees: &FeeSchedule,
        direction: TradeDirection,
        symbol: impl Into<String>,
        expiration_date: i64,
        strike_price: f64,
        amount: f64,
        price: f64,
    ) -> Result<Self> {
        Self::build(
            fees,
            direction,
            EquityType::Option,
            symbol,
            amount,
            OPTION_CONTRACT_MULTIPLIER,
            price,
            strike_price,
            expiration_date,
        )
    }

    /// Build a crypto movement.
    pub fn crypto(
        fees: &FeeSchedule,
        direction: TradeDirection,
        symbol: impl Into<String>,
        amount: f64,
        price: f64,
    ) -> Result<Self> {
        Self::build(
            fees,
            direction,
            EquityType::Crypto,
            symbol,
            amount,
            1.0,
            price,
            0.0,
            0,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        fees: &FeeSchedule,
        direction: TradeDirection,
        equity_type: EquityType,
        symbol: impl Into<String>,
        amount: f64,
        quantity_per_amount: f64,
        price: f64,
        strike_price: f64,
        expiration_date: i64,
    ) -> Result<Self> {
        let fee = fees.fee(equity_type).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("no fee configured for {equity_type}"))
        })?;

        let mut record = Self {
            transaction_group: String::new(),
            direction,
            equity_type,
            symbol: symbol.into(),
            strike_price,
            expiration_date,
            amount,
            quantity_per_amount,
            price,
            net_price: 0.0,
            margin_maintenance: 0.0,
        };
        record.net_price = record.priced_with(fee);
        Ok(record)
    }

    /// Set the transaction group, builder style.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.transaction_group = group.into();
        self
    }

    /// Signed cash effect of this record under an arbitrary fee triple.
    ///
    /// Accumulation order matters for bit-exact reproducibility: notional,
    /// then per-unit fee, then exchange fee, then per-order fee.
    pub fn priced_with(&self, fee: &TransactionFee) -> f64 {
        let mut total = self.amount * self.quantity_per_amount * self.price;
        total += self.amount * fee.amount;
        total += fee.exchange;
        total += fee.order;

        // Buying pays out; selling and neutral credits are paid in.
        if self.direction == TradeDirection::Buy {
            total = -total;
        }
        total
    }

    /// Margin consumed or released by this record: zero for cash, signed
    /// notional otherwise. Buying consumes margin, selling releases it.
    pub fn margin_requirement(&self) -> f64 {
        match self.equity_type {
            EquityType::Cash => 0.0,
            EquityType::Stock | EquityType::Option | EquityType::Crypto => {
                let notional = self.amount * self.quantity_per_amount * self.price;
                if self.direction == TradeDirection::Sell {
                    -notional
                } else {
                    notional
                }
            }
        }
    }

    /// The closing leg of this record: direction flipped, net price
    /// recomputed under the flipped direction without re-applying entry
    /// fees.
    pub fn opposite(&self) -> Self {
        let mut output = self.clone();
        output.direction = self.direction.opposite();
        output.net_price = output.priced_with(&TransactionFee::default());
        output
    }
}
