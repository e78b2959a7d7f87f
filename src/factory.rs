//! Session builder that accumulates trade records and enforces funding.

use crate::error::{LedgerError, Result};
use crate::fees::FeeSchedule;
use crate::record::TradeRecord;
use crate::types::{EquityType, TradeDirection};
use tracing::debug;

/// Accumulates priced trade records for one working session, checking cash
/// sufficiency before every withdrawal-causing action.
///
/// Every buy or sell appends two records: the cash movement and the traded
/// instrument. A funding failure leaves the list unmodified.
#[derive(Debug, Clone)]
pub struct TradeRecordFactory {
    symbol: String,
    fees: FeeSchedule,
    records: Vec<TradeRecord>,
}

impl TradeRecordFactory {
    pub fn new(symbol: impl Into<String>, fees: FeeSchedule) -> Self {
        Self {
            symbol: symbol.into(),
            fees,
            records: Vec::new(),
        }
    }

    /// The symbol this session trades.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Deposit cash into the session.
    pub fn add_funds(&mut self, amount: f64) -> Result<()> {
        if amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let cash = TradeRecord::cash(&self.fees, TradeDirection::Neutral, amount)?;
        self.records.push(cash);
        Ok(())
    }

    /// Withdraw cash from the session. Fails without mutating when the
    /// amount is negative or meets or exceeds the current balance.
    pub fn remove_funds(&mut self, amount: f64) -> Result<()> {
        if amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let available = self.current_funds();
        if amount >= available {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            });
        }
        let cash = TradeRecord::cash(&self.fees, TradeDirection::Neutral, -amount)?;
        self.records.push(cash);
        Ok(())
    }

    /// Buy shares of the session symbol.
    pub fn buy_stock(&mut self, amount: f64, price: f64) -> Result<()> {
        let record =
            TradeRecord::stock(&self.fees, TradeDirection::Buy, self.symbol.as_str(), amount, price)?;
        self.withdraw_and_push(record)
    }

    /// Sell shares of the session symbol.
    pub fn sell_stock(&mut self, amount: f64, price: f64) -> Result<()> {
        let record =
            TradeRecord::stock(&self.fees, TradeDirection::Sell, self.symbol.as_str(), amount, price)?;
        self.deposit_and_push(record)
    }

    /// Buy option contracts on the session symbol.
    pub fn buy_option(
        &mut self,
        expiration_date: i64,
        strike_price: f64,
        amount: f64,
        price: f64,
    ) -> Result<()> {
        let record = TradeRecord::option(
            &self.fees,
            TradeDirection::Buy,
            self.symbol.as_str(),
            expiration_date,
            strike_price,
            amount,
            price,
        )?;
        self.withdraw_and_push(record)
    }

    /// Sell option contracts on the session symbol.
    pub fn sell_option(
        &mut self,
        expiration_date: i64,
        strike_price: f64,
        amount: f64,
        price: f64,
    ) -> Result<()> {
        let record = TradeRecord::option(
            &self.fees,
            TradeDirection::Sell,
            self.symbol.as_str(),
            expiration_date,
            strike_price,
            amount,
            price,
        )?;
        self.deposit_and_push(record)
    }

    /// Buy coins of the session symbol.
    pub fn buy_crypto(&mut self, amount: f64, price: f64) -> Result<()> {
        let record =
            TradeRecord::crypto(&self.fees, TradeDirection::Buy, self.symbol.as_str(), amount, price)?;
        self.withdraw_and_push(record)
    }

    /// Sell coins of the session symbol.
    pub fn sell_crypto(&mut self, amount: f64, price: f64) -> Result<()> {
        let record =
            TradeRecord::crypto(&self.fees, TradeDirection::Sell, self.symbol.as_str(), amount, price)?;
        self.deposit_and_push(record)
    }

    /// Current cash balance: the sum of net prices over all Cash records,
    /// recomputed on every call.
    pub fn current_funds(&self) -> f64 {
        self.records
            .iter()
            .filter(|record| record.equity_type == EquityType::Cash)
            .map(|record| record.net_price)
            .sum()
    }

    /// The records accumulated so far, in insertion order.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Hand off the accumulated records, consuming the factory.
    pub fn into_records(self) -> Vec<TradeRecord> {
        self.records
    }

    /// Withdraw the record's cost, then append it. The withdrawal performs
    /// the sufficiency check; on failure nothing is appended.
    fn withdraw_and_push(&mut self, record: TradeRecord) -> Result<()> {
        self.remove_funds(record.net_price.abs())?;
        debug!(
            "Executed {} {} {} @ {:.4}",
            record.direction, record.amount, record.symbol, record.price
        );
        self.records.push(record);
        Ok(())
    }

    /// Deposit the record's proceeds, then append it.
    fn deposit_and_push(&mut self, record: TradeRecord) -> Result<()> {
        self.add_funds(record.net_price)?;
        debug!(
            "Executed {} {} {} @ {:.4}",
            record.direction, record.amount, record.symbol, record.price
        );
        self.records.push(record);
        Ok(())
    }
}
