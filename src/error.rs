//! Error types for the trade ledger.

use crate::types::EquityType;
use thiserror::Error;

/// Main error type for ledger operations.
///
/// Every failure is detected locally, returned to the immediate caller, and
/// leaves all ledger structures exactly as they were before the call.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no fee configured for equity type: {0}")]
    OutOfRange(EquityType),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
