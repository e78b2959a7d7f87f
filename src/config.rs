//! Configuration file support for cost models.
//!
//! Allows loading fee schedules and cost-model settings from TOML files
//! for reproducible backtests.

use crate::cost::CostModel;
use crate::error::{LedgerError, Result};
use crate::fees::{FeeSchedule, TransactionFee};
use crate::types::EquityType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Which cost-model variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostModelKind {
    /// Fee-free benchmark model.
    None,
    /// Standard fee schedule.
    #[default]
    Standard,
    /// Escalating fees for volatile-market simulation.
    RampUp,
}

/// Cost-model settings loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostModelConfig {
    /// Which model variant to build.
    #[serde(default)]
    pub model: CostModelKind,
    /// Escalation percentage for the ramp-up model (e.g. 0.02 = 2%).
    #[serde(default)]
    pub increase_pct: f64,
    /// Per-equity-type fee table. Omitted entirely, the canonical
    /// standard schedule applies; individual omitted entries are simply
    /// not configured.
    #[serde(default)]
    pub fees: Option<FeeTable>,
}

/// Optional fee entries per equity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeTable {
    #[serde(default)]
    pub cash: Option<TransactionFee>,
    #[serde(default)]
    pub stock: Option<TransactionFee>,
    #[serde(default)]
    pub option: Option<TransactionFee>,
    #[serde(default)]
    pub crypto: Option<TransactionFee>,
}

impl FeeTable {
    fn schedule(&self) -> FeeSchedule {
        let mut schedule = FeeSchedule::new();
        let entries = [
            (EquityType::Cash, self.cash),
            (EquityType::Stock, self.stock),
            (EquityType::Option, self.option),
            (EquityType::Crypto, self.crypto),
        ];
        for (equity_type, fee) in entries {
            if let Some(fee) = fee {
                schedule = schedule.with_fee(equity_type, fee);
            }
        }
        schedule
    }
}

impl CostModelConfig {
    /// Load a configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        info!("Loaded cost-model config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the settings and build the cost model.
    pub fn build(&self) -> Result<CostModel> {
        let fees = self
            .fees
            .as_ref()
            .map(FeeTable::schedule)
            .unwrap_or_else(FeeSchedule::standard);

        match self.model {
            CostModelKind::None => Ok(CostModel::no_fee()),
            CostModelKind::Standard => Ok(CostModel::standard(fees)),
            CostModelKind::RampUp => {
                if !self.increase_pct.is_finite() || self.increase_pct <= 0.0 {
                    return Err(LedgerError::InvalidArgument(format!(
                        "ramp-up increase_pct must be a positive number, got {}",
                        self.increase_pct
                    )));
                }
                Ok(CostModel::ramp_up(fees, self.increase_pct))
            }
        }
    }
}
