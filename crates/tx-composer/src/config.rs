//! # Composer Configuration
//!
//! Gas weights, IBC timeout and LCD settings for the composer service.
//!
//! Environment overrides:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `COMPOSER_TX_FLAT_GAS` | `gas.tx_flat` |
//! | `COMPOSER_IBC_TIMEOUT_SECS` | `ibc_timeout_secs` |
//! | `COMPOSER_LCD_TIMEOUT_SECS` | `lcd_timeout_secs` |

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MsgTypeId;

/// Default flat gas added once per transaction.
pub const DEFAULT_TX_FLAT_GAS: u64 = 100_000;

/// Default IBC transfer timeout: 10 minutes.
pub const DEFAULT_IBC_TIMEOUT_SECS: u64 = 600;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Environment variable is not a valid value.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A value that must be positive is zero.
    #[error("{0} must be greater than 0")]
    Zero(&'static str),
}

/// Per-category gas weights used by the estimate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasWeights {
    /// Added once per transaction.
    pub tx_flat: u64,
    /// Bank, staking, distribution, governance and vesting messages.
    pub standard: u64,
    /// IBC transfer.
    pub ibc_transfer: u64,
    /// CosmWasm messages.
    pub wasm: u64,
}

impl Default for GasWeights {
    fn default() -> Self {
        Self {
            tx_flat: DEFAULT_TX_FLAT_GAS,
            standard: 100_000,
            ibc_transfer: 180_000,
            wasm: 150_000,
        }
    }
}

impl GasWeights {
    /// Fixed weight of one message of `msg_type`.
    pub fn weight(&self, msg_type: MsgTypeId) -> u64 {
        match msg_type {
            MsgTypeId::Transfer => self.ibc_transfer,
            MsgTypeId::InstantiateContract
            | MsgTypeId::InstantiateContract2
            | MsgTypeId::ExecuteContract
            | MsgTypeId::MigrateContract
            | MsgTypeId::UpdateAdmin => self.wasm,
            _ => self.standard,
        }
    }
}

/// Composer configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Gas estimate weights.
    pub gas: GasWeights,

    /// Default IBC timeout, seconds after unit creation.
    pub ibc_timeout_secs: u64,

    /// LCD request timeout in seconds.
    pub lcd_timeout_secs: u64,

    /// Load the bonded-validator set when a staking slot is added.
    pub validator_cache_enabled: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            gas: GasWeights::default(),
            ibc_timeout_secs: DEFAULT_IBC_TIMEOUT_SECS,
            lcd_timeout_secs: 15,
            validator_cache_enabled: true,
        }
    }
}

impl ComposerConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing() -> Self {
        Self {
            lcd_timeout_secs: 2,
            ibc_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "COMPOSER_TX_FLAT_GAS")? {
            self.gas.tx_flat = v;
        }
        if let Some(v) = parse_var(&lookup, "COMPOSER_IBC_TIMEOUT_SECS")? {
            self.ibc_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "COMPOSER_LCD_TIMEOUT_SECS")? {
            self.lcd_timeout_secs = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject zero timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ibc_timeout_secs == 0 {
            return Err(ConfigError::Zero("ibc_timeout_secs"));
        }
        if self.lcd_timeout_secs == 0 {
            return Err(ConfigError::Zero("lcd_timeout_secs"));
        }
        Ok(())
    }

    /// LCD request timeout.
    pub fn lcd_timeout(&self) -> Duration {
        Duration::from_secs(self.lcd_timeout_secs)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
