//! # Core Domain Entities
//!
//! Chain metadata and value types shared by every crate in the workspace.
//!
//! ## Clusters
//!
//! - **Chain**: `ChainInfo`, `RegisteredAsset`, `DenomUnit`
//! - **Coins & Fees**: `Coin`, `GasPrice`, `StdFee`
//! - **Accounts & Staking**: `AccountInfo`, `Validator`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GasPriceError;

/// Maximum fractional digits accepted in a gas price.
pub const MAX_GAS_PRICE_DECIMALS: u32 = 18;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Chain metadata supplied by the caller (chain registry lookup is external).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    /// Chain id, e.g. `cosmoshub-4`.
    pub chain_id: String,
    /// Bech32 prefix for account addresses, e.g. `cosmos`.
    pub address_prefix: String,
    /// Native staking denom in base units, e.g. `uatom`.
    pub denom: String,
    /// Gas price string, e.g. `0.025uatom`.
    pub gas_price: String,
    /// Registered assets available for denom selection.
    #[serde(default)]
    pub assets: Vec<RegisteredAsset>,
    /// Default LCD endpoint used by confidential contract calls.
    #[serde(default)]
    pub lcd_endpoint: String,
    /// Chain requires contract-call bodies to be encrypted client-side.
    #[serde(default)]
    pub confidential_encryption: bool,
}

impl ChainInfo {
    /// Bech32 prefix for validator operator addresses.
    pub fn validator_prefix(&self) -> String {
        format!("{}valoper", self.address_prefix)
    }

    /// Parse the configured gas price.
    pub fn parsed_gas_price(&self) -> Result<GasPrice, GasPriceError> {
        self.gas_price.parse()
    }
}

/// An asset registered for a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAsset {
    /// Ticker symbol shown to users, e.g. `ATOM`.
    pub symbol: String,
    /// Base denom, e.g. `uatom`.
    pub base: String,
    /// Display denom, e.g. `atom`.
    pub display: String,
    /// Denomination units with their exponents.
    #[serde(default)]
    pub denom_units: Vec<DenomUnit>,
}

impl RegisteredAsset {
    /// Exponent of `denom` relative to the base denom.
    ///
    /// Matches the symbol, any denom unit name or alias, case-insensitively.
    /// The symbol resolves to the display unit.
    pub fn exponent_of(&self, denom: &str) -> Option<u32> {
        let wanted = denom.to_lowercase();
        if wanted == self.base.to_lowercase() {
            return Some(0);
        }

        let unit_exponent = |name: &str| {
            self.denom_units
                .iter()
                .find(|unit| {
                    unit.denom.to_lowercase() == name
                        || unit.aliases.iter().any(|a| a.to_lowercase() == name)
                })
                .map(|unit| unit.exponent)
        };

        if let Some(exponent) = unit_exponent(&wanted) {
            return Some(exponent);
        }
        if wanted == self.symbol.to_lowercase() {
            return unit_exponent(&self.display.to_lowercase());
        }
        None
    }
}

/// A denomination unit of a registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    /// Unit name, e.g. `atom`.
    pub denom: String,
    /// Power of ten relative to the base denom.
    pub exponent: u32,
    /// Alternative names for the unit.
    #[serde(default)]
    pub aliases: Vec<String>,
}

// =============================================================================
// CLUSTER B: COINS & FEES
// =============================================================================

/// An amount of a denom in base units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Integer amount in base units.
    pub amount: String,
    /// Base denom.
    pub denom: String,
}

impl Coin {
    /// Create a coin.
    pub fn new(amount: impl Into<String>, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            denom: denom.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A decimal gas price with its denom, e.g. `0.025uatom`.
///
/// Stored as integer atomics scaled by `10^decimals` so fee computation never
/// touches floating point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    atomics: u128,
    decimals: u32,
    denom: String,
}

impl GasPrice {
    /// Denom fees are paid in.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// `ceil(price * gas_limit)` in base units, `None` on overflow.
    pub fn fee_amount(&self, gas_limit: u64) -> Option<u128> {
        let scaled = self.atomics.checked_mul(u128::from(gas_limit))?;
        let divisor = 10u128.checked_pow(self.decimals)?;
        Some(scaled.div_ceil(divisor))
    }
}

impl FromStr for GasPrice {
    type Err = GasPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (amount, denom) = s.split_at(split);

        if amount.is_empty() {
            return Err(GasPriceError::MissingAmount(s.to_string()));
        }
        if !is_valid_denom(denom) {
            return Err(GasPriceError::InvalidDenom(s.to_string()));
        }

        let (whole, fraction) = match amount.split_once('.') {
            Some((w, f)) => (w, f),
            None => (amount, ""),
        };
        if whole.is_empty() || fraction.contains('.') || (amount.contains('.') && fraction.is_empty())
        {
            return Err(GasPriceError::InvalidAmount(s.to_string()));
        }

        let decimals = fraction.len() as u32;
        if decimals > MAX_GAS_PRICE_DECIMALS {
            return Err(GasPriceError::TooPrecise {
                value: s.to_string(),
                max: MAX_GAS_PRICE_DECIMALS,
            });
        }

        let atomics = format!("{whole}{fraction}")
            .parse::<u128>()
            .map_err(|_| GasPriceError::InvalidAmount(s.to_string()))?;

        Ok(Self {
            atomics,
            decimals,
            denom: denom.to_string(),
        })
    }
}

/// Denom grammar: a letter followed by 2..=127 of `[a-zA-Z0-9/:._-]`.
fn is_valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest_len = denom.len() - first.len_utf8();
    first.is_ascii_alphabetic()
        && (2..=127).contains(&rest_len)
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
}

/// Fee attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// Fee coins.
    pub amount: Vec<Coin>,
    /// Gas limit as a decimal string.
    pub gas: String,
}

// =============================================================================
// CLUSTER C: ACCOUNTS & STAKING
// =============================================================================

/// Signing metadata of the sending account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Bech32 address of the sender.
    pub address: String,
    /// On-chain account number; absent until the account has received funds.
    pub account_number: Option<u64>,
    /// Next sequence number.
    pub sequence: u64,
}

/// A bonded validator offered as a staking target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    /// Operator address (`<prefix>valoper1...`).
    pub operator_address: String,
    /// Human readable name.
    pub moniker: String,
}
