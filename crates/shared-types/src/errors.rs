//! # Error Types
//!
//! Parse errors for the shared entities.

use thiserror::Error;

/// Errors raised while parsing a gas price string such as `0.025uatom`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GasPriceError {
    /// The string has no numeric prefix.
    #[error("Gas price has no amount: {0}")]
    MissingAmount(String),

    /// The numeric prefix is not a non-negative decimal.
    #[error("Invalid gas price amount: {0}")]
    InvalidAmount(String),

    /// The denom suffix is missing or malformed.
    #[error("Invalid gas price denom: {0}")]
    InvalidDenom(String),

    /// The amount carries more fractional digits than supported.
    #[error("Gas price {value} has more than {max} fractional digits")]
    TooPrecise {
        /// Original input.
        value: String,
        /// Maximum supported fractional digits.
        max: u32,
    },
}
