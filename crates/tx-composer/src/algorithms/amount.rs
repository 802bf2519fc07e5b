//! # Display Amounts
//!
//! Exact decimal parsing for user-typed amounts and their conversion to
//! integer base units. No floating point anywhere.

use std::str::FromStr;

use thiserror::Error;

/// Amount parsing and conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a decimal number.
    #[error("Not a decimal number: {0:?}")]
    Malformed(String),

    /// Negative amounts have no base-unit form.
    #[error("Amount must not be negative")]
    Negative,

    /// More fractional digits than the denom's exponent allows.
    #[error("Too many decimal places: {decimals} given, denom allows {max}")]
    TooManyDecimals {
        /// Fractional digits given.
        decimals: usize,
        /// Denom exponent.
        max: u32,
    },

    /// Does not fit in 128 bits.
    #[error("Amount too large")]
    Overflow,
}

/// A decimal amount as typed, normalized.
///
/// Leading zeros of the whole part and trailing zeros of the fraction are
/// dropped, so `"007.50"` and `"7.5"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAmount {
    negative: bool,
    whole: String,
    fraction: String,
}

impl DisplayAmount {
    /// Strictly below zero. `-0` is zero.
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Equal to zero.
    pub fn is_zero(&self) -> bool {
        self.whole == "0" && self.fraction.is_empty()
    }

    /// No fractional part.
    pub fn is_integer(&self) -> bool {
        self.fraction.is_empty()
    }

    /// Number of significant fractional digits.
    pub fn decimals(&self) -> usize {
        self.fraction.len()
    }

    /// Value as an unsigned integer, if it is one.
    pub fn as_integer(&self) -> Option<u128> {
        if self.is_negative() || !self.is_integer() {
            return None;
        }
        self.whole.parse().ok()
    }

    /// Value scaled by `10^exponent`.
    pub fn to_base_units(&self, exponent: u32) -> Result<u128, AmountError> {
        if self.is_negative() {
            return Err(AmountError::Negative);
        }
        if self.fraction.len() > exponent as usize {
            return Err(AmountError::TooManyDecimals {
                decimals: self.fraction.len(),
                max: exponent,
            });
        }

        let padding = exponent as usize - self.fraction.len();
        let digits = format!("{}{}{}", self.whole, self.fraction, "0".repeat(padding));
        digits.parse().map_err(|_| AmountError::Overflow)
    }
}

impl FromStr for DisplayAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let whole = whole.trim_start_matches('0');
        Ok(Self {
            negative,
            whole: if whole.is_empty() { "0" } else { whole }.to_string(),
            fraction: fraction.trim_end_matches('0').to_string(),
        })
    }
}
