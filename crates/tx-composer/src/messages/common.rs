//! Field helpers shared by several units.

use shared_types::{ChainInfo, Coin};

use super::{fields, Invalid, ValidationContext};
use crate::algorithms::DisplayAmount;
use crate::domain::{DenomChoice, FieldError};

/// Non-empty text field.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), Invalid> {
    if value.trim().is_empty() {
        return Err((field, FieldError::Required));
    }
    Ok(())
}

/// Positive integer field.
pub(crate) fn require_positive_integer(field: &'static str, value: &str) -> Result<u64, Invalid> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| (field, FieldError::NotPositiveInteger(value.to_string())))
}

/// Integer as a decimal string for encoding; `"0"` when not an integer.
pub(crate) fn integer_string(value: &str) -> String {
    value
        .trim()
        .parse::<u64>()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Amount, denom selector and custom denom of a funds input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundsField {
    amount: String,
    denom: String,
    custom_denom: String,
}

impl FundsField {
    /// Empty amount, selector on the chain's native denom.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            amount: String::new(),
            denom: chain.denom.clone(),
            custom_denom: String::new(),
        }
    }

    /// Store `value` if `field` belongs to this input. Returns whether it did.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        let value = value.trim().to_string();
        match field {
            fields::AMOUNT => self.amount = value,
            fields::DENOM => self.denom = value,
            fields::CUSTOM_DENOM => self.custom_denom = value,
            _ => return false,
        }
        true
    }

    /// Validate amount and denom.
    ///
    /// Empty or zero means no funds unless `require_positive`.
    pub fn validate(&self, ctx: &ValidationContext<'_>, require_positive: bool) -> Result<(), Invalid> {
        let nothing = || {
            if require_positive {
                Err((fields::AMOUNT, FieldError::NonPositiveAmount))
            } else {
                Ok(())
            }
        };

        if self.amount.is_empty() {
            return nothing();
        }
        let amount: DisplayAmount = self
            .amount
            .parse()
            .map_err(|_| (fields::AMOUNT, FieldError::MalformedAmount(self.amount.clone())))?;
        if amount.is_negative() {
            return Err((fields::AMOUNT, FieldError::NegativeAmount));
        }
        if amount.is_zero() {
            return nothing();
        }

        match DenomChoice::parse(&self.denom) {
            DenomChoice::Custom => {
                if self.custom_denom.is_empty() {
                    return Err((fields::CUSTOM_DENOM, FieldError::CustomDenomRequired));
                }
                if !amount.is_integer() {
                    return Err((fields::AMOUNT, FieldError::FractionalCustomAmount));
                }
                if amount.as_integer().is_none() {
                    return Err((fields::AMOUNT, FieldError::MalformedAmount(self.amount.clone())));
                }
                Ok(())
            }
            DenomChoice::Registered(denom) => ctx
                .coins
                .to_base_coin(&denom, &self.amount, &ctx.chain.assets)
                .map(|_| ())
                .map_err(|e| (fields::AMOUNT, FieldError::Conversion(e.to_string()))),
        }
    }

    /// Base-unit coins; empty when there is nothing valid to attach.
    pub fn coins(&self, ctx: &ValidationContext<'_>) -> Vec<Coin> {
        let Ok(amount) = self.amount.parse::<DisplayAmount>() else {
            return Vec::new();
        };
        if amount.is_negative() || amount.is_zero() {
            return Vec::new();
        }

        match DenomChoice::parse(&self.denom) {
            DenomChoice::Custom => match amount.as_integer() {
                Some(value) if !self.custom_denom.is_empty() => {
                    vec![Coin::new(value.to_string(), self.custom_denom.clone())]
                }
                _ => Vec::new(),
            },
            DenomChoice::Registered(denom) => ctx
                .coins
                .to_base_coin(&denom, &self.amount, &ctx.chain.assets)
                .map(|coin| vec![coin])
                .unwrap_or_default(),
        }
    }

    /// Single coin for messages that always carry one; zero of the native
    /// denom when nothing valid is set.
    pub fn coin(&self, ctx: &ValidationContext<'_>) -> Coin {
        self.coins(ctx)
            .into_iter()
            .next()
            .unwrap_or_else(|| Coin::new("0", ctx.chain.denom.clone()))
    }

    /// Validate as a positive amount of the chain's native denom.
    pub fn validate_native(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        self.validate(ctx, true)?;
        let coin = self.coin(ctx);
        if coin.denom != ctx.chain.denom {
            return Err((
                fields::DENOM,
                FieldError::WrongDenom {
                    expected: ctx.chain.denom.clone(),
                    actual: coin.denom,
                },
            ));
        }
        Ok(())
    }
}
