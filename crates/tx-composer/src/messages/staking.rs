//! Staking: delegate, undelegate, redelegate.
//!
//! Amounts must be positive and resolve to the chain's native denom.

use serde_json::json;
use shared_types::ChainInfo;

use super::common::FundsField;
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId};

/// `MsgDelegate` / `MsgUndelegate` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeUnit {
    msg_type: MsgTypeId,
    validator_address: String,
    funds: FundsField,
    errors: FieldErrors,
}

impl StakeUnit {
    /// Empty unit for `Delegate` or `Undelegate`.
    pub fn new(msg_type: MsgTypeId, chain: &ChainInfo) -> Self {
        debug_assert!(matches!(msg_type, MsgTypeId::Delegate | MsgTypeId::Undelegate));
        Self {
            msg_type,
            validator_address: String::new(),
            funds: FundsField::new(chain),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for StakeUnit {
    fn msg_type(&self) -> MsgTypeId {
        self.msg_type
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::VALIDATOR_ADDRESS => self.validator_address = value.trim().to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type, field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_validator(fields::VALIDATOR_ADDRESS, &self.validator_address)?;
        self.funds.validate_native(ctx)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            self.msg_type,
            json!({
                "delegatorAddress": ctx.sender,
                "validatorAddress": self.validator_address,
                "amount": self.funds.coin(ctx),
            }),
        )
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }
}

/// `MsgBeginRedelegate` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedelegateUnit {
    validator_src_address: String,
    validator_dst_address: String,
    funds: FundsField,
    errors: FieldErrors,
}

impl RedelegateUnit {
    /// Empty unit.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            validator_src_address: String::new(),
            validator_dst_address: String::new(),
            funds: FundsField::new(chain),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for RedelegateUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::BeginRedelegate
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::VALIDATOR_SRC_ADDRESS => self.validator_src_address = value.trim().to_string(),
            fields::VALIDATOR_DST_ADDRESS => self.validator_dst_address = value.trim().to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_validator(fields::VALIDATOR_SRC_ADDRESS, &self.validator_src_address)?;
        ctx.check_validator(fields::VALIDATOR_DST_ADDRESS, &self.validator_dst_address)?;
        if self.validator_src_address == self.validator_dst_address {
            return Err((fields::VALIDATOR_DST_ADDRESS, FieldError::SameValidator));
        }
        self.funds.validate_native(ctx)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::BeginRedelegate,
            json!({
                "delegatorAddress": ctx.sender,
                "validatorSrcAddress": self.validator_src_address,
                "validatorDstAddress": self.validator_dst_address,
                "amount": self.funds.coin(ctx),
            }),
        )
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }
}
