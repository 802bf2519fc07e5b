//! Distribution: rewards, withdraw address, community pool.

use serde_json::json;
use shared_types::ChainInfo;

use super::common::FundsField;
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldErrors, MsgTypeId};

/// `MsgWithdrawDelegatorReward` unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawRewardUnit {
    validator_address: String,
    errors: FieldErrors,
}

impl MessageEncoder for WithdrawRewardUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::WithdrawDelegatorReward
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::VALIDATOR_ADDRESS => self.validator_address = value.trim().to_string(),
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_validator(fields::VALIDATOR_ADDRESS, &self.validator_address)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::WithdrawDelegatorReward,
            json!({
                "delegatorAddress": ctx.sender,
                "validatorAddress": self.validator_address,
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

/// `MsgSetWithdrawAddress` unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetWithdrawAddressUnit {
    withdraw_address: String,
    errors: FieldErrors,
}

impl MessageEncoder for SetWithdrawAddressUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::SetWithdrawAddress
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::WITHDRAW_ADDRESS => self.withdraw_address = value.trim().to_string(),
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::WITHDRAW_ADDRESS, &self.withdraw_address)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::SetWithdrawAddress,
            json!({
                "delegatorAddress": ctx.sender,
                "withdrawAddress": self.withdraw_address,
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

/// `MsgFundCommunityPool` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundCommunityPoolUnit {
    funds: FundsField,
    errors: FieldErrors,
}

impl FundCommunityPoolUnit {
    /// Empty unit.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            funds: FundsField::new(chain),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for FundCommunityPoolUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::FundCommunityPool
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        if !self.funds.set(field, value) {
            return Err(unknown_field(self.msg_type(), field));
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        self.funds.validate(ctx, true)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::FundCommunityPool,
            json!({
                "amount": self.funds.coins(ctx),
                "depositor": ctx.sender,
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
