//! Vesting account creation.

use serde_json::json;
use shared_types::ChainInfo;

use super::common::{integer_string, require_positive_integer, FundsField};
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId};

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" | "" => Some(false),
        _ => None,
    }
}

/// `MsgCreateVestingAccount` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVestingAccountUnit {
    to_address: String,
    funds: FundsField,
    end_time: String,
    delayed: String,
    errors: FieldErrors,
}

impl CreateVestingAccountUnit {
    /// Empty unit, continuous vesting.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            to_address: String::new(),
            funds: FundsField::new(chain),
            end_time: String::new(),
            delayed: "false".to_string(),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for CreateVestingAccountUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::CreateVestingAccount
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::TO_ADDRESS => self.to_address = value.trim().to_string(),
            fields::END_TIME => self.end_time = value.trim().to_string(),
            fields::DELAYED => self.delayed = value.trim().to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::TO_ADDRESS, &self.to_address)?;
        self.funds.validate(ctx, false)?;
        require_positive_integer(fields::END_TIME, &self.end_time)?;
        parse_flag(&self.delayed)
            .map(|_| ())
            .ok_or_else(|| (fields::DELAYED, FieldError::InvalidFlag(self.delayed.clone())))
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::CreateVestingAccount,
            json!({
                "fromAddress": ctx.sender,
                "toAddress": self.to_address,
                "amount": self.funds.coins(ctx),
                "endTime": integer_string(&self.end_time),
                "delayed": parse_flag(&self.delayed).unwrap_or(false),
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
