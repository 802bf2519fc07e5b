//! Bank send.

use serde_json::json;
use shared_types::ChainInfo;

use super::common::FundsField;
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldErrors, MsgTypeId};

/// `MsgSend` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendUnit {
    to_address: String,
    funds: FundsField,
    errors: FieldErrors,
}

impl SendUnit {
    /// Empty unit.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            to_address: String::new(),
            funds: FundsField::new(chain),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for SendUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::Send
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::TO_ADDRESS => self.to_address = value.trim().to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::TO_ADDRESS, &self.to_address)?;
        self.funds.validate(ctx, false)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::Send,
            json!({
                "fromAddress": ctx.sender,
                "toAddress": self.to_address,
                "amount": self.funds.coins(ctx),
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
