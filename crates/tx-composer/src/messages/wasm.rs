//! CosmWasm contract lifecycle: instantiate, instantiate2, migrate, admin.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use shared_types::ChainInfo;

use super::common::{integer_string, require_positive_integer, require_text, FundsField};
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{BodyField, ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId};

/// `MsgInstantiateContract` / `MsgInstantiateContract2` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiateUnit {
    msg_type: MsgTypeId,
    code_id: String,
    label: String,
    admin: String,
    salt: String,
    body: BodyField,
    funds: FundsField,
    errors: FieldErrors,
}

impl InstantiateUnit {
    /// Empty unit for `InstantiateContract` or `InstantiateContract2`.
    pub fn new(msg_type: MsgTypeId, chain: &ChainInfo) -> Self {
        debug_assert!(matches!(
            msg_type,
            MsgTypeId::InstantiateContract | MsgTypeId::InstantiateContract2
        ));
        Self {
            msg_type,
            code_id: String::new(),
            label: String::new(),
            admin: String::new(),
            salt: String::new(),
            body: BodyField::default(),
            funds: FundsField::new(chain),
            errors: FieldErrors::default(),
        }
    }

    fn is_v2(&self) -> bool {
        self.msg_type == MsgTypeId::InstantiateContract2
    }
}

impl MessageEncoder for InstantiateUnit {
    fn msg_type(&self) -> MsgTypeId {
        self.msg_type
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::CODE_ID => self.code_id = value.trim().to_string(),
            fields::LABEL => self.label = value.trim().to_string(),
            fields::ADMIN => self.admin = value.trim().to_string(),
            fields::SALT if self.is_v2() => self.salt = value.to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type, field)),
        }
        Ok(())
    }

    fn set_body(&mut self, text: &str, content_errors: bool) -> Result<(), ComposerError> {
        self.body.edit(text, content_errors);
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        require_positive_integer(fields::CODE_ID, &self.code_id)?;
        require_text(fields::LABEL, &self.label)?;
        if !self.admin.is_empty() {
            ctx.check_account(fields::ADMIN, &self.admin)?;
        }
        if self.is_v2() {
            require_text(fields::SALT, &self.salt)?;
        }
        if !self.body.is_parseable() {
            return Err((fields::BODY, FieldError::InvalidJson));
        }
        self.funds.validate(ctx, false)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        let mut value = json!({
            "sender": ctx.sender,
            "admin": self.admin,
            "codeId": integer_string(&self.code_id),
            "label": self.label,
            "msg": self.body.canonical_or_empty(),
            "funds": self.funds.coins(ctx),
        });
        if self.is_v2() {
            value["salt"] = json!(STANDARD.encode(self.salt.as_bytes()));
            value["fixMsg"] = json!(false);
        }
        EncodedMessage::new(self.msg_type, value)
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }
}

/// `MsgMigrateContract` unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateUnit {
    contract_address: String,
    code_id: String,
    body: BodyField,
    errors: FieldErrors,
}

impl MessageEncoder for MigrateUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::MigrateContract
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::CONTRACT_ADDRESS => self.contract_address = value.trim().to_string(),
            fields::CODE_ID => self.code_id = value.trim().to_string(),
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn set_body(&mut self, text: &str, content_errors: bool) -> Result<(), ComposerError> {
        self.body.edit(text, content_errors);
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::CONTRACT_ADDRESS, &self.contract_address)?;
        require_positive_integer(fields::CODE_ID, &self.code_id)?;
        if !self.body.is_parseable() {
            return Err((fields::BODY, FieldError::InvalidJson));
        }
        Ok(())
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::MigrateContract,
            json!({
                "sender": ctx.sender,
                "contract": self.contract_address,
                "codeId": integer_string(&self.code_id),
                "msg": self.body.canonical_or_empty(),
            }),
        )
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    fn contract_address(&self) -> Option<&str> {
        Some(&self.contract_address)
    }
}

/// `MsgUpdateAdmin` unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAdminUnit {
    contract_address: String,
    new_admin: String,
    errors: FieldErrors,
}

impl MessageEncoder for UpdateAdminUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::UpdateAdmin
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::CONTRACT_ADDRESS => self.contract_address = value.trim().to_string(),
            fields::NEW_ADMIN => self.new_admin = value.trim().to_string(),
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::CONTRACT_ADDRESS, &self.contract_address)?;
        ctx.check_account(fields::NEW_ADMIN, &self.new_admin)
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        EncodedMessage::new(
            MsgTypeId::UpdateAdmin,
            json!({
                "sender": ctx.sender,
                "newAdmin": self.new_admin,
                "contract": self.contract_address,
            }),
        )
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    fn contract_address(&self) -> Option<&str> {
        Some(&self.contract_address)
    }
}
