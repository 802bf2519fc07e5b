//! Contract execution, with client-side body encryption on chains that
//! require it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use shared_types::ChainInfo;

use super::common::FundsField;
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::algorithms::{to_canonical_string, ConfidentialPayloadState};
use crate::domain::{BodyField, ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId};

/// Key of the encrypted body inside the unit's encoded value.
pub const ENCRYPTED_MSG_KEY: &str = "encryptedMsg";

/// `MsgExecuteContract` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteContractUnit {
    contract_address: String,
    body: BodyField,
    funds: FundsField,
    confidential: Option<ConfidentialPayloadState>,
    errors: FieldErrors,
}

impl ExecuteContractUnit {
    /// Empty unit. Confidential state exists only if the chain requires it.
    pub fn new(chain: &ChainInfo) -> Self {
        Self {
            contract_address: String::new(),
            body: BodyField::default(),
            funds: FundsField::new(chain),
            confidential: chain
                .confidential_encryption
                .then(|| ConfidentialPayloadState::new(chain.lcd_endpoint.clone())),
            errors: FieldErrors::default(),
        }
    }

    fn invalidate(&mut self) {
        if let Some(state) = self.confidential.as_mut() {
            state.invalidate();
        }
    }
}

impl MessageEncoder for ExecuteContractUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::ExecuteContract
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::CONTRACT_ADDRESS => {
                self.contract_address = value.trim().to_string();
                self.invalidate();
            }
            fields::ENDPOINT | fields::CODE_HASH => {
                let state = self
                    .confidential
                    .as_mut()
                    .ok_or(ComposerError::NotConfidential(MsgTypeId::ExecuteContract))?;
                if field == fields::ENDPOINT {
                    state.set_endpoint(value);
                } else {
                    state.set_code_hash(value);
                }
            }
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(MsgTypeId::ExecuteContract, field)),
        }
        Ok(())
    }

    fn set_body(&mut self, text: &str, content_errors: bool) -> Result<(), ComposerError> {
        self.body.edit(text, content_errors);
        self.invalidate();
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        ctx.check_account(fields::CONTRACT_ADDRESS, &self.contract_address)?;
        if !self.body.is_parseable() {
            return Err((fields::BODY, FieldError::InvalidJson));
        }
        self.funds.validate(ctx, false)?;

        if let Some(state) = &self.confidential {
            state.check().map_err(|e| {
                let field = match e {
                    FieldError::MissingCodeHash => fields::CODE_HASH,
                    FieldError::EncryptionPending => fields::BODY,
                    _ => fields::ENDPOINT,
                };
                (field, e)
            })?;
        }
        Ok(())
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        let mut value = json!({
            "sender": ctx.sender,
            "contract": self.contract_address,
            "msg": self.body.canonical_or_empty(),
            "funds": self.funds.coins(ctx),
        });
        if let Some(encrypted) = self.confidential.as_ref().and_then(|s| s.encrypted()) {
            value[ENCRYPTED_MSG_KEY] = json!(STANDARD.encode(encrypted));
        }
        EncodedMessage::new(MsgTypeId::ExecuteContract, value)
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    fn confidential(&self) -> Option<&ConfidentialPayloadState> {
        self.confidential.as_ref()
    }

    fn confidential_mut(&mut self) -> Option<&mut ConfidentialPayloadState> {
        self.confidential.as_mut()
    }

    fn plaintext(&self) -> Option<Vec<u8>> {
        self.body
            .canonical()
            .map(|v| to_canonical_string(&v).into_bytes())
    }

    fn contract_address(&self) -> Option<&str> {
        Some(&self.contract_address)
    }
}
