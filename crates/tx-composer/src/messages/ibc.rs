//! IBC token transfer.
//!
//! The timeout is an absolute unix timestamp fixed at unit creation, so
//! identical inputs keep producing identical messages.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use shared_types::ChainInfo;

use super::common::{integer_string, require_positive_integer, FundsField};
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId};

/// Source port of ICS-20 transfers.
pub const TRANSFER_PORT: &str = "transfer";

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn is_channel_id(value: &str) -> bool {
    value
        .strip_prefix("channel-")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// `MsgTransfer` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferUnit {
    receiver: String,
    source_channel: String,
    funds: FundsField,
    timeout_timestamp: String,
    memo: String,
    errors: FieldErrors,
}

impl TransferUnit {
    /// Empty unit timing out `timeout_secs` from now.
    pub fn new(chain: &ChainInfo, timeout_secs: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            receiver: String::new(),
            source_channel: String::new(),
            funds: FundsField::new(chain),
            timeout_timestamp: now.saturating_add(timeout_secs).to_string(),
            memo: String::new(),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for TransferUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::Transfer
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::RECEIVER => self.receiver = value.trim().to_string(),
            fields::SOURCE_CHANNEL => self.source_channel = value.trim().to_string(),
            fields::TIMEOUT_TIMESTAMP => self.timeout_timestamp = value.trim().to_string(),
            fields::MEMO => self.memo = value.to_string(),
            _ if self.funds.set(field, value) => {}
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        // counterparty chain: any bech32 prefix
        ctx.check_address(fields::RECEIVER, &self.receiver, "")?;
        if !is_channel_id(&self.source_channel) {
            return Err((
                fields::SOURCE_CHANNEL,
                FieldError::InvalidChannel(self.source_channel.clone()),
            ));
        }
        self.funds.validate(ctx, true)?;
        require_positive_integer(fields::TIMEOUT_TIMESTAMP, &self.timeout_timestamp)?;
        Ok(())
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        let timeout_nanos = self
            .timeout_timestamp
            .parse::<u64>()
            .map(|secs| u128::from(secs) * NANOS_PER_SEC)
            .unwrap_or_default();
        EncodedMessage::new(
            MsgTypeId::Transfer,
            json!({
                "sourcePort": TRANSFER_PORT,
                "sourceChannel": self.source_channel,
                "token": self.funds.coin(ctx),
                "sender": ctx.sender,
                "receiver": self.receiver,
                "timeoutHeight": {"revisionNumber": "0", "revisionHeight": "0"},
                "timeoutTimestamp": timeout_nanos.to_string(),
                "memo": self.memo,
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
