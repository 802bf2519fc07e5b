//! Governance vote.

use serde_json::json;

use super::common::{integer_string, require_positive_integer};
use super::{fields, unknown_field, Invalid, MessageEncoder, ValidationContext};
use crate::domain::{ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId, VoteOption};

/// `MsgVote` unit. The option defaults to `yes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteUnit {
    proposal_id: String,
    option: String,
    errors: FieldErrors,
}

impl Default for VoteUnit {
    fn default() -> Self {
        Self {
            proposal_id: String::new(),
            option: "yes".to_string(),
            errors: FieldErrors::default(),
        }
    }
}

impl MessageEncoder for VoteUnit {
    fn msg_type(&self) -> MsgTypeId {
        MsgTypeId::Vote
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        match field {
            fields::PROPOSAL_ID => self.proposal_id = value.trim().to_string(),
            fields::OPTION => self.option = value.trim().to_string(),
            _ => return Err(unknown_field(self.msg_type(), field)),
        }
        Ok(())
    }

    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        require_positive_integer(fields::PROPOSAL_ID, &self.proposal_id)?;
        self.option
            .parse::<VoteOption>()
            .map(|_| ())
            .map_err(|v| (fields::OPTION, FieldError::InvalidVoteOption(v)))
    }

    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        let option = self
            .option
            .parse::<VoteOption>()
            .map(VoteOption::as_i32)
            .unwrap_or(0);
        EncodedMessage::new(
            MsgTypeId::Vote,
            json!({
                "proposalId": integer_string(&self.proposal_id),
                "voter": ctx.sender,
                "option": option,
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
