//! # Transaction Assembler
//!
//! Turns the slot list into a `TransactionDraft`, all or nothing.
//!
//! ## Steps
//!
//! 1. Account number present
//! 2. At least one slot
//! 3. Validation attempt on every unit, collecting the valid messages
//! 4. Chain-specific message shape
//! 5. Valid count equals slot count
//! 6. Gas limit is a positive safe integer
//! 7. Fee from gas limit and chain gas price
//! 8. Draft
//!
//! Nothing here mutates the list beyond the per-unit error records a
//! validation attempt leaves behind.

use serde_json::Value;
use shared_types::AccountInfo;
use tracing::{info, warn};

use super::controller::MessageSlot;
use crate::algorithms::calculate_fee;
use crate::domain::{
    invariant_account_number, invariant_all_valid, invariant_gas_limit, invariant_non_empty,
    BuildError, EncodedMessage, MsgTypeId, TransactionDraft,
};
use crate::messages::{fields, ValidationContext, ENCRYPTED_MSG_KEY};

/// Reshape messages for chains that require client-side encryption.
///
/// On such chains the encrypted body replaces `msg` and the side-channel
/// key is dropped. Other chains and other message types pass through.
pub fn apply_chain_transform(mut msg: EncodedMessage, confidential_chain: bool) -> EncodedMessage {
    if !confidential_chain || !msg.is_type(MsgTypeId::ExecuteContract) {
        return msg;
    }
    if let Value::Object(map) = &mut msg.value {
        if let Some(encrypted) = map.remove(ENCRYPTED_MSG_KEY) {
            map.insert(fields::BODY.to_string(), encrypted);
        }
    }
    msg
}

/// Assemble a draft from `slots`.
pub fn build(
    slots: &mut [MessageSlot],
    ctx: &ValidationContext<'_>,
    account: &AccountInfo,
    memo: &str,
    gas_limit_input: &str,
) -> Result<TransactionDraft, BuildError> {
    let result = assemble(slots, ctx, account, memo, gas_limit_input);
    match &result {
        Ok(draft) => info!(
            chain_id = %draft.chain_id,
            msgs = draft.msgs.len(),
            gas = %draft.fee.gas,
            "Transaction assembled"
        ),
        Err(e) => warn!(chain_id = %ctx.chain.chain_id, error = %e, "Build failed"),
    }
    result
}

fn assemble(
    slots: &mut [MessageSlot],
    ctx: &ValidationContext<'_>,
    account: &AccountInfo,
    memo: &str,
    gas_limit_input: &str,
) -> Result<TransactionDraft, BuildError> {
    let account_number = invariant_account_number(account)?;
    invariant_non_empty(slots.len())?;

    let total = slots.len();
    let msgs: Vec<EncodedMessage> = slots
        .iter_mut()
        .filter_map(|slot| {
            let unit = slot.unit_mut();
            unit.is_msg_valid(ctx).then(|| unit.msg(ctx))
        })
        .map(|msg| apply_chain_transform(msg, ctx.chain.confidential_encryption))
        .collect();
    invariant_all_valid(msgs.len(), total)?;

    let gas_limit = invariant_gas_limit(gas_limit_input)?;
    let fee = calculate_fee(gas_limit, &ctx.chain.parsed_gas_price()?)?;

    Ok(TransactionDraft {
        account_number,
        sequence: account.sequence,
        chain_id: ctx.chain.chain_id.clone(),
        msgs,
        fee,
        memo: memo.to_string(),
    })
}
