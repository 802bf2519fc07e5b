//! # Message Encoder/Validator Units
//!
//! One unit per message type. Each owns its raw field inputs and derives
//! `(is_msg_valid, msg)` from them.
//!
//! ## Rules shared by every unit
//!
//! - `msg` is always a structurally valid encoded message, even when invalid.
//! - Validation reports the first failing field in declaration order.
//! - Untouched fields never carry an error. Errors are set by a failed
//!   validation attempt or a live body edit and cleared when the field is
//!   edited again.
//! - A unit never touches another unit's state.

mod bank;
mod common;
mod distribution;
mod execute;
mod gov;
mod ibc;
mod staking;
mod vesting;
mod wasm;

pub use bank::SendUnit;
pub use common::FundsField;
pub use distribution::{FundCommunityPoolUnit, SetWithdrawAddressUnit, WithdrawRewardUnit};
pub use execute::{ExecuteContractUnit, ENCRYPTED_MSG_KEY};
pub use gov::VoteUnit;
pub use ibc::TransferUnit;
pub use staking::{RedelegateUnit, StakeUnit};
pub use vesting::CreateVestingAccountUnit;
pub use wasm::{InstantiateUnit, MigrateUnit, UpdateAdminUnit};

use shared_types::{ChainInfo, Validator};

use crate::algorithms::{ConfidentialPayloadState, DerivationOutcome, DerivationTicket};
use crate::config::ComposerConfig;
use crate::domain::{
    ComposerError, EncodedMessage, FieldError, FieldErrors, MsgTypeId, SlotKey,
};
use crate::ports::{AddressValidator, CoinConverter};

/// Input field names.
pub mod fields {
    /// Recipient account.
    pub const TO_ADDRESS: &str = "to_address";
    /// Display amount.
    pub const AMOUNT: &str = "amount";
    /// Denom selector: a registered asset name or `custom`.
    pub const DENOM: &str = "denom";
    /// Base denom typed when the selector is `custom`.
    pub const CUSTOM_DENOM: &str = "custom_denom";
    /// Validator operator address.
    pub const VALIDATOR_ADDRESS: &str = "validator_address";
    /// Redelegation source.
    pub const VALIDATOR_SRC_ADDRESS: &str = "validator_src_address";
    /// Redelegation destination.
    pub const VALIDATOR_DST_ADDRESS: &str = "validator_dst_address";
    /// Reward withdraw address.
    pub const WITHDRAW_ADDRESS: &str = "withdraw_address";
    /// Governance proposal id.
    pub const PROPOSAL_ID: &str = "proposal_id";
    /// Vote option.
    pub const OPTION: &str = "option";
    /// Vesting end, unix seconds.
    pub const END_TIME: &str = "end_time";
    /// Delayed vesting flag.
    pub const DELAYED: &str = "delayed";
    /// IBC receiver on the counterparty chain.
    pub const RECEIVER: &str = "receiver";
    /// IBC source channel.
    pub const SOURCE_CHANNEL: &str = "source_channel";
    /// IBC timeout, unix seconds.
    pub const TIMEOUT_TIMESTAMP: &str = "timeout_timestamp";
    /// IBC memo.
    pub const MEMO: &str = "memo";
    /// Contract code id.
    pub const CODE_ID: &str = "code_id";
    /// Contract label.
    pub const LABEL: &str = "label";
    /// Contract admin.
    pub const ADMIN: &str = "admin";
    /// Instantiate2 salt.
    pub const SALT: &str = "salt";
    /// Structured JSON body.
    pub const BODY: &str = "msg";
    /// Target contract.
    pub const CONTRACT_ADDRESS: &str = "contract_address";
    /// New contract admin.
    pub const NEW_ADMIN: &str = "new_admin";
    /// Confidential endpoint.
    pub const ENDPOINT: &str = "endpoint";
    /// Confidential code hash.
    pub const CODE_HASH: &str = "code_hash";
    /// Transaction gas limit.
    pub const GAS_LIMIT: &str = "gas_limit";
}

/// A failed validation: the field and its error.
pub type Invalid = (&'static str, FieldError);

/// Read-only collaborators a unit validates and encodes against.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Active chain.
    pub chain: &'a ChainInfo,
    /// Sender address, filled into sender-side message fields.
    pub sender: &'a str,
    /// Address validation collaborator.
    pub addresses: &'a dyn AddressValidator,
    /// Coin conversion collaborator.
    pub coins: &'a dyn CoinConverter,
    /// Bonded validators; empty until loaded.
    pub validators: &'a [Validator],
}

impl ValidationContext<'_> {
    /// Check `address` against `prefix`.
    pub fn check_address(
        &self,
        field: &'static str,
        address: &str,
        prefix: &str,
    ) -> Result<(), Invalid> {
        match self.addresses.check(address, prefix) {
            None => Ok(()),
            Some(reason) => Err((
                field,
                FieldError::InvalidAddress {
                    chain_id: self.chain.chain_id.clone(),
                    reason,
                },
            )),
        }
    }

    /// Check an account address on the active chain.
    pub fn check_account(&self, field: &'static str, address: &str) -> Result<(), Invalid> {
        self.check_address(field, address, &self.chain.address_prefix)
    }

    /// Check a validator operator address on the active chain.
    pub fn check_validator(&self, field: &'static str, address: &str) -> Result<(), Invalid> {
        self.check_address(field, address, &self.chain.validator_prefix())
    }
}

/// Capability shared by every unit.
pub trait MessageEncoder {
    /// Message type this unit encodes.
    fn msg_type(&self) -> MsgTypeId;

    /// Store a raw field input.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError>;

    /// First failing field, if any. Pure.
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid>;

    /// Encoded message from the current inputs.
    fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage;

    /// Current field errors.
    fn errors(&self) -> &FieldErrors;

    /// Mutable field errors.
    fn errors_mut(&mut self) -> &mut FieldErrors;

    /// Record a body edit from the editor.
    fn set_body(&mut self, _text: &str, _content_errors: bool) -> Result<(), ComposerError> {
        Err(ComposerError::NoBody(self.msg_type()))
    }

    /// Confidential state, for contract execution on confidential chains.
    fn confidential(&self) -> Option<&ConfidentialPayloadState> {
        None
    }

    /// Mutable confidential state.
    fn confidential_mut(&mut self) -> Option<&mut ConfidentialPayloadState> {
        None
    }

    /// Canonical plaintext body, if parseable.
    fn plaintext(&self) -> Option<Vec<u8>> {
        None
    }

    /// Target contract, for contract messages.
    fn contract_address(&self) -> Option<&str> {
        None
    }
}

pub(crate) fn unknown_field(msg_type: MsgTypeId, field: &str) -> ComposerError {
    ComposerError::UnknownField {
        msg_type,
        field: field.to_string(),
    }
}

/// Closed set of units, one variant per message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageUnit {
    /// Bank send.
    Send(SendUnit),
    /// Delegate or undelegate.
    Stake(StakeUnit),
    /// Redelegate.
    Redelegate(RedelegateUnit),
    /// Withdraw rewards.
    WithdrawReward(WithdrawRewardUnit),
    /// Set withdraw address.
    SetWithdrawAddress(SetWithdrawAddressUnit),
    /// Fund community pool.
    FundCommunityPool(FundCommunityPoolUnit),
    /// Governance vote.
    Vote(VoteUnit),
    /// Create vesting account.
    CreateVestingAccount(CreateVestingAccountUnit),
    /// IBC transfer.
    Transfer(TransferUnit),
    /// Instantiate or instantiate2.
    Instantiate(InstantiateUnit),
    /// Execute contract.
    Execute(ExecuteContractUnit),
    /// Migrate contract.
    Migrate(MigrateUnit),
    /// Update contract admin.
    UpdateAdmin(UpdateAdminUnit),
}

impl MessageUnit {
    /// Fresh unit for `msg_type` with chain-specific defaults.
    pub fn new(msg_type: MsgTypeId, chain: &ChainInfo, config: &ComposerConfig) -> Self {
        match msg_type {
            MsgTypeId::Send => MessageUnit::Send(SendUnit::new(chain)),
            MsgTypeId::Delegate | MsgTypeId::Undelegate => {
                MessageUnit::Stake(StakeUnit::new(msg_type, chain))
            }
            MsgTypeId::BeginRedelegate => MessageUnit::Redelegate(RedelegateUnit::new(chain)),
            MsgTypeId::WithdrawDelegatorReward => {
                MessageUnit::WithdrawReward(WithdrawRewardUnit::default())
            }
            MsgTypeId::SetWithdrawAddress => {
                MessageUnit::SetWithdrawAddress(SetWithdrawAddressUnit::default())
            }
            MsgTypeId::FundCommunityPool => {
                MessageUnit::FundCommunityPool(FundCommunityPoolUnit::new(chain))
            }
            MsgTypeId::Vote => MessageUnit::Vote(VoteUnit::default()),
            MsgTypeId::CreateVestingAccount => {
                MessageUnit::CreateVestingAccount(CreateVestingAccountUnit::new(chain))
            }
            MsgTypeId::Transfer => {
                MessageUnit::Transfer(TransferUnit::new(chain, config.ibc_timeout_secs))
            }
            MsgTypeId::InstantiateContract | MsgTypeId::InstantiateContract2 => {
                MessageUnit::Instantiate(InstantiateUnit::new(msg_type, chain))
            }
            MsgTypeId::ExecuteContract => MessageUnit::Execute(ExecuteContractUnit::new(chain)),
            MsgTypeId::MigrateContract => MessageUnit::Migrate(MigrateUnit::default()),
            MsgTypeId::UpdateAdmin => MessageUnit::UpdateAdmin(UpdateAdminUnit::default()),
        }
    }

    fn inner(&self) -> &dyn MessageEncoder {
        match self {
            MessageUnit::Send(u) => u,
            MessageUnit::Stake(u) => u,
            MessageUnit::Redelegate(u) => u,
            MessageUnit::WithdrawReward(u) => u,
            MessageUnit::SetWithdrawAddress(u) => u,
            MessageUnit::FundCommunityPool(u) => u,
            MessageUnit::Vote(u) => u,
            MessageUnit::CreateVestingAccount(u) => u,
            MessageUnit::Transfer(u) => u,
            MessageUnit::Instantiate(u) => u,
            MessageUnit::Execute(u) => u,
            MessageUnit::Migrate(u) => u,
            MessageUnit::UpdateAdmin(u) => u,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MessageEncoder {
        match self {
            MessageUnit::Send(u) => u,
            MessageUnit::Stake(u) => u,
            MessageUnit::Redelegate(u) => u,
            MessageUnit::WithdrawReward(u) => u,
            MessageUnit::SetWithdrawAddress(u) => u,
            MessageUnit::FundCommunityPool(u) => u,
            MessageUnit::Vote(u) => u,
            MessageUnit::CreateVestingAccount(u) => u,
            MessageUnit::Transfer(u) => u,
            MessageUnit::Instantiate(u) => u,
            MessageUnit::Execute(u) => u,
            MessageUnit::Migrate(u) => u,
            MessageUnit::UpdateAdmin(u) => u,
        }
    }

    /// Message type of this unit.
    pub fn msg_type(&self) -> MsgTypeId {
        self.inner().msg_type()
    }

    /// Store a field input and clear that field's error.
    ///
    /// The body field is accepted here too, as an edit without editor
    /// errors.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), ComposerError> {
        if field == fields::BODY && self.msg_type().has_body() {
            return self.set_body(value, false);
        }
        let inner = self.inner_mut();
        inner.set_field(field, value)?;
        inner.errors_mut().clear(field);
        Ok(())
    }

    /// Record a live body edit. Editor errors mark the body invalid at once.
    pub fn set_body(&mut self, text: &str, content_errors: bool) -> Result<(), ComposerError> {
        let inner = self.inner_mut();
        inner.set_body(text, content_errors)?;
        if content_errors {
            inner.errors_mut().set(fields::BODY, FieldError::InvalidJson);
        } else {
            inner.errors_mut().clear(fields::BODY);
        }
        Ok(())
    }

    /// Pure validity check.
    pub fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), Invalid> {
        self.inner().validate(ctx)
    }

    /// Validation attempt: records the first failing field's error.
    pub fn is_msg_valid(&mut self, ctx: &ValidationContext<'_>) -> bool {
        let result = self.inner().validate(ctx);
        let errors = self.inner_mut().errors_mut();
        errors.clear_all();
        match result {
            Ok(()) => true,
            Err((field, error)) => {
                errors.set(field, error);
                false
            }
        }
    }

    /// Encoded message from the current inputs.
    pub fn msg(&self, ctx: &ValidationContext<'_>) -> EncodedMessage {
        self.inner().msg(ctx)
    }

    /// Current field errors.
    pub fn errors(&self) -> &FieldErrors {
        self.inner().errors()
    }

    /// Field errors plus a recorded code hash lookup failure under
    /// `code_hash`. The lookup failure takes that field's place.
    pub fn error_view(&self) -> FieldErrors {
        let mut view = self.errors().clone();
        if let Some(error) = self.confidential().and_then(|s| s.lookup_error()) {
            view.set(fields::CODE_HASH, error.clone());
        }
        view
    }

    /// Attach an error to one field outside a validation attempt.
    pub fn flag_field(&mut self, field: &'static str, error: FieldError) {
        self.inner_mut().errors_mut().set(field, error);
    }

    /// Confidential state, if this unit encrypts its body.
    pub fn confidential(&self) -> Option<&ConfidentialPayloadState> {
        self.inner().confidential()
    }

    /// Target contract, for contract messages.
    pub fn contract_address(&self) -> Option<&str> {
        self.inner().contract_address()
    }

    /// Issue a derivation ticket if inputs changed since the last one.
    pub fn take_derivation_ticket(
        &mut self,
        slot: SlotKey,
        chain_id: &str,
    ) -> Option<DerivationTicket> {
        let plaintext = self.inner().plaintext();
        self.inner_mut()
            .confidential_mut()?
            .take_ticket(slot, chain_id, plaintext)
    }

    /// Apply a derivation outcome. `false` if stale, issued by another
    /// unit, or not confidential.
    pub fn apply_derivation(&mut self, outcome: DerivationOutcome) -> bool {
        match self.inner_mut().confidential_mut() {
            Some(state) => state.complete(outcome.issuer, outcome.seq, outcome.result),
            None => false,
        }
    }

    /// Detach from derivations issued before this unit was installed.
    pub fn reissue(&mut self) {
        if let Some(state) = self.inner_mut().confidential_mut() {
            state.reissue();
        }
    }

    /// Record or clear a code hash lookup failure.
    pub fn set_lookup_error(&mut self, error: Option<FieldError>) -> Result<(), ComposerError> {
        let msg_type = self.msg_type();
        self.inner_mut()
            .confidential_mut()
            .ok_or(ComposerError::NotConfidential(msg_type))?
            .set_lookup_error(error);
        Ok(())
    }

    /// Validator options for staking units; empty for other units and
    /// while the set is not loaded.
    pub fn validator_options<'a>(&self, ctx: &ValidationContext<'a>) -> &'a [Validator] {
        if self.msg_type().requires_validator_data() {
            ctx.validators
        } else {
            &[]
        }
    }
}
