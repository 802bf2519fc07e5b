//! # Inbound Ports
//!
//! API trait defining what the composer can do.

use async_trait::async_trait;

use crate::algorithms::{DerivationOutcome, DerivationTicket};
use crate::domain::{ComposerError, MsgTypeId, SlotKey, TransactionDraft};
use crate::messages::MessageUnit;

/// Composer API - inbound port.
#[async_trait]
pub trait ComposerApi: Send {
    /// Append a slot for `msg_type`.
    fn add_message_type(&mut self, msg_type: MsgTypeId) -> SlotKey;

    /// Append a slot and start loading the validator set without waiting.
    fn add_message_type_requiring_validator_data(&mut self, msg_type: MsgTypeId) -> SlotKey;

    /// Remove the slot at `index`.
    fn remove_slot(&mut self, index: usize) -> Result<SlotKey, ComposerError>;

    /// Replace the unit at `index`.
    fn set_unit_for_slot(&mut self, index: usize, unit: MessageUnit) -> Result<(), ComposerError>;

    /// Edit a field, re-deriving a confidential body if needed.
    async fn edit_field(
        &mut self,
        slot: SlotKey,
        field: &str,
        value: &str,
    ) -> Result<(), ComposerError>;

    /// Edit a structured body, re-deriving a confidential body if needed.
    async fn edit_body(
        &mut self,
        slot: SlotKey,
        text: &str,
        content_errors: bool,
    ) -> Result<(), ComposerError>;

    /// Edit a field and return the derivation ticket instead of running it.
    fn edit_field_deferred(
        &mut self,
        slot: SlotKey,
        field: &str,
        value: &str,
    ) -> Result<Option<DerivationTicket>, ComposerError>;

    /// Run a derivation. Does not touch composer state.
    async fn derive(&self, ticket: DerivationTicket) -> DerivationOutcome;

    /// Apply a derivation outcome; `false` if stale or the slot is gone.
    fn apply_derivation(&mut self, outcome: DerivationOutcome) -> bool;

    /// Look up the code hash of the slot's contract and store it.
    async fn fetch_code_hash(&mut self, slot: SlotKey) -> Result<String, ComposerError>;

    /// Set the memo.
    fn set_memo(&mut self, memo: &str);

    /// Override the gas limit input.
    fn set_gas_limit(&mut self, input: &str);

    /// Current gas estimate.
    fn gas_estimate(&self) -> u64;

    /// Validation attempt on one slot.
    fn is_slot_valid(&mut self, slot: SlotKey) -> Result<bool, ComposerError>;

    /// Build the draft without persisting it.
    fn build(&mut self) -> Result<TransactionDraft, ComposerError>;

    /// Build and persist; returns the store's id.
    async fn submit(&mut self) -> Result<String, ComposerError>;
}
