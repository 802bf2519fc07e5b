//! # Composer Service
//!
//! Application service wiring the message list, the assembler and the
//! outbound ports behind `ComposerApi`.
//!
//! Every state change goes through `&mut self`. Suspension points are the
//! confidential derivation and the code hash lookup; the deferred API splits
//! a derivation into issue, run and apply so callers can interleave them.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AccountInfo, ChainInfo, Validator};
use tracing::{debug, info, warn};

use super::assembler;
use super::controller::{MessageListController, MessageSlot};
use crate::adapters::ValidatorSetCache;
use crate::algorithms::{derive_payload, DerivationOutcome, DerivationTicket};
use crate::config::ComposerConfig;
use crate::domain::{
    BuildError, CollaboratorError, ComposerError, FieldError, FieldErrors, MsgTypeId, SlotKey,
    TransactionDraft,
};
use crate::messages::{fields, MessageUnit, ValidationContext};
use crate::ports::{
    AddressValidator, CoinConverter, ComposerApi, ConfidentialEndpoint, TxStore,
    ValidatorSetLoader,
};

/// Outbound collaborators.
#[derive(Clone)]
pub struct ComposerPorts {
    /// Address validation.
    pub addresses: Arc<dyn AddressValidator>,
    /// Display-to-base coin conversion.
    pub coins: Arc<dyn CoinConverter>,
    /// Confidential endpoint.
    pub endpoint: Arc<dyn ConfidentialEndpoint>,
    /// Transaction persistence.
    pub store: Arc<dyn TxStore>,
    /// Bonded-validator loader.
    pub validator_loader: Arc<dyn ValidatorSetLoader>,
}

/// Composer Service - orchestrates composition for one sender on one chain.
pub struct ComposerService {
    config: ComposerConfig,
    chain: ChainInfo,
    account: AccountInfo,
    memo: String,
    controller: MessageListController,
    ports: ComposerPorts,
    validators: Arc<ValidatorSetCache>,
}

fn context<'a>(
    chain: &'a ChainInfo,
    account: &'a AccountInfo,
    ports: &'a ComposerPorts,
    validators: &'a [Validator],
) -> ValidationContext<'a> {
    ValidationContext {
        chain,
        sender: &account.address,
        addresses: ports.addresses.as_ref(),
        coins: ports.coins.as_ref(),
        validators,
    }
}

impl ComposerService {
    /// New session for `account` on `chain`.
    pub fn new(
        config: ComposerConfig,
        chain: ChainInfo,
        account: AccountInfo,
        ports: ComposerPorts,
    ) -> Self {
        let validators = Arc::new(ValidatorSetCache::new(
            chain.clone(),
            Arc::clone(&ports.validator_loader),
        ));
        Self {
            controller: MessageListController::new(config.clone()),
            config,
            chain,
            account,
            memo: String::new(),
            ports,
            validators,
        }
    }

    /// Active chain.
    pub fn chain(&self) -> &ChainInfo {
        &self.chain
    }

    /// Sender account.
    pub fn account(&self) -> &AccountInfo {
        &self.account
    }

    /// Current memo.
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Slots in order.
    pub fn slots(&self) -> &[MessageSlot] {
        self.controller.slots()
    }

    /// Slot by key.
    pub fn slot(&self, slot: SlotKey) -> Result<&MessageSlot, ComposerError> {
        self.controller.slot(slot)
    }

    /// Gas limit field contents.
    pub fn gas_limit_input(&self) -> &str {
        self.controller.gas_limit_input()
    }

    /// Session validator cache.
    pub fn validator_cache(&self) -> &Arc<ValidatorSetCache> {
        &self.validators
    }

    /// Current field errors of a slot, including a failed code hash lookup.
    pub fn slot_errors(&self, slot: SlotKey) -> Result<FieldErrors, ComposerError> {
        Ok(self.controller.slot(slot)?.unit().error_view())
    }

    /// Validator choices for a slot; empty until the set is loaded.
    pub fn validator_options(&self, slot: SlotKey) -> Result<Vec<Validator>, ComposerError> {
        let validators = self.validators.snapshot();
        let ctx = context(&self.chain, &self.account, &self.ports, &validators);
        let unit = self.controller.slot(slot)?.unit();
        Ok(unit.validator_options(&ctx).to_vec())
    }

    /// Register a unit under a stable key. Fails once the slot is gone.
    pub fn register_unit(&mut self, slot: SlotKey, unit: MessageUnit) -> Result<(), ComposerError> {
        self.controller.register_unit(slot, unit)
    }

    fn edit_unit(
        &mut self,
        slot: SlotKey,
        edit: impl FnOnce(&mut MessageUnit) -> Result<(), ComposerError>,
    ) -> Result<Option<DerivationTicket>, ComposerError> {
        let unit = self.controller.slot_mut(slot)?.unit_mut();
        edit(unit)?;
        Ok(unit.take_derivation_ticket(slot, &self.chain.chain_id))
    }

    async fn run_ticket(&mut self, ticket: Option<DerivationTicket>) {
        if let Some(ticket) = ticket {
            let outcome = derive_payload(ticket, self.ports.endpoint.as_ref()).await;
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: DerivationOutcome) -> bool {
        match self.controller.slot_mut(outcome.slot) {
            Ok(slot) => slot.unit_mut().apply_derivation(outcome),
            Err(_) => {
                debug!(slot = %outcome.slot, seq = outcome.seq, "Derivation for removed slot dropped");
                false
            }
        }
    }

    fn record_lookup_failure(&mut self, slot: SlotKey, error: FieldError) -> Result<(), ComposerError> {
        self.controller
            .slot_mut(slot)?
            .unit_mut()
            .set_lookup_error(Some(error))
    }
}

#[async_trait]
impl ComposerApi for ComposerService {
    fn add_message_type(&mut self, msg_type: MsgTypeId) -> SlotKey {
        self.controller.add_message_type(msg_type, &self.chain)
    }

    fn add_message_type_requiring_validator_data(&mut self, msg_type: MsgTypeId) -> SlotKey {
        if self.config.validator_cache_enabled {
            self.validators.trigger();
        }
        self.controller.add_message_type(msg_type, &self.chain)
    }

    fn remove_slot(&mut self, index: usize) -> Result<SlotKey, ComposerError> {
        self.controller.remove_slot(index).map(|slot| slot.key())
    }

    fn set_unit_for_slot(&mut self, index: usize, unit: MessageUnit) -> Result<(), ComposerError> {
        self.controller.set_unit_for_slot(index, unit)
    }

    async fn edit_field(
        &mut self,
        slot: SlotKey,
        field: &str,
        value: &str,
    ) -> Result<(), ComposerError> {
        let ticket = self.edit_unit(slot, |unit| unit.set_field(field, value))?;
        self.run_ticket(ticket).await;
        Ok(())
    }

    async fn edit_body(
        &mut self,
        slot: SlotKey,
        text: &str,
        content_errors: bool,
    ) -> Result<(), ComposerError> {
        let ticket = self.edit_unit(slot, |unit| unit.set_body(text, content_errors))?;
        self.run_ticket(ticket).await;
        Ok(())
    }

    fn edit_field_deferred(
        &mut self,
        slot: SlotKey,
        field: &str,
        value: &str,
    ) -> Result<Option<DerivationTicket>, ComposerError> {
        self.edit_unit(slot, |unit| unit.set_field(field, value))
    }

    async fn derive(&self, ticket: DerivationTicket) -> DerivationOutcome {
        derive_payload(ticket, self.ports.endpoint.as_ref()).await
    }

    fn apply_derivation(&mut self, outcome: DerivationOutcome) -> bool {
        self.apply_outcome(outcome)
    }

    async fn fetch_code_hash(&mut self, slot: SlotKey) -> Result<String, ComposerError> {
        let unit = self.controller.slot(slot)?.unit();
        let endpoint = unit
            .confidential()
            .ok_or(ComposerError::NotConfidential(unit.msg_type()))?
            .endpoint()
            .to_string();
        let contract = unit.contract_address().unwrap_or_default().to_string();
        if contract.is_empty() {
            self.controller
                .slot_mut(slot)?
                .unit_mut()
                .flag_field(fields::CONTRACT_ADDRESS, FieldError::Required);
            return Err(ComposerError::CodeHashLookup(CollaboratorError::LookupFailed(
                "contract address is empty".to_string(),
            )));
        }

        let lookup = self
            .ports
            .endpoint
            .query_code_hash(&endpoint, &self.chain.chain_id, &contract)
            .await;

        match lookup {
            Ok(code_hash) => {
                info!(slot = %slot, contract = %contract, "Code hash resolved");
                self.edit_field(slot, fields::CODE_HASH, &code_hash).await?;
                Ok(code_hash)
            }
            Err(e) => {
                warn!(slot = %slot, contract = %contract, error = %e, "Code hash lookup failed");
                self.record_lookup_failure(slot, FieldError::CodeHashLookupFailed(e.to_string()))?;
                Err(ComposerError::CodeHashLookup(e))
            }
        }
    }

    fn set_memo(&mut self, memo: &str) {
        self.memo = memo.to_string();
    }

    fn set_gas_limit(&mut self, input: &str) {
        self.controller.set_gas_limit_input(input);
    }

    fn gas_estimate(&self) -> u64 {
        self.controller.gas_estimate()
    }

    fn is_slot_valid(&mut self, slot: SlotKey) -> Result<bool, ComposerError> {
        let validators = self.validators.snapshot();
        let ctx = context(&self.chain, &self.account, &self.ports, &validators);
        let unit = self.controller.slot_mut(slot)?.unit_mut();
        Ok(unit.is_msg_valid(&ctx))
    }

    fn build(&mut self) -> Result<TransactionDraft, ComposerError> {
        let validators = self.validators.snapshot();
        let ctx = context(&self.chain, &self.account, &self.ports, &validators);
        let gas_limit_input = self.controller.gas_limit_input().to_string();
        let draft = assembler::build(
            self.controller.slots_mut(),
            &ctx,
            &self.account,
            &self.memo,
            &gas_limit_input,
        )?;
        Ok(draft)
    }

    async fn submit(&mut self) -> Result<String, ComposerError> {
        let draft = self.build()?;
        let canonical_json = draft
            .to_canonical_json()
            .map_err(|e| BuildError::Serialization(e.to_string()))?;

        let id = self
            .ports
            .store
            .create_transaction(
                &self.account.address,
                &self.chain.chain_id,
                &draft,
                &canonical_json,
            )
            .await
            .map_err(BuildError::Store)?;

        info!(id = %id, chain_id = %self.chain.chain_id, msgs = draft.msgs.len(), "Transaction stored");
        Ok(id)
    }
}
