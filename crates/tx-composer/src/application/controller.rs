//! # Message List Controller
//!
//! Owns the ordered list of slots and the gas limit input.
//!
//! Slots are addressed by position for user actions and by stable key for
//! registration, so a late registration from a removed slot can never land
//! in a neighbour.

use shared_types::ChainInfo;
use tracing::{debug, info};

use crate::algorithms::gas_of_tx;
use crate::config::ComposerConfig;
use crate::domain::{ComposerError, MsgTypeId, SlotKey};
use crate::messages::MessageUnit;

/// One entry of the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSlot {
    key: SlotKey,
    msg_type: MsgTypeId,
    unit: MessageUnit,
}

impl MessageSlot {
    /// Stable key.
    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// Message type, fixed for the slot's lifetime.
    pub fn msg_type(&self) -> MsgTypeId {
        self.msg_type
    }

    /// The slot's unit.
    pub fn unit(&self) -> &MessageUnit {
        &self.unit
    }

    /// Mutable unit.
    pub fn unit_mut(&mut self) -> &mut MessageUnit {
        &mut self.unit
    }
}

/// Ordered slots plus the gas limit field.
#[derive(Debug, Clone)]
pub struct MessageListController {
    config: ComposerConfig,
    slots: Vec<MessageSlot>,
    gas_estimate: u64,
    gas_limit_input: String,
}

impl MessageListController {
    /// Empty list.
    pub fn new(config: ComposerConfig) -> Self {
        let gas_estimate = gas_of_tx(&[], &config.gas);
        Self {
            config,
            slots: Vec::new(),
            gas_estimate,
            gas_limit_input: gas_estimate.to_string(),
        }
    }

    /// Append a slot with a fresh key and a default unit.
    pub fn add_message_type(&mut self, msg_type: MsgTypeId, chain: &ChainInfo) -> SlotKey {
        let key = SlotKey::new();
        let unit = MessageUnit::new(msg_type, chain, &self.config);
        self.slots.push(MessageSlot {
            key,
            msg_type,
            unit,
        });
        info!(slot = %key, %msg_type, len = self.slots.len(), "Slot added");
        self.refresh_gas_estimate();
        key
    }

    /// Remove exactly the slot at `index`.
    pub fn remove_slot(&mut self, index: usize) -> Result<MessageSlot, ComposerError> {
        self.check_index(index)?;
        let slot = self.slots.remove(index);
        info!(slot = %slot.key, msg_type = %slot.msg_type, len = self.slots.len(), "Slot removed");
        self.refresh_gas_estimate();
        Ok(slot)
    }

    /// Replace the unit at `index`, resolved to that slot's key now.
    pub fn set_unit_for_slot(&mut self, index: usize, unit: MessageUnit) -> Result<(), ComposerError> {
        self.check_index(index)?;
        let key = self.slots[index].key;
        self.register_unit(key, unit)
    }

    /// Replace the unit of the slot with `key`.
    pub fn register_unit(&mut self, key: SlotKey, unit: MessageUnit) -> Result<(), ComposerError> {
        let slot = self.slot_mut(key)?;
        if unit.msg_type() != slot.msg_type {
            return Err(ComposerError::UnitTypeMismatch {
                expected: slot.msg_type,
                actual: unit.msg_type(),
            });
        }
        slot.unit = unit;
        slot.unit.reissue();
        debug!(slot = %key, "Unit registered");
        Ok(())
    }

    /// Slots in order.
    pub fn slots(&self) -> &[MessageSlot] {
        &self.slots
    }

    /// Mutable slots in order.
    pub fn slots_mut(&mut self) -> &mut [MessageSlot] {
        &mut self.slots
    }

    /// Slot by key.
    pub fn slot(&self, key: SlotKey) -> Result<&MessageSlot, ComposerError> {
        self.slots
            .iter()
            .find(|s| s.key == key)
            .ok_or(ComposerError::SlotNotFound(key))
    }

    /// Mutable slot by key.
    pub fn slot_mut(&mut self, key: SlotKey) -> Result<&mut MessageSlot, ComposerError> {
        self.slots
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or(ComposerError::SlotNotFound(key))
    }

    /// Position of the slot with `key`.
    pub fn position(&self, key: SlotKey) -> Option<usize> {
        self.slots.iter().position(|s| s.key == key)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// No slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Message types in order.
    pub fn msg_types(&self) -> Vec<MsgTypeId> {
        self.slots.iter().map(|s| s.msg_type).collect()
    }

    /// Estimate for the current types.
    pub fn gas_estimate(&self) -> u64 {
        self.gas_estimate
    }

    /// Gas limit field contents.
    pub fn gas_limit_input(&self) -> &str {
        &self.gas_limit_input
    }

    /// Explicit user edit of the gas limit.
    pub fn set_gas_limit_input(&mut self, input: &str) {
        self.gas_limit_input = input.to_string();
    }

    fn refresh_gas_estimate(&mut self) {
        self.gas_estimate = gas_of_tx(&self.msg_types(), &self.config.gas);
        self.gas_limit_input = self.gas_estimate.to_string();
        debug!(gas = self.gas_estimate, "Gas estimate updated");
    }

    fn check_index(&self, index: usize) -> Result<(), ComposerError> {
        if index >= self.slots.len() {
            return Err(ComposerError::SlotIndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        Ok(())
    }
}
