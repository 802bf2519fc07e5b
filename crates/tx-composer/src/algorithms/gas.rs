//! # Gas Estimation
//!
//! `estimate = tx_flat + Σ weight(type)`, a pure function of the ordered
//! message types. Field contents never affect it.

use crate::config::GasWeights;
use crate::domain::MsgTypeId;

/// Gas weight of a single message.
pub fn gas_of_msg(msg_type: MsgTypeId, weights: &GasWeights) -> u64 {
    weights.weight(msg_type)
}

/// Estimated gas limit for a transaction with these messages.
pub fn gas_of_tx(msg_types: &[MsgTypeId], weights: &GasWeights) -> u64 {
    msg_types
        .iter()
        .fold(weights.tx_flat, |acc, t| acc.saturating_add(gas_of_msg(*t, weights)))
}
