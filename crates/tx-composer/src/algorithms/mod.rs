//! # Algorithms
//!
//! Pure computations used by the units and the assembler.

pub mod amount;
pub mod canonical;
pub mod confidential;
pub mod fee;
pub mod gas;

pub use amount::{AmountError, DisplayAmount};
pub use canonical::{canonicalize, sort_keys, to_canonical_string};
pub use confidential::{
    derive_payload, ConfidentialPayloadState, DerivationOutcome, DerivationTicket,
};
pub use fee::calculate_fee;
pub use gas::{gas_of_msg, gas_of_tx};
