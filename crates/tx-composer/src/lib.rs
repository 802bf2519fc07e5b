//! # Tx Composer
//!
//! Multi-message transaction composition for Cosmos-SDK chains.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Let a caller stack several heterogeneous messages into one transaction:
//! - One encoder/validator unit per message type, owning its raw inputs
//! - Gas estimate derived from the ordered list of message types
//! - Client-side encryption of contract-execution bodies on chains that
//!   require it, with ordering by per-unit sequence numbers
//! - All-or-nothing assembly into an unsigned draft handed to a store
//!
//! ## Assembly Rules
//!
//! | Rule | Failure |
//! |------|---------|
//! | Account number known | `BuildError::MissingAccountNumber` |
//! | At least one slot | `BuildError::NoMessages` |
//! | Every unit valid | `BuildError::InvalidMessages` |
//! | Gas limit positive safe integer | `BuildError::InvalidGasLimit` |
//!
//! ## Module Structure
//!
//! ```text
//! tx-composer/
//! ├── domain/          # Message types, drafts, field state, errors, invariants
//! ├── algorithms/      # Amounts, canonical JSON, gas, fee, confidential payloads
//! ├── messages/        # One unit per message type
//! ├── ports/           # API trait (inbound) + collaborator traits (outbound)
//! ├── adapters/        # bech32, asset conversion, LCD client, store, validator cache
//! ├── application/     # List controller, assembler, ComposerService
//! └── config.rs        # ComposerConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod messages;
pub mod ports;

// Re-exports
pub use adapters::{
    AssetCoinConverter, Bech32AddressValidator, CacheStatus, InMemoryTxStore, LcdClient,
    StoredTransaction, ValidatorSetCache,
};
pub use algorithms::{
    calculate_fee, canonicalize, gas_of_msg, gas_of_tx, to_canonical_string, DerivationOutcome,
    DerivationTicket, DisplayAmount,
};
pub use application::{ComposerPorts, ComposerService, MessageListController, MessageSlot};
pub use config::{ComposerConfig, ConfigError, GasWeights};
pub use domain::{
    BuildError, CollaboratorError, ComposerError, EncodedMessage, FieldError, FieldErrors,
    MsgTypeId, SlotKey, TransactionDraft, VoteOption, MAX_SAFE_GAS,
};
pub use messages::{fields, MessageUnit, ValidationContext};
pub use ports::{
    AddressValidator, CoinConverter, ComposerApi, ConfidentialEndpoint, MockConfidentialEndpoint,
    MockValidatorLoader, TxStore, ValidatorSetLoader,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
