//! # Domain Errors
//!
//! Error types for each layer of the composer:
//!
//! | Error | Raised by | Scope |
//! |-------|-----------|-------|
//! | `FieldError` | message units | one input field, recoverable |
//! | `BuildError` | assembler | whole draft, nothing persisted |
//! | `CollaboratorError` | outbound ports | converted at the call site |
//! | `ComposerError` | controller / service API | caller misuse or wrapped build |

use thiserror::Error;

use super::value_objects::{MsgTypeId, SlotKey};

/// A validation failure attached to a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Address rejected by the address-validation collaborator.
    #[error("Invalid address for network {chain_id}: {reason}")]
    InvalidAddress {
        /// Chain the address was checked against.
        chain_id: String,
        /// Human-readable reason from the validator.
        reason: String,
    },

    /// Amount below zero.
    #[error("Amount must not be negative")]
    NegativeAmount,

    /// Zero or empty where a positive amount is required.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// Amount is not a decimal number.
    #[error("Invalid amount: {0}")]
    MalformedAmount(String),

    /// Custom denom selected but left empty.
    #[error("Custom denom must be set because of selection above")]
    CustomDenomRequired,

    /// Fractional amount with a custom denom.
    #[error("Amount cannot be decimal for custom denom")]
    FractionalCustomAmount,

    /// Registered-asset conversion failed.
    #[error("{0}")]
    Conversion(String),

    /// Amount resolves to a denom other than the one required.
    #[error("Expected denom {expected}, got {actual}")]
    WrongDenom {
        /// Required base denom.
        expected: String,
        /// Resolved base denom.
        actual: String,
    },

    /// Required text field left empty.
    #[error("Field is required")]
    Required,

    /// Not a positive integer.
    #[error("Must be a positive integer: {0}")]
    NotPositiveInteger(String),

    /// IBC channel id does not match `channel-N`.
    #[error("Invalid channel id: {0}")]
    InvalidChannel(String),

    /// Unknown vote option.
    #[error("Invalid vote option: {0}")]
    InvalidVoteOption(String),

    /// Unknown boolean literal.
    #[error("Expected true or false, got {0}")]
    InvalidFlag(String),

    /// Source and destination validator are the same.
    #[error("Source and destination validator must differ")]
    SameValidator,

    /// Structured body failed to parse in the editor.
    #[error("Message body is not valid JSON")]
    InvalidJson,

    /// Confidential call without a remote endpoint.
    #[error("Endpoint is required to encrypt the message")]
    MissingEndpoint,

    /// Confidential call without a code hash.
    #[error("Code hash is required to encrypt the message")]
    MissingCodeHash,

    /// Encryption round trip against the endpoint failed.
    #[error("Encryption endpoint failed: {0}")]
    EndpointFailure(String),

    /// Code hash lookup failed.
    #[error("Code hash lookup failed: {0}")]
    CodeHashLookupFailed(String),

    /// A newer encryption is still outstanding.
    #[error("Encrypted message is not ready yet")]
    EncryptionPending,
}

/// Assembly-time failure. A failed build persists nothing and leaves the
/// message list untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Sender account has no account number yet.
    #[error("Account number is missing; the account must exist on chain")]
    MissingAccountNumber,

    /// Nothing to assemble.
    #[error("Transaction has no messages")]
    NoMessages,

    /// Some messages failed validation.
    #[error("{invalid} of {total} messages are invalid")]
    InvalidMessages {
        /// Number of invalid units.
        invalid: usize,
        /// Number of slots.
        total: usize,
    },

    /// Gas limit is not a positive safe integer.
    #[error("Invalid gas limit: {0}")]
    InvalidGasLimit(String),

    /// Chain gas price could not be parsed.
    #[error("Invalid chain gas price: {0}")]
    GasPrice(#[from] shared_types::GasPriceError),

    /// Fee does not fit in 128 bits.
    #[error("Fee overflow for gas limit {0}")]
    FeeOverflow(u64),

    /// Draft could not be serialized.
    #[error("Failed to serialize draft: {0}")]
    Serialization(String),

    /// Persistence collaborator failed.
    #[error("Failed to store transaction: {0}")]
    Store(CollaboratorError),
}

impl BuildError {
    /// Name of the form field the error belongs to, if field-level.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            BuildError::InvalidGasLimit(_) => Some(crate::messages::fields::GAS_LIMIT),
            _ => None,
        }
    }
}

/// Failure reported by an outbound port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Endpoint could not be reached.
    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    /// Endpoint answered but the lookup failed.
    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    /// Endpoint answered with an unexpected body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Coin conversion failed.
    #[error("{0}")]
    Conversion(String),

    /// Sealing the body failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Persistence failed.
    #[error("Storage failed: {0}")]
    Storage(String),
}

/// Errors returned by the controller and service API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    /// Position past the end of the list.
    #[error("Slot index {index} out of range (len {len})")]
    SlotIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// Slot was removed or never existed.
    #[error("Slot not found: {0}")]
    SlotNotFound(SlotKey),

    /// Unit does not match the slot's message type.
    #[error("Unit type {actual} does not match slot type {expected}")]
    UnitTypeMismatch {
        /// Slot type.
        expected: MsgTypeId,
        /// Unit type.
        actual: MsgTypeId,
    },

    /// Field name unknown for this message type.
    #[error("Unknown field {field} for {msg_type}")]
    UnknownField {
        /// Message type.
        msg_type: MsgTypeId,
        /// Offending field name.
        field: String,
    },

    /// Message type has no structured body.
    #[error("{0} has no message body")]
    NoBody(MsgTypeId),

    /// Operation only applies to confidential contract calls.
    #[error("{0} does not use confidential encryption on this chain")]
    NotConfidential(MsgTypeId),

    /// Code hash lookup failed; the error is also recorded on the unit.
    #[error("Code hash lookup failed: {0}")]
    CodeHashLookup(CollaboratorError),

    /// Assembly failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}
