//! # Ports Layer (Hexagonal Architecture)
//!
//! Inbound: `ComposerApi`. Outbound: address validation, coin conversion,
//! confidential endpoint, validator loader, transaction store.

pub mod inbound;
pub mod outbound;

pub use inbound::ComposerApi;
pub use outbound::{
    AddressValidator, CoinConverter, ConfidentialEndpoint, MockConfidentialEndpoint,
    MockValidatorLoader, TxStore, ValidatorSetLoader,
};
