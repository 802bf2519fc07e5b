//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits.

mod asset_converter;
mod bech32_address;
mod lcd_client;
mod memory_store;
mod validator_cache;

pub use asset_converter::AssetCoinConverter;
pub use bech32_address::Bech32AddressValidator;
pub use lcd_client::LcdClient;
pub use memory_store::{InMemoryTxStore, StoredTransaction};
pub use validator_cache::{CacheStatus, ValidatorSetCache};
