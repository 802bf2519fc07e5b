//! # Shared Types Crate
//!
//! Chain metadata, registered assets, coins, account metadata and fee types
//! used across the composer workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Chain and fee types are defined here once.
//! - **Caller-supplied chain data**: `ChainInfo` is deserialized from the
//!   chain registry JSON the caller already holds; this crate performs no
//!   lookups of its own.
//! - **Base units on the wire**: every `Coin` amount is an integer string in
//!   the asset's base denomination.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
