//! # Tx-Composer Test Suite
//!
//! End-to-end flows through `ComposerService` with real adapters where they
//! are local (bech32, asset conversion, in-memory store) and mocks where
//! they would hit the network.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Chains, accounts, addresses, service wiring
//! └── integration/      # Composition, confidential and validator flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p composer-tests
//! cargo test -p composer-tests integration::confidential_flows
//! ```

pub mod fixtures;
pub mod integration;
