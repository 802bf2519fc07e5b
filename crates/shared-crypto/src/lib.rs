//! # Shared Crypto - Confidential Payload Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Body encryption |
//! | `envelope` | X25519 + SHA-256 KDF | Sealing a body for a chain key |
//!
//! ## Envelope Layout
//!
//! ```text
//! ┌────────────┬──────────────────────┬──────────────────────────────┐
//! │ nonce (24) │ ephemeral pubkey (32)│ ciphertext(code_hash ‖ body) │
//! └────────────┴──────────────────────┴──────────────────────────────┘
//! ```
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit random nonce, constant-time ARX design
//! - **X25519**: fresh ephemeral key per sealed body

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod errors;
pub mod symmetric;

// Re-exports
pub use envelope::{
    open, public_key_for, seal, ChainEncryptionKey, SealedPayload, ENVELOPE_HEADER_LEN,
};
pub use errors::CryptoError;
pub use symmetric::{decrypt, encrypt, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
