//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Sealed payload shorter than its fixed header
    #[error("Envelope truncated: {len} bytes, header needs {header}")]
    EnvelopeTruncated {
        /// Received length
        len: usize,
        /// Header length
        header: usize,
    },

    /// Nothing to seal
    #[error("Empty plaintext")]
    EmptyPlaintext,
}
