//! # Chain Envelope
//!
//! Seals a contract-call body for a chain's transaction-encryption key.
//!
//! The sender generates an ephemeral X25519 key, agrees a shared secret with
//! the chain key and encrypts `code_hash ‖ body` under
//! `SHA-256(ENVELOPE_KDF_LABEL ‖ shared_secret)`.

use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use crate::symmetric::{self, Nonce, SecretKey, NONCE_LEN};
use crate::CryptoError;

/// Public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Bytes preceding the ciphertext: nonce followed by the ephemeral key.
pub const ENVELOPE_HEADER_LEN: usize = NONCE_LEN + PUBLIC_KEY_LEN;

const ENVELOPE_KDF_LABEL: &[u8] = b"tx-composer/confidential-envelope/v1";

/// A chain's 32-byte transaction-encryption public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainEncryptionKey([u8; PUBLIC_KEY_LEN]);

impl ChainEncryptionKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

/// Output of [`seal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedPayload(Vec<u8>);

impl SealedPayload {
    /// Wrap raw envelope bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the full envelope.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the full envelope.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn derive_key(shared_secret: &[u8; 32]) -> SecretKey {
    let mut hasher = Sha256::new();
    hasher.update(ENVELOPE_KDF_LABEL);
    hasher.update(shared_secret);
    SecretKey::from_bytes(hasher.finalize().into())
}

/// Seal `body` for `chain_key`, binding it to `code_hash`.
///
/// # Errors
///
/// `EmptyPlaintext` for an empty body, `EncryptionFailed` from the AEAD.
pub fn seal(
    chain_key: &ChainEncryptionKey,
    code_hash: &str,
    body: &[u8],
) -> Result<SealedPayload, CryptoError> {
    if body.is_empty() {
        return Err(CryptoError::EmptyPlaintext);
    }

    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&PublicKey::from(*chain_key.as_bytes()));
    let key = derive_key(shared.as_bytes());

    let mut plaintext = Vec::with_capacity(code_hash.len() + body.len());
    plaintext.extend_from_slice(code_hash.as_bytes());
    plaintext.extend_from_slice(body);

    let (ciphertext, nonce) = symmetric::encrypt(&key, &plaintext)?;

    let mut out = Vec::with_capacity(ENVELOPE_HEADER_LEN + ciphertext.len());
    out.extend_from_slice(nonce.as_bytes());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(SealedPayload(out))
}

/// Open an envelope with the chain's secret key.
///
/// Returns `code_hash ‖ body` as sealed.
pub fn open(chain_secret: &[u8; 32], sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() <= ENVELOPE_HEADER_LEN {
        return Err(CryptoError::EnvelopeTruncated {
            len: sealed.len(),
            header: ENVELOPE_HEADER_LEN,
        });
    }

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&sealed[..NONCE_LEN]);
    let mut ephemeral_public = [0u8; PUBLIC_KEY_LEN];
    ephemeral_public.copy_from_slice(&sealed[NONCE_LEN..ENVELOPE_HEADER_LEN]);

    let secret = StaticSecret::from(*chain_secret);
    let shared = secret.diffie_hellman(&PublicKey::from(ephemeral_public));
    let key = derive_key(shared.as_bytes());

    symmetric::decrypt(
        &key,
        &sealed[ENVELOPE_HEADER_LEN..],
        &Nonce::from_bytes(nonce),
    )
}

/// Public key matching a chain secret.
pub fn public_key_for(chain_secret: &[u8; 32]) -> ChainEncryptionKey {
    let secret = StaticSecret::from(*chain_secret);
    ChainEncryptionKey(*PublicKey::from(&secret).as_bytes())
}
