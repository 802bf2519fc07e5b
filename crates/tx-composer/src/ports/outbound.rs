//! # Outbound Ports
//!
//! Collaborators the composer depends on: address validation, coin
//! conversion, the confidential endpoint, the validator-set loader and
//! transaction persistence.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::{public_key_for, ChainEncryptionKey};
use shared_types::{ChainInfo, Coin, RegisteredAsset, Validator};

use crate::domain::{CollaboratorError, TransactionDraft};

/// Address validation - outbound port.
pub trait AddressValidator: Send + Sync {
    /// `None` if `address` is valid for `prefix`, otherwise a reason.
    fn check(&self, address: &str, prefix: &str) -> Option<String>;
}

/// Display-to-base coin conversion - outbound port.
pub trait CoinConverter: Send + Sync {
    /// Convert `display_amount` of `display_denom` into a base-unit coin.
    fn to_base_coin(
        &self,
        display_denom: &str,
        display_amount: &str,
        assets: &[RegisteredAsset],
    ) -> Result<Coin, CollaboratorError>;
}

/// Remote endpoint serving confidential-contract metadata - outbound port.
#[async_trait]
pub trait ConfidentialEndpoint: Send + Sync {
    /// Code hash of the contract at `contract_address`.
    async fn query_code_hash(
        &self,
        endpoint: &str,
        chain_id: &str,
        contract_address: &str,
    ) -> Result<String, CollaboratorError>;

    /// The chain's transaction-encryption public key.
    async fn fetch_encryption_key(
        &self,
        endpoint: &str,
        chain_id: &str,
    ) -> Result<ChainEncryptionKey, CollaboratorError>;
}

/// Bonded-validator reference data - outbound port.
#[async_trait]
pub trait ValidatorSetLoader: Send + Sync {
    /// Load the bonded validators of `chain`.
    async fn load_validators(&self, chain: &ChainInfo) -> Result<Vec<Validator>, CollaboratorError>;
}

/// Transaction persistence - outbound port.
///
/// Called at most once per build, never retried.
#[async_trait]
pub trait TxStore: Send + Sync {
    /// Persist a draft and return an opaque id.
    async fn create_transaction(
        &self,
        sender_address: &str,
        chain_id: &str,
        draft: &TransactionDraft,
        canonical_json: &str,
    ) -> Result<String, CollaboratorError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock confidential endpoint backed by a fixed chain secret.
#[derive(Default)]
pub struct MockConfidentialEndpoint {
    chain_secret: [u8; 32],
    code_hashes: HashMap<String, String>,
    fail_key_fetch: bool,
    delays: Mutex<VecDeque<Duration>>,
    key_fetches: AtomicUsize,
    code_hash_queries: AtomicUsize,
}

impl MockConfidentialEndpoint {
    /// Endpoint whose chain key matches `chain_secret`.
    pub fn new(chain_secret: [u8; 32]) -> Self {
        Self {
            chain_secret,
            ..Self::default()
        }
    }

    /// Register a contract's code hash.
    pub fn with_code_hash(mut self, contract: &str, code_hash: &str) -> Self {
        self.code_hashes
            .insert(contract.to_string(), code_hash.to_string());
        self
    }

    /// Make every key fetch fail as unreachable.
    pub fn failing_key_fetch(mut self) -> Self {
        self.fail_key_fetch = true;
        self
    }

    /// Delay the n-th key fetch by the n-th duration.
    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        *self.delays.lock() = delays.into_iter().collect();
        self
    }

    /// Number of key fetches so far.
    pub fn key_fetches(&self) -> usize {
        self.key_fetches.load(Ordering::SeqCst)
    }

    /// Number of code hash queries so far.
    pub fn code_hash_queries(&self) -> usize {
        self.code_hash_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfidentialEndpoint for MockConfidentialEndpoint {
    async fn query_code_hash(
        &self,
        endpoint: &str,
        _chain_id: &str,
        contract_address: &str,
    ) -> Result<String, CollaboratorError> {
        self.code_hash_queries.fetch_add(1, Ordering::SeqCst);
        if endpoint.is_empty() {
            return Err(CollaboratorError::Unreachable("no endpoint".to_string()));
        }
        self.code_hashes
            .get(contract_address)
            .cloned()
            .ok_or_else(|| {
                CollaboratorError::LookupFailed(format!("no contract at {contract_address}"))
            })
    }

    async fn fetch_encryption_key(
        &self,
        _endpoint: &str,
        _chain_id: &str,
    ) -> Result<ChainEncryptionKey, CollaboratorError> {
        self.key_fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_key_fetch {
            return Err(CollaboratorError::Unreachable("mock failure".to_string()));
        }
        Ok(public_key_for(&self.chain_secret))
    }
}

/// Mock validator loader counting its calls.
#[derive(Default)]
pub struct MockValidatorLoader {
    /// Validators returned by every load.
    pub validators: Vec<Validator>,
    /// Delay before answering.
    pub delay: Duration,
    /// Should fail?
    pub should_fail: bool,
    calls: AtomicUsize,
}

impl MockValidatorLoader {
    /// Loader returning `validators`.
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            validators,
            ..Self::default()
        }
    }

    /// Answer after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every load fail.
    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of loads started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ValidatorSetLoader for MockValidatorLoader {
    async fn load_validators(&self, _chain: &ChainInfo) -> Result<Vec<Validator>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.should_fail {
            return Err(CollaboratorError::Unreachable("mock failure".to_string()));
        }
        Ok(self.validators.clone())
    }
}
