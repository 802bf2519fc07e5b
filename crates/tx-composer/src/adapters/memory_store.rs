//! In-Memory Transaction Store Adapter
//!
//! Implements `TxStore` with a map of UUID v4 ids to canonical JSON drafts.
//! Used by tests and the CLI.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{CollaboratorError, TransactionDraft};
use crate::ports::outbound::TxStore;

/// A persisted draft.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    /// Sender address.
    pub sender_address: String,
    /// Chain id.
    pub chain_id: String,
    /// The draft as stored.
    pub draft: TransactionDraft,
    /// Canonical JSON of the draft.
    pub canonical_json: String,
}

/// In-memory `TxStore`.
#[derive(Debug, Default)]
pub struct InMemoryTxStore {
    transactions: RwLock<HashMap<String, StoredTransaction>>,
    should_fail: AtomicBool,
}

impl InMemoryTxStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Stored draft by id.
    pub fn get(&self, id: &str) -> Option<StoredTransaction> {
        self.transactions.read().get(id).cloned()
    }

    /// Number of stored drafts.
    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    /// No drafts stored.
    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

#[async_trait]
impl TxStore for InMemoryTxStore {
    async fn create_transaction(
        &self,
        sender_address: &str,
        chain_id: &str,
        draft: &TransactionDraft,
        canonical_json: &str,
    ) -> Result<String, CollaboratorError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Storage("store unavailable".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        self.transactions.write().insert(
            id.clone(),
            StoredTransaction {
                sender_address: sender_address.to_string(),
                chain_id: chain_id.to_string(),
                draft: draft.clone(),
                canonical_json: canonical_json.to_string(),
            },
        );
        debug!(id = %id, chain_id, msgs = draft.msgs.len(), "Stored transaction draft");
        Ok(id)
    }
}
