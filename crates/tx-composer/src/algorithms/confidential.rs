//! # Confidential Payload Transform
//!
//! Client-side encryption of contract-execution bodies for chains that
//! require it.
//!
//! ## Ordering
//!
//! Every change to the plaintext, the endpoint, the code hash or the target
//! contract bumps a per-unit sequence number. A derivation carries the number
//! it was issued with, and its outcome is applied only if that number is
//! still the latest. Completion order never matters.
//!
//! Sequence numbers are local to one state, so tickets also carry the
//! issuing state's id. A unit installed into a slot gets a fresh id, and
//! outcomes issued for the unit it replaced no longer match.
//!
//! ```text
//! edit ─► invalidate (seq=n) ─► take_ticket ─► derive_payload ─► complete(n)
//!                                                                  │
//!                           seq still n? ── yes ─► encrypted body ─┘
//!                                        └─ no ──► discarded
//! ```

use shared_crypto::seal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{CollaboratorError, FieldError, SlotKey};
use crate::ports::ConfidentialEndpoint;

/// Everything a derivation needs, captured at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationTicket {
    /// Slot the unit lives in.
    pub slot: SlotKey,
    /// Id of the issuing state.
    pub issuer: Uuid,
    /// Sequence number at issue time.
    pub seq: u64,
    /// Remote endpoint to fetch the chain key from.
    pub endpoint: String,
    /// Chain id.
    pub chain_id: String,
    /// Code hash of the target contract.
    pub code_hash: String,
    /// Canonical plaintext body.
    pub plaintext: Vec<u8>,
}

/// Result of a derivation, tagged with its ticket's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationOutcome {
    /// Slot the ticket was issued for.
    pub slot: SlotKey,
    /// Id of the issuing state.
    pub issuer: Uuid,
    /// Sequence number of the ticket.
    pub seq: u64,
    /// Encrypted body or the collaborator failure.
    pub result: Result<Vec<u8>, CollaboratorError>,
}

/// Fetch the chain key and seal the ticket's body.
pub async fn derive_payload(
    ticket: DerivationTicket,
    endpoint: &dyn ConfidentialEndpoint,
) -> DerivationOutcome {
    debug!(slot = %ticket.slot, seq = ticket.seq, endpoint = %ticket.endpoint, "Deriving encrypted body");

    let result = match endpoint
        .fetch_encryption_key(&ticket.endpoint, &ticket.chain_id)
        .await
    {
        Ok(key) => seal(&key, &ticket.code_hash, &ticket.plaintext)
            .map(|sealed| sealed.into_bytes())
            .map_err(|e| CollaboratorError::Encryption(e.to_string())),
        Err(e) => Err(e),
    };

    DerivationOutcome {
        slot: ticket.slot,
        issuer: ticket.issuer,
        seq: ticket.seq,
        result,
    }
}

/// Per-unit confidential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidentialPayloadState {
    issuer: Uuid,
    endpoint: String,
    code_hash: String,
    issued: u64,
    applied: Option<u64>,
    encrypted: Option<Vec<u8>>,
    derive_error: Option<FieldError>,
    lookup_error: Option<FieldError>,
    pending: bool,
}

impl ConfidentialPayloadState {
    /// Fresh state with a default endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            issuer: Uuid::new_v4(),
            endpoint: endpoint.into(),
            code_hash: String::new(),
            issued: 0,
            applied: None,
            encrypted: None,
            derive_error: None,
            lookup_error: None,
            pending: false,
        }
    }

    /// Remote endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Code hash of the target contract.
    pub fn code_hash(&self) -> &str {
        &self.code_hash
    }

    /// Id stamped on every ticket this state issues.
    pub fn issuer(&self) -> Uuid {
        self.issuer
    }

    /// Take a fresh id. Outcomes of tickets issued under the old one are
    /// discarded from now on.
    pub fn reissue(&mut self) {
        self.issuer = Uuid::new_v4();
    }

    /// Latest issued sequence number.
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Replace the endpoint.
    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = endpoint.trim().to_string();
        self.invalidate();
    }

    /// Replace the code hash. Clears a previous lookup failure.
    pub fn set_code_hash(&mut self, code_hash: &str) {
        self.code_hash = code_hash.trim().to_string();
        self.lookup_error = None;
        self.invalidate();
    }

    /// Inputs changed: anything in flight is now stale.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.pending = true;
        self.derive_error = None;
    }

    /// Issue a ticket for the latest inputs, once per invalidation.
    ///
    /// `None` when nothing changed or a precondition is unmet.
    pub fn take_ticket(
        &mut self,
        slot: SlotKey,
        chain_id: &str,
        plaintext: Option<Vec<u8>>,
    ) -> Option<DerivationTicket> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        if self.endpoint.is_empty() || self.code_hash.is_empty() {
            return None;
        }
        let plaintext = plaintext?;

        Some(DerivationTicket {
            slot,
            issuer: self.issuer,
            seq: self.issued,
            endpoint: self.endpoint.clone(),
            chain_id: chain_id.to_string(),
            code_hash: self.code_hash.clone(),
            plaintext,
        })
    }

    /// Apply an outcome. Returns `false` if it was stale and discarded.
    pub fn complete(
        &mut self,
        issuer: Uuid,
        seq: u64,
        result: Result<Vec<u8>, CollaboratorError>,
    ) -> bool {
        if issuer != self.issuer {
            debug!(seq, %issuer, "Discarding derivation issued by another unit");
            return false;
        }
        if seq != self.issued {
            debug!(seq, latest = self.issued, "Discarding stale derivation");
            return false;
        }

        match result {
            Ok(bytes) if !bytes.is_empty() => {
                self.encrypted = Some(bytes);
                self.applied = Some(seq);
                self.derive_error = None;
            }
            Ok(_) => {
                warn!(seq, "Endpoint produced an empty encrypted body");
                self.encrypted = None;
                self.derive_error = Some(FieldError::EndpointFailure(
                    "empty encrypted body".to_string(),
                ));
            }
            Err(e) => {
                warn!(seq, error = %e, "Derivation failed");
                self.encrypted = None;
                self.derive_error = Some(FieldError::EndpointFailure(e.to_string()));
            }
        }
        true
    }

    /// Encrypted body, only if derived from the latest inputs.
    pub fn encrypted(&self) -> Option<&[u8]> {
        match (self.applied, &self.encrypted) {
            (Some(seq), Some(bytes)) if seq == self.issued => Some(bytes),
            _ => None,
        }
    }

    /// Record or clear a code hash lookup failure.
    pub fn set_lookup_error(&mut self, error: Option<FieldError>) {
        self.lookup_error = error;
    }

    /// Last code hash lookup failure.
    pub fn lookup_error(&self) -> Option<&FieldError> {
        self.lookup_error.as_ref()
    }

    /// Precondition and readiness check.
    pub fn check(&self) -> Result<&[u8], FieldError> {
        if self.endpoint.is_empty() {
            return Err(FieldError::MissingEndpoint);
        }
        if self.code_hash.is_empty() {
            return Err(FieldError::MissingCodeHash);
        }
        if let Some(err) = &self.derive_error {
            return Err(err.clone());
        }
        self.encrypted().ok_or(FieldError::EncryptionPending)
    }
}
