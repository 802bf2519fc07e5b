//! Bonded-Validator Cache
//!
//! Session-wide reference data for staking units.
//!
//! ```text
//! Unloaded ──load()──► Loading ──ok──► Loaded
//!     ▲                   │
//!     └──────── error ────┘
//! ```
//!
//! Loads are coalesced: only the caller that moves the cache out of
//! `Unloaded` talks to the loader.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{ChainInfo, Validator};
use tracing::{debug, info, warn};

use crate::ports::outbound::ValidatorSetLoader;

/// Observable cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Nothing loaded, no load running.
    Unloaded,
    /// A load is in flight.
    Loading,
    /// Validators available.
    Loaded,
}

#[derive(Debug)]
enum CacheState {
    Unloaded,
    Loading,
    Loaded(Arc<Vec<Validator>>),
}

/// Loads the bonded-validator set at most once per session.
pub struct ValidatorSetCache {
    chain: ChainInfo,
    loader: Arc<dyn ValidatorSetLoader>,
    state: RwLock<CacheState>,
}

impl ValidatorSetCache {
    /// Empty cache for `chain`.
    pub fn new(chain: ChainInfo, loader: Arc<dyn ValidatorSetLoader>) -> Self {
        Self {
            chain,
            loader,
            state: RwLock::new(CacheState::Unloaded),
        }
    }

    /// Current state.
    pub fn status(&self) -> CacheStatus {
        match *self.state.read() {
            CacheState::Unloaded => CacheStatus::Unloaded,
            CacheState::Loading => CacheStatus::Loading,
            CacheState::Loaded(_) => CacheStatus::Loaded,
        }
    }

    /// Loaded validators; empty while unloaded or loading.
    pub fn snapshot(&self) -> Arc<Vec<Validator>> {
        match &*self.state.read() {
            CacheState::Loaded(validators) => Arc::clone(validators),
            _ => Arc::new(Vec::new()),
        }
    }

    fn begin_load(&self) -> bool {
        let mut state = self.state.write();
        match *state {
            CacheState::Unloaded => {
                *state = CacheState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Load unless loaded or already loading. A failed load returns the cache
    /// to `Unloaded` so a later request can retry.
    pub async fn load(&self) {
        if !self.begin_load() {
            debug!(chain_id = %self.chain.chain_id, "Validator load coalesced");
            return;
        }

        match self.loader.load_validators(&self.chain).await {
            Ok(validators) => {
                info!(chain_id = %self.chain.chain_id, count = validators.len(), "Validator set cached");
                *self.state.write() = CacheState::Loaded(Arc::new(validators));
            }
            Err(e) => {
                warn!(chain_id = %self.chain.chain_id, error = %e, "Validator load failed");
                *self.state.write() = CacheState::Unloaded;
            }
        }
    }

    /// Fire-and-forget load on the current runtime. Never blocks.
    pub fn trigger(self: &Arc<Self>) {
        if self.status() != CacheStatus::Unloaded {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let cache = Arc::clone(self);
                handle.spawn(async move { cache.load().await });
            }
            Err(_) => warn!("No async runtime; validator set not loaded"),
        }
    }
}
