//! LCD Client Adapter
//!
//! Implements `ConfidentialEndpoint` and `ValidatorSetLoader` over a chain's
//! LCD (REST) endpoint.
//!
//! | Query | Path |
//! |-------|------|
//! | encryption key | `/registration/v1beta1/tx-key` |
//! | code hash | `/compute/v1beta1/code_hash/by_contract_address/{address}` |
//! | validators | `/cosmos/staking/v1beta1/validators?status=BOND_STATUS_BONDED` |

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared_crypto::ChainEncryptionKey;
use shared_types::{ChainInfo, Validator};
use tracing::{debug, info};

use crate::domain::CollaboratorError;
use crate::ports::outbound::{ConfidentialEndpoint, ValidatorSetLoader};

const VALIDATOR_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
struct TxKeyResponse {
    key: String,
}

#[derive(Debug, Deserialize)]
struct CodeHashResponse {
    code_hash: String,
}

#[derive(Debug, Deserialize)]
struct ValidatorsResponse {
    validators: Vec<ValidatorEntry>,
}

#[derive(Debug, Deserialize)]
struct ValidatorEntry {
    operator_address: String,
    #[serde(default)]
    description: ValidatorDescription,
}

#[derive(Debug, Default, Deserialize)]
struct ValidatorDescription {
    #[serde(default)]
    moniker: String,
}

/// HTTP client for LCD endpoints.
pub struct LcdClient {
    client: Client,
}

impl LcdClient {
    /// Client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| CollaboratorError::Unreachable(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, CollaboratorError> {
        debug!(url, "LCD request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CollaboratorError::Unreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::LookupFailed(format!("{url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse(format!("{url}: {e}")))
    }
}

fn join(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

#[async_trait]
impl ConfidentialEndpoint for LcdClient {
    async fn query_code_hash(
        &self,
        endpoint: &str,
        chain_id: &str,
        contract_address: &str,
    ) -> Result<String, CollaboratorError> {
        if endpoint.is_empty() {
            return Err(CollaboratorError::Unreachable("no endpoint".to_string()));
        }
        let url = join(
            endpoint,
            &format!("/compute/v1beta1/code_hash/by_contract_address/{contract_address}"),
        );
        let body: CodeHashResponse = self.get_json(&url).await?;
        if body.code_hash.is_empty() {
            return Err(CollaboratorError::LookupFailed(format!(
                "no code hash for {contract_address} on {chain_id}"
            )));
        }
        Ok(body.code_hash)
    }

    async fn fetch_encryption_key(
        &self,
        endpoint: &str,
        chain_id: &str,
    ) -> Result<ChainEncryptionKey, CollaboratorError> {
        if endpoint.is_empty() {
            return Err(CollaboratorError::Unreachable("no endpoint".to_string()));
        }
        let body: TxKeyResponse = self
            .get_json(&join(endpoint, "/registration/v1beta1/tx-key"))
            .await?;
        let bytes = STANDARD
            .decode(body.key.trim())
            .map_err(|e| CollaboratorError::InvalidResponse(format!("tx key: {e}")))?;
        let key = ChainEncryptionKey::from_slice(&bytes)
            .map_err(|e| CollaboratorError::InvalidResponse(format!("tx key: {e}")))?;
        debug!(chain_id, "Fetched chain encryption key");
        Ok(key)
    }
}

#[async_trait]
impl ValidatorSetLoader for LcdClient {
    async fn load_validators(&self, chain: &ChainInfo) -> Result<Vec<Validator>, CollaboratorError> {
        if chain.lcd_endpoint.is_empty() {
            return Err(CollaboratorError::Unreachable("no endpoint".to_string()));
        }
        let url = join(
            &chain.lcd_endpoint,
            &format!(
                "/cosmos/staking/v1beta1/validators?status=BOND_STATUS_BONDED&pagination.limit={VALIDATOR_PAGE_LIMIT}"
            ),
        );
        let body: ValidatorsResponse = self.get_json(&url).await?;
        let validators: Vec<Validator> = body
            .validators
            .into_iter()
            .map(|v| Validator {
                operator_address: v.operator_address,
                moniker: v.description.moniker,
            })
            .collect();
        info!(chain_id = %chain.chain_id, count = validators.len(), "Loaded bonded validators");
        Ok(validators)
    }
}
