//! Shared fixtures for the integration flows.

use std::sync::Arc;
use std::time::Duration;

use shared_types::{AccountInfo, ChainInfo, DenomUnit, RegisteredAsset, Validator};
use tx_composer::{
    AssetCoinConverter, Bech32AddressValidator, ComposerConfig, ComposerPorts, ComposerService,
    InMemoryTxStore, MockConfidentialEndpoint, MockValidatorLoader,
};

/// Sender on the hub.
pub const ALICE: &str = "cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du";
/// Recipient on the hub.
pub const BOB: &str = "cosmos1qgpqyqszqgpqyqszqgpqyqszqgpqyqszrh8mx2";
/// Another hub account.
pub const CAROL: &str = "cosmos1qvpsxqcrqvpsxqcrqvpsxqcrqvpsxqcrz8x6vt";
/// Hub validator operator.
pub const VALOPER_A: &str = "cosmosvaloper1qszqgpqyqszqgpqyqszqgpqyqszqgpqy8r428y";
/// Second hub validator operator.
pub const VALOPER_B: &str = "cosmosvaloper1q5zs2pg9q5zs2pg9q5zs2pg9q5zs2pg9xn5td9";
/// Receiver on a counterparty chain.
pub const OSMO_ADDR: &str = "osmo1qcrqvpsxqcrqvpsxqcrqvpsxqcrqvpsx6c4tuj";
/// Sender on the confidential chain.
pub const SCRT_SENDER: &str = "secret1qurswpc8qurswpc8qurswpc8qurswpc83knnaa";
/// Contract on the confidential chain.
pub const SCRT_CONTRACT: &str = "secret1pqyqszqgpqyqszqgpqyqszqgpqyqszqg7wp8ey";
/// Code hash registered for `SCRT_CONTRACT`.
pub const SCRT_CODE_HASH: &str = "af74387e276be8874f07bec3a87023ee49b0e7ebe08178c49d0a49c3c98ed60e";
/// Secret half of the mock chain encryption key.
pub const CHAIN_SECRET: [u8; 32] = [0x42; 32];

/// ATOM with a micro base unit.
pub fn atom() -> RegisteredAsset {
    RegisteredAsset {
        symbol: "ATOM".to_string(),
        base: "uatom".to_string(),
        display: "atom".to_string(),
        denom_units: vec![
            DenomUnit {
                denom: "uatom".to_string(),
                exponent: 0,
                aliases: vec!["microatom".to_string()],
            },
            DenomUnit {
                denom: "atom".to_string(),
                exponent: 6,
                aliases: vec![],
            },
        ],
    }
}

/// Plain chain.
pub fn hub() -> ChainInfo {
    ChainInfo {
        chain_id: "cosmoshub-4".to_string(),
        address_prefix: "cosmos".to_string(),
        denom: "uatom".to_string(),
        gas_price: "0.025uatom".to_string(),
        assets: vec![atom()],
        lcd_endpoint: "https://lcd.cosmos.example".to_string(),
        confidential_encryption: false,
    }
}

/// Chain requiring client-side encryption of contract bodies.
pub fn confidential_chain() -> ChainInfo {
    ChainInfo {
        chain_id: "secret-4".to_string(),
        address_prefix: "secret".to_string(),
        denom: "uscrt".to_string(),
        gas_price: "0.1uscrt".to_string(),
        assets: vec![],
        lcd_endpoint: "https://lcd.secret.example".to_string(),
        confidential_encryption: true,
    }
}

/// Existing account for `address`.
pub fn account(address: &str) -> AccountInfo {
    AccountInfo {
        address: address.to_string(),
        account_number: Some(12),
        sequence: 5,
    }
}

/// Two bonded hub validators.
pub fn validators() -> Vec<Validator> {
    vec![
        Validator {
            operator_address: VALOPER_A.to_string(),
            moniker: "alpha".to_string(),
        },
        Validator {
            operator_address: VALOPER_B.to_string(),
            moniker: "beta".to_string(),
        },
    ]
}

/// Endpoint mock serving `SCRT_CONTRACT`.
pub fn endpoint() -> MockConfidentialEndpoint {
    MockConfidentialEndpoint::new(CHAIN_SECRET).with_code_hash(SCRT_CONTRACT, SCRT_CODE_HASH)
}

/// Everything a flow needs to inspect after driving the service.
pub struct Harness {
    /// Service under test.
    pub service: ComposerService,
    /// Store the service submits to.
    pub store: Arc<InMemoryTxStore>,
    /// Confidential endpoint mock.
    pub endpoint: Arc<MockConfidentialEndpoint>,
    /// Validator loader mock.
    pub loader: Arc<MockValidatorLoader>,
}

/// Builder for a `Harness`.
pub struct HarnessBuilder {
    chain: ChainInfo,
    account: AccountInfo,
    endpoint: MockConfidentialEndpoint,
    loader: MockValidatorLoader,
}

impl HarnessBuilder {
    /// Defaults: the given chain and sender, the standard endpoint, an
    /// instant loader with two validators.
    pub fn new(chain: ChainInfo, sender: &str) -> Self {
        Self {
            chain,
            account: account(sender),
            endpoint: endpoint(),
            loader: MockValidatorLoader::new(validators()),
        }
    }

    /// Replace the sender account.
    pub fn account(mut self, account: AccountInfo) -> Self {
        self.account = account;
        self
    }

    /// Replace the endpoint mock.
    pub fn endpoint(mut self, endpoint: MockConfidentialEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Delay every validator load.
    pub fn loader_delay(mut self, delay: Duration) -> Self {
        self.loader = self.loader.with_delay(delay);
        self
    }

    /// Make every validator load fail.
    pub fn loader_failing(mut self) -> Self {
        self.loader = self.loader.failing();
        self
    }

    /// Wire the service.
    pub fn build(self) -> Harness {
        let store = Arc::new(InMemoryTxStore::new());
        let endpoint = Arc::new(self.endpoint);
        let loader = Arc::new(self.loader);
        let ports = ComposerPorts {
            addresses: Arc::new(Bech32AddressValidator),
            coins: Arc::new(AssetCoinConverter),
            endpoint: endpoint.clone(),
            store: store.clone(),
            validator_loader: loader.clone(),
        };
        let service =
            ComposerService::new(ComposerConfig::for_testing(), self.chain, self.account, ports);
        Harness {
            service,
            store,
            endpoint,
            loader,
        }
    }
}

/// Hub harness for `ALICE`.
pub fn hub_harness() -> Harness {
    HarnessBuilder::new(hub(), ALICE).build()
}

/// Confidential-chain harness for `SCRT_SENDER`.
pub fn confidential_harness() -> Harness {
    HarnessBuilder::new(confidential_chain(), SCRT_SENDER).build()
}
