//! Asset Coin Converter Adapter
//!
//! Implements `CoinConverter` against the chain's registered asset list:
//! the display denom is resolved to an asset and exponent, the display amount
//! is scaled exactly into base units.

use shared_types::{Coin, RegisteredAsset};

use crate::algorithms::DisplayAmount;
use crate::domain::CollaboratorError;
use crate::ports::outbound::CoinConverter;

/// Stateless converter over `RegisteredAsset::exponent_of`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetCoinConverter;

impl CoinConverter for AssetCoinConverter {
    fn to_base_coin(
        &self,
        display_denom: &str,
        display_amount: &str,
        assets: &[RegisteredAsset],
    ) -> Result<Coin, CollaboratorError> {
        let (asset, exponent) = assets
            .iter()
            .find_map(|asset| asset.exponent_of(display_denom).map(|e| (asset, e)))
            .ok_or_else(|| {
                CollaboratorError::Conversion(format!("Unknown denom {display_denom} for this chain"))
            })?;

        let amount = display_amount
            .parse::<DisplayAmount>()
            .map_err(|e| CollaboratorError::Conversion(e.to_string()))?;
        let base = amount
            .to_base_units(exponent)
            .map_err(|e| CollaboratorError::Conversion(e.to_string()))?;

        Ok(Coin::new(base.to_string(), asset.base.clone()))
    }
}
