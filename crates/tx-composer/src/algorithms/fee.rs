//! # Fee Calculation
//!
//! Fee = `ceil(gas_price × gas_limit)` in the gas price denom.

use shared_types::{Coin, GasPrice, StdFee};

use crate::domain::BuildError;

/// Fee for `gas_limit` at `gas_price`.
pub fn calculate_fee(gas_limit: u64, gas_price: &GasPrice) -> Result<StdFee, BuildError> {
    let amount = gas_price
        .fee_amount(gas_limit)
        .ok_or(BuildError::FeeOverflow(gas_limit))?;

    Ok(StdFee {
        amount: vec![Coin::new(amount.to_string(), gas_price.denom())],
        gas: gas_limit.to_string(),
    })
}
