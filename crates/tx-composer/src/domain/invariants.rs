//! # Assembly Invariants
//!
//! Checks the assembler runs, in order, before a draft exists.
//!
//! | Invariant | Rule |
//! |-----------|------|
//! | Account | sender has an account number |
//! | Non-empty | at least one slot |
//! | All-valid | valid messages == slots |
//! | Gas | positive integer ≤ `MAX_SAFE_GAS` |

use shared_types::AccountInfo;

use super::errors::BuildError;
use crate::algorithms::amount::DisplayAmount;

/// Largest integer exactly representable as an IEEE-754 double.
pub const MAX_SAFE_GAS: u64 = 9_007_199_254_740_991;

/// Sender must have an on-chain account number.
pub fn invariant_account_number(account: &AccountInfo) -> Result<u64, BuildError> {
    account.account_number.ok_or(BuildError::MissingAccountNumber)
}

/// At least one slot must be registered.
pub fn invariant_non_empty(total: usize) -> Result<(), BuildError> {
    if total == 0 {
        return Err(BuildError::NoMessages);
    }
    Ok(())
}

/// Every slot must contribute a valid message.
pub fn invariant_all_valid(valid: usize, total: usize) -> Result<(), BuildError> {
    if valid != total {
        return Err(BuildError::InvalidMessages {
            invalid: total - valid,
            total,
        });
    }
    Ok(())
}

/// Parse the gas limit input as a positive safe integer.
///
/// A zero fractional part is accepted (`"200000.0"`).
pub fn invariant_gas_limit(input: &str) -> Result<u64, BuildError> {
    let invalid = |reason: &str| BuildError::InvalidGasLimit(format!("{reason}: {:?}", input));

    let amount: DisplayAmount = input.parse().map_err(|_| invalid("not a number"))?;
    if amount.is_negative() {
        return Err(invalid("must not be negative"));
    }
    if !amount.is_integer() {
        return Err(invalid("must be an integer"));
    }
    if amount.is_zero() {
        return Err(invalid("must be greater than 0"));
    }

    amount
        .as_integer()
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v <= MAX_SAFE_GAS)
        .ok_or_else(|| invalid("exceeds the maximum safe integer"))
}
