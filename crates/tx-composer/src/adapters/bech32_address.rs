//! Bech32 Address Validator Adapter
//!
//! Implements `AddressValidator`: the address must decode as bech32, its
//! human-readable part must start with the expected prefix and its data must
//! be 20 or 32 bytes long.

use crate::ports::outbound::AddressValidator;

/// Byte lengths of account and contract addresses.
const VALID_DATA_LENGTHS: [usize; 2] = [20, 32];

/// Stateless bech32 validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bech32AddressValidator;

impl AddressValidator for Bech32AddressValidator {
    fn check(&self, address: &str, prefix: &str) -> Option<String> {
        if address.is_empty() {
            return Some("Empty".to_string());
        }

        let (hrp, data) = match bech32::decode(address) {
            Ok(decoded) => decoded,
            Err(e) => return Some(format!("Not a valid bech32 address: {e}")),
        };

        let hrp = hrp.to_lowercase();
        if !hrp.starts_with(&prefix.to_lowercase()) {
            return Some(format!("Expected prefix {prefix}, got {hrp}"));
        }
        if !VALID_DATA_LENGTHS.contains(&data.len()) {
            return Some(format!(
                "Invalid data length: expected 20 or 32 bytes, got {}",
                data.len()
            ));
        }
        None
    }
}
