//! The persisted action entity and address validation.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A confirmed sustainable action.
///
/// Created exclusively by the event listener when the contract emits its
/// confirmation event; the submission path never writes one. Rows are
/// never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Serial identifier assigned by the store.
    pub id: i64,
    /// Checksummed `0x`-prefixed account address of the submitting user.
    pub user_address: String,
    /// Free-text description of the action.
    pub description: String,
    /// Seconds since the Unix epoch, as reported by the contract event.
    pub timestamp: i64,
}

/// Parses a user-supplied account address.
///
/// Input must be the canonical 42-character `0x`-prefixed hex form;
/// letter case is not significant. Use [`Address::to_checksum`] on the
/// result wherever the address is rendered back out.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] when the string does not match
/// the canonical format.
pub fn parse_address(input: &str) -> Result<Address, GatewayError> {
    if !input.starts_with("0x") || input.len() != 42 {
        return Err(GatewayError::InvalidInput(format!(
            "address must be a 42-character 0x-prefixed hex string, got {input:?}"
        )));
    }
    input
        .parse::<Address>()
        .map_err(|_| GatewayError::InvalidInput(format!("malformed address: {input:?}")))
}
