//! Request/response shapes for the action endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Action;

/// Body of `POST /actions`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionRequest {
    /// 42-character `0x`-prefixed account address of the submitting user.
    pub user_address: String,
    /// Free-text description of the sustainable action.
    pub description: String,
}

/// Response of `POST /actions`. Carries the pending transaction hash;
/// the action row appears in the list endpoints only after the contract
/// confirms the transaction.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionResponse {
    /// Human-readable outcome message.
    pub message: String,
    /// Hash of the pending transaction.
    pub blockchain_tx_hash: String,
    /// Checksummed address the action was submitted for.
    pub user_address: String,
    /// Description as submitted.
    pub description: String,
}

/// A confirmed action as rendered by the list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    /// Serial identifier assigned by the store.
    pub id: i64,
    /// Checksummed account address.
    pub user_address: String,
    /// Free-text description.
    pub description: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl From<Action> for ActionDto {
    fn from(action: Action) -> Self {
        Self {
            id: action.id,
            user_address: action.user_address,
            description: action.description,
            timestamp: action.timestamp,
        }
    }
}
