//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Variants that
//! reach the HTTP layer map to a specific status code and a structured JSON
//! error response. `EventValidation` and `ConnectionLost` only ever occur
//! inside the event-handling path, which has no caller to surface them to;
//! they are logged and never converted into a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid input: malformed address",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status               |
/// |-----------|--------------------|---------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request           |
/// | 3000–3999 | Server/Chain/Store | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed (malformed address, missing field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An on-chain event payload failed validation and was dropped.
    #[error("event validation failed: {0}")]
    EventValidation(String),

    /// The RPC endpoint could not be reached.
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    /// The node accepted the connection but rejected the transaction
    /// (insufficient funds, nonce conflict, gas issues).
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// The backing schema rejected the row.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Persistence layer failure (store unreachable or query failed).
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Transport-level subscription drop. The listener goes inactive and
    /// waits for an explicit restart.
    #[error("chain connection lost: {0}")]
    ConnectionLost(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::EventValidation(_) => 1002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::ConstraintViolation(_) => 3002,
            Self::ChainUnavailable(_) => 3003,
            Self::TransactionRejected(_) => 3004,
            Self::ConnectionLost(_) => 3005,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::EventValidation(_) => StatusCode::BAD_REQUEST,
            Self::ChainUnavailable(_)
            | Self::TransactionRejected(_)
            | Self::ConstraintViolation(_)
            | Self::Persistence(_)
            | Self::ConnectionLost(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
