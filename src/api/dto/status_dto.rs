//! Response shape for the listener-status probe.

use serde::Serialize;
use utoipa::ToSchema;

/// Response of `GET /actions/system/status`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatusResponse {
    /// Human-readable status message.
    pub message: String,
    /// Whether the event subscription is currently believed healthy.
    pub is_listening: bool,
    /// Number of registered event handlers.
    pub active_listeners: usize,
    /// Names of the registered event handlers.
    pub listener_names: Vec<String>,
    /// Probe time, RFC 3339.
    pub timestamp: String,
}
