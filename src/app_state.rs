//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::ActionStore;
use crate::service::{ActionSubmitter, EventListener};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// The [`EventListener`] lives here for the process lifetime — it is a
/// constructed, owned component, not module-global state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Submitter for the fire-and-forget transaction path.
    pub submitter: Arc<ActionSubmitter>,
    /// Store backing the list endpoints.
    pub store: Arc<dyn ActionStore>,
    /// The process-wide event listener instance.
    pub listener: Arc<EventListener>,
}
