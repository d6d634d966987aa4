//! Extension point for events the listener had to drop.

use crate::domain::RawChainEvent;
use crate::error::GatewayError;

/// Receives events the listener dropped, whether the payload failed
/// validation or the store refused the write.
///
/// The listener's default policy is drop-and-log: the chain remains the
/// source of truth, and a future reconciliation sweep can replay missed
/// blocks. Deployments that want a dead-letter queue instead plug in
/// their own sink here.
pub trait FailureSink: Send + Sync + std::fmt::Debug {
    /// Called once per dropped event, after the drop has been logged.
    /// `error` carries the reason, [`GatewayError::EventValidation`] or
    /// a persistence variant.
    fn event_dropped(&self, event: &RawChainEvent, error: &GatewayError);
}

/// Default sink: the listener already logged the full event context, so
/// this only emits a debug-level breadcrumb.
#[derive(Debug, Default)]
pub struct LogFailureSink;

impl FailureSink for LogFailureSink {
    fn event_dropped(&self, event: &RawChainEvent, error: &GatewayError) {
        tracing::debug!(user = %event.user, error = %error, "dropped event handed to log-only sink");
    }
}
