//! Event listener: reconciles contract confirmation events into storage.
//!
//! This is the heart of the gateway. A single consumer task pulls
//! [`ChainSignal`]s off the bounded subscription channel in delivery order,
//! validates and normalizes each event, and writes exactly one row per
//! confirmed on-chain action. Lifecycle: `Inactive → Subscribing → Active`,
//! back to `Inactive` on transport failure or explicit stop.
//!
//! Two deliberate policies, both matching the chain-is-source-of-truth
//! stance:
//!
//! - A failed insert is logged, handed to the [`FailureSink`], and dropped.
//!   No retry, no replay. A reconciliation sweep over missed blocks would
//!   live outside this service.
//! - Events redelivered after a reconnect are NOT deduplicated by
//!   transaction hash; they produce duplicate rows. Known limitation:
//!   consumers of the list endpoints may rely on seeing every delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::U256;
use chrono::{Local, TimeZone};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::chain::ActionChain;
use crate::domain::{ChainSignal, FailureSink, RawChainEvent};
use crate::error::GatewayError;
use crate::persistence::ActionStore;

/// Name of the one contract event this gateway tracks.
pub const ACTION_EVENT_NAME: &str = "ActionRecorded";

/// Placeholder logged when an event arrives without a transaction hash.
const TX_HASH_UNAVAILABLE: &str = "unavailable";

/// Point-in-time view of the listener, as reported by the status probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerStatus {
    /// Whether the subscription is currently believed healthy.
    pub is_active: bool,
    /// Number of registered event handlers.
    pub handler_count: usize,
    /// Names of the registered event handlers, in registration order.
    pub handler_names: Vec<String>,
}

/// A named subscription handler and the task consuming it.
#[derive(Debug)]
struct RegisteredHandler {
    name: String,
    task: JoinHandle<()>,
}

/// Owns the subscription lifecycle and the per-event reconciliation policy.
///
/// One instance exists per process, constructed at startup and held in the
/// application state for the process lifetime. All state lives on the
/// instance; there is no module-global listener registry.
#[derive(Debug)]
pub struct EventListener {
    chain: Arc<dyn ActionChain>,
    store: Arc<dyn ActionStore>,
    failure_sink: Arc<dyn FailureSink>,
    channel_capacity: usize,
    is_active: Arc<AtomicBool>,
    handlers: Mutex<Vec<RegisteredHandler>>,
}

impl EventListener {
    /// Creates a listener in the inactive state. Call [`Self::start`] to
    /// subscribe.
    #[must_use]
    pub fn new(
        chain: Arc<dyn ActionChain>,
        store: Arc<dyn ActionStore>,
        failure_sink: Arc<dyn FailureSink>,
        channel_capacity: usize,
    ) -> Self {
        Self {
            chain,
            store,
            failure_sink,
            channel_capacity,
            is_active: Arc::new(AtomicBool::new(false)),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribes to the contract and spawns the consumer task.
    ///
    /// A warning no-op when already active. When the subscription cannot
    /// be established this logs and leaves the listener inactive rather
    /// than failing startup — the condition is recoverable with a later
    /// `start()` call (by an operator or a supervising process).
    pub async fn start(&self) {
        if self.is_active.load(Ordering::SeqCst) {
            tracing::warn!("blockchain listeners already active");
            return;
        }

        // A previous run that ended in a connection failure leaves its
        // registration behind so the status probe can still name it.
        // Clear those before resubscribing or handlers would accumulate.
        {
            let mut handlers = self.handlers.lock().await;
            for stale in handlers.drain(..) {
                stale.task.abort();
            }
        }

        let rx = match self.chain.subscribe(self.channel_capacity).await {
            Ok(rx) => rx,
            Err(e) => {
                tracing::error!(error = %e, "cannot start listener: contract subscription unavailable");
                return;
            }
        };

        let worker = ListenerWorker {
            store: Arc::clone(&self.store),
            failure_sink: Arc::clone(&self.failure_sink),
            is_active: Arc::clone(&self.is_active),
        };
        let task = tokio::spawn(worker.run(rx));

        self.handlers.lock().await.push(RegisteredHandler {
            name: ACTION_EVENT_NAME.to_string(),
            task,
        });
        self.is_active.store(true, Ordering::SeqCst);
        tracing::info!(event = ACTION_EVENT_NAME, "blockchain listener started");
    }

    /// Removes every registered handler and marks the listener inactive.
    ///
    /// A warning no-op when nothing is active.
    pub async fn stop(&self) {
        if !self.is_active.load(Ordering::SeqCst) {
            tracing::warn!("no active listeners to stop");
            return;
        }

        let mut handlers = self.handlers.lock().await;
        for handler in handlers.drain(..) {
            handler.task.abort();
            tracing::info!(handler = %handler.name, "listener handler removed");
        }
        self.is_active.store(false, Ordering::SeqCst);
        tracing::info!("all blockchain listeners stopped");
    }

    /// Reports the current listener state. Pure read, no side effects.
    pub async fn status(&self) -> ListenerStatus {
        let handlers = self.handlers.lock().await;
        ListenerStatus {
            is_active: self.is_active.load(Ordering::SeqCst),
            handler_count: handlers.len(),
            handler_names: handlers.iter().map(|h| h.name.clone()).collect(),
        }
    }
}

/// State shared with the spawned consumer task.
#[derive(Debug)]
struct ListenerWorker {
    store: Arc<dyn ActionStore>,
    failure_sink: Arc<dyn FailureSink>,
    is_active: Arc<AtomicBool>,
}

impl ListenerWorker {
    /// Consumes signals until the channel closes. Handler bodies run
    /// sequentially; two events never interleave their persistence calls.
    async fn run(self, mut rx: mpsc::Receiver<ChainSignal>) {
        while let Some(signal) = rx.recv().await {
            match signal {
                ChainSignal::Action(event) => self.handle_event(event).await,
                ChainSignal::ConnectionError(reason) => {
                    // Mark inactive so the status probe reflects reality,
                    // but do not resubscribe: recovery is an explicit
                    // start() call.
                    let error = GatewayError::ConnectionLost(reason);
                    tracing::warn!(error = %error, "chain connection lost, listener now inactive");
                    self.is_active.store(false, Ordering::SeqCst);
                }
                ChainSignal::NetworkChanged { old, new } => {
                    tracing::info!(old_chain_id = old, new_chain_id = new, "network change detected");
                }
            }
        }
        // Channel closed without an explicit error signal: the chain side
        // dropped its sender. Treat it as a lost connection.
        self.is_active.store(false, Ordering::SeqCst);
    }

    async fn handle_event(&self, event: RawChainEvent) {
        let Some(timestamp) = normalize_timestamp(event.timestamp) else {
            let error = GatewayError::EventValidation(format!(
                "timestamp {} is not a positive number of seconds",
                event.timestamp
            ));
            tracing::error!(
                error = %error,
                user = %event.user,
                "dropping event with invalid timestamp"
            );
            self.failure_sink.event_dropped(&event, &error);
            return;
        };

        // Human-readable rendering for the logs only; never persisted.
        let local_time = Local
            .timestamp_opt(timestamp, 0)
            .single()
            .map_or_else(|| timestamp.to_string(), |dt| dt.to_rfc3339());

        let tx_hash = event.transaction_hash.map_or_else(
            || {
                tracing::warn!(user = %event.user, "event delivered without a transaction hash");
                TX_HASH_UNAVAILABLE.to_string()
            },
            |h| format!("{h:#x}"),
        );

        let user = event.user.to_checksum(None);

        match self
            .store
            .insert(&user, &event.description, timestamp)
            .await
        {
            Ok(action) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    user = %user,
                    description = %event.description,
                    timestamp,
                    local_time = %local_time,
                    db_id = action.id,
                    "confirmed action persisted"
                );
            }
            Err(error) => {
                // Drop-and-log. A persistence failure is not a connection
                // failure: the listener stays active.
                tracing::error!(
                    error = %error,
                    tx_hash = %tx_hash,
                    user = %user,
                    description = %event.description,
                    timestamp,
                    "failed to persist confirmed action, event dropped"
                );
                self.failure_sink.event_dropped(&event, &error);
            }
        }
    }
}

/// Narrows the chain-native timestamp to seconds since epoch. Values that
/// do not fit in `i64` or are not strictly positive are rejected.
fn normalize_timestamp(raw: U256) -> Option<i64> {
    let ts = i64::try_from(raw).ok()?;
    (ts > 0).then_some(ts)
}
