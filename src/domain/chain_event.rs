//! Signals delivered from the chain subscription to the event listener.
//!
//! The subscription layer pushes [`ChainSignal`] values onto a bounded
//! `tokio::mpsc` channel; a single consumer task inside the listener pulls
//! and processes them sequentially. The bounded capacity is the service's
//! backpressure point: when the consumer falls behind, the chain-side
//! forwarding task awaits on `send` and stops draining the log stream.

use alloy::primitives::{Address, B256, U256};

/// A contract confirmation event as delivered by the subscription, before
/// validation and normalization. Consumed and discarded once it has been
/// persisted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChainEvent {
    /// Account that recorded the action.
    pub user: Address,
    /// Action description, verbatim from the event.
    pub description: String,
    /// Chain-native timestamp; validated and narrowed by the listener.
    pub timestamp: U256,
    /// Hash of the transaction that emitted the event. Pending logs may
    /// arrive without one; a missing hash never blocks persistence.
    pub transaction_hash: Option<B256>,
}

/// One item on the subscription channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSignal {
    /// A confirmed `ActionRecorded` event.
    Action(RawChainEvent),
    /// Transport-level failure. The listener marks itself inactive and
    /// waits for an explicit restart; it does not resubscribe on its own.
    ConnectionError(String),
    /// The provider is now talking to a different network. Logged for
    /// observability only.
    NetworkChanged {
        /// Chain id seen on the previous subscription.
        old: u64,
        /// Chain id seen now.
        new: u64,
    },
}
