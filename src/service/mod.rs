//! Service layer: the event listener core and the action submitter.
//!
//! [`EventListener`] reconciles confirmed on-chain events into storage;
//! [`ActionSubmitter`] fires recording transactions. The two paths are
//! deliberately decoupled: submission never waits for the event, and the
//! event is the sole source of truth for persisted records.

pub mod listener;
pub mod submitter;

pub use listener::{ACTION_EVENT_NAME, EventListener, ListenerStatus};
pub use submitter::ActionSubmitter;
