//! Domain layer: the action entity, chain event signals, and the
//! failure-sink extension point.

pub mod action;
pub mod chain_event;
pub mod failure_sink;

pub use action::{Action, parse_address};
pub use chain_event::{ChainSignal, RawChainEvent};
pub use failure_sink::{FailureSink, LogFailureSink};
