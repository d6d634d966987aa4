//! # verdant-gateway
//!
//! REST API gateway and on-chain event listener for a sustainable-actions
//! registry.
//!
//! Clients submit actions over HTTP; the gateway fires a `recordAction`
//! transaction and returns the pending hash immediately. Persistence is
//! driven entirely by the contract's `ActionRecorded` confirmation event:
//! the event listener subscribes over WebSocket, validates each payload,
//! and writes one row per confirmed action. Submission and reconciliation
//! are fully decoupled (dual-write by way of the chain, not alongside it).
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ActionSubmitter (service/) ──► ActionChain (chain/, alloy WS + wallet)
//!     │                                        │ ActionRecorded events
//!     │                                        ▼
//!     ├── EventListener (service/) ◄── bounded ChainSignal channel
//!     │        │
//!     │        ▼
//!     └── ActionStore (persistence/, PostgreSQL)
//! ```

pub mod api;
pub mod app_state;
pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
