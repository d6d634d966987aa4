//! Generated bindings for the sustainable-actions contract.
//!
//! One event consumed, one method invoked. This gateway is not a general
//! indexer and tracks nothing else.
#![allow(missing_docs, clippy::pedantic)]

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract SustainableActions {
        event ActionRecorded(address indexed user, string description, uint256 timestamp);

        function recordAction(address user, string description) external;
    }
}
