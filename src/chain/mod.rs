//! Chain boundary: contract bindings and the provider-backed client.

pub mod bindings;
pub mod client;

pub use client::{ActionChain, AlloyActionChain};
