//! Integration tests for hiero-sdk.
//!
//! Every test drives a real [`hiero_sdk::Client`] against the in-process
//! mock transport, so no network is needed.
//!
//! Run with: `cargo test --test hiero`

mod common;
mod config_integration;
mod execution_integration;
mod flow_integration;
mod query_integration;
mod transaction_integration;
