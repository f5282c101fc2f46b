//! Client module: the network, its nodes, and request execution.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Client`] — Long-lived handle shared by every request
//! - [`ClientBuilder`] — Fluent builder for configuring the client
//! - [`Network`] / [`Node`] — Consensus nodes and their health
//! - [`MirrorNetwork`] — Mirror nodes, used to bootstrap the address book
//!
//! # Creating a client
//!
//! | Constructor | Use Case |
//! |-------------|----------|
//! | [`Client::for_testnet`] and friends | Well-known networks |
//! | [`Client::for_network`] | Explicit `host:port` → node account map |
//! | [`Client::for_mirror_network`] | Address book read from a mirror node |
//! | [`Client::from_config_file`] | JSON configuration document |
//! | [`Client::from_env`] | CI/CD via `OPERATOR_ID` / `OPERATOR_KEY` env vars |
//!
//! # Signers
//!
//! Anything implementing [`Signer`] can sign: a [`PrivateKey`](crate::PrivateKey),
//! an [`FnSigner`] wrapping a closure, or an external key store.

mod config;
pub(crate) mod execute;
mod hiero;
mod mirror;
mod network;
mod node;
mod signer;

pub use config::{ClientConfig, MirrorNetworkConfig, NetworkConfig, NetworkName, OperatorConfig};
pub use hiero::{
    Client, ClientBuilder, DEFAULT_GRPC_DEADLINE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_QUERY_PAYMENT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use mirror::MirrorNetwork;
pub use network::{DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF, Network};
pub use node::{Node, NodeHealth};
pub use signer::{FnSigner, Operator, Signer};
