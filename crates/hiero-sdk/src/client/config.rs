//! JSON client configuration.
//!
//! ```json
//! {
//!   "network": { "127.0.0.1:50211": "0.0.3" },
//!   "mirrorNetwork": ["127.0.0.1:5551"],
//!   "operator": { "accountId": "0.0.2", "privateKey": "302e0201..." },
//!   "ledgerId": "testnet",
//!   "requestTimeout": 120000,
//!   "grpcDeadline": 10000
//! }
//! ```
//!
//! `network` and `mirrorNetwork` also accept a preset name (`"testnet"`).
//! Durations are in milliseconds. Unknown keys are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;
use crate::types::AccountId;

/// A well-known network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkName {
    Mainnet,
    Testnet,
    Previewnet,
    /// A development network on this machine.
    LocalNode,
}

impl NetworkName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Previewnet => "previewnet",
            Self::LocalNode => "local-node",
        }
    }
}

impl FromStr for NetworkName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            "local-node" | "localhost" => Ok(Self::LocalNode),
            other => Err(Error::config(format!("unknown network name '{}'", other))),
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `network` entry: a preset name or an address → node account map.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NetworkConfig {
    Name(String),
    Nodes(BTreeMap<String, AccountId>),
}

/// `mirrorNetwork` entry: a preset name or a list of addresses.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MirrorNetworkConfig {
    Name(String),
    Addresses(Vec<String>),
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConfig {
    pub account_id: AccountId,
    pub private_key: String,
}

impl fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .field("private_key", &"***")
            .finish()
    }
}

/// Parsed configuration document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub network: Option<NetworkConfig>,
    pub mirror_network: Option<MirrorNetworkConfig>,
    pub operator: Option<OperatorConfig>,
    pub ledger_id: Option<String>,
    /// Milliseconds.
    pub request_timeout: Option<u64>,
    /// Milliseconds.
    pub grpc_deadline: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_nodes_per_request: Option<usize>,
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}
