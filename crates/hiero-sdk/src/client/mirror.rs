//! Mirror network and address-book bootstrap.
//!
//! Mirror nodes serve a REST API next to the consensus network. The client
//! uses it for one thing: reading the current address book so a consensus
//! network can be built from nothing but a mirror address.

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::{Error, TransportError};
use crate::types::{AccountId, Endpoint, EndpointAddress, PORT_HTTPS, PORT_NODE_PLAIN};

const ADDRESS_BOOK_PATH: &str = "/api/v1/network/nodes";

/// Upper bound on address-book pages followed.
const MAX_PAGES: usize = 64;

/// The mirror nodes a client knows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MirrorNetwork {
    nodes: Vec<Endpoint>,
}

impl MirrorNetwork {
    pub fn new(nodes: Vec<Endpoint>) -> Self {
        Self { nodes }
    }

    /// Parse `host:port` addresses.
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = addresses
            .into_iter()
            .map(|a| a.as_ref().parse::<Endpoint>())
            .collect::<Result<_, _>>()?;
        Ok(Self { nodes })
    }

    fn domain(host: &str, port: u16) -> Self {
        Self::new(vec![Endpoint::new(
            EndpointAddress::Domain(host.to_string()),
            port,
        )])
    }

    pub fn mainnet() -> Self {
        Self::domain("mainnet-public.mirrornode.hedera.com", PORT_HTTPS)
    }

    pub fn testnet() -> Self {
        Self::domain("testnet.mirrornode.hedera.com", PORT_HTTPS)
    }

    pub fn previewnet() -> Self {
        Self::domain("previewnet.mirrornode.hedera.com", PORT_HTTPS)
    }

    /// Mirror REST API of a local development network.
    pub fn local_node() -> Self {
        Self::new(vec![Endpoint::ipv4([127, 0, 0, 1], 5551)])
    }

    pub fn nodes(&self) -> &[Endpoint] {
        &self.nodes
    }

    pub fn addresses(&self) -> Vec<String> {
        self.nodes.iter().map(Endpoint::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A mirror node chosen at random.
    pub fn next(&self) -> Option<&Endpoint> {
        self.nodes.choose(&mut rand::thread_rng())
    }
}

// ============================================================================
// Address book
// ============================================================================

#[derive(Debug, Deserialize)]
struct NodesPage {
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    node_account_id: AccountId,
    #[serde(default)]
    service_endpoints: Vec<ServiceEndpoint>,
}

#[derive(Debug, Deserialize)]
struct ServiceEndpoint {
    #[serde(default)]
    ip_address_v4: String,
    #[serde(default)]
    domain_name: String,
    port: u16,
}

impl ServiceEndpoint {
    fn to_endpoint(&self) -> Result<Endpoint, Error> {
        if !self.ip_address_v4.is_empty() {
            let ip: std::net::Ipv4Addr = self.ip_address_v4.parse().map_err(|_| {
                Error::codec(format!("address book IPv4 '{}'", self.ip_address_v4))
            })?;
            return Ok(Endpoint::ipv4(ip.octets(), self.port));
        }
        Ok(Endpoint::domain(self.domain_name.clone(), self.port)?)
    }
}

/// Consensus endpoints of one address-book page, plus the next page's path.
///
/// Only plaintext node endpoints are kept.
fn parse_page(body: &str) -> Result<(Vec<(Endpoint, AccountId)>, Option<String>), Error> {
    let page: NodesPage = serde_json::from_str(body)?;
    let mut entries = Vec::new();
    for node in &page.nodes {
        for service_endpoint in &node.service_endpoints {
            if service_endpoint.port != PORT_NODE_PLAIN {
                continue;
            }
            entries.push((service_endpoint.to_endpoint()?, node.node_account_id));
        }
    }
    Ok((entries, page.links.next))
}

/// Read the full address book from `mirror`, following pagination.
pub(crate) async fn fetch_address_book(
    http: &reqwest::Client,
    mirror: &Endpoint,
) -> Result<Vec<(Endpoint, AccountId)>, Error> {
    let base = mirror.base_url();
    let request_error = |message: String| TransportError::Request {
        address: mirror.to_string(),
        message,
    };

    let mut entries = Vec::new();
    let mut path = Some(ADDRESS_BOOK_PATH.to_string());
    let mut pages = 0;

    while let Some(next) = path.take() {
        pages += 1;
        if pages > MAX_PAGES {
            return Err(Error::codec("address book pagination does not end"));
        }

        let url = format!("{}{}", base, next);
        tracing::debug!(url = %url, "Fetching address book page");
        let response = http
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(request_error(format!("HTTP {}", status)).into());
        }
        let body = response
            .text()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        let (page, next) = parse_page(&body)?;
        entries.extend(page);
        path = next;
    }

    tracing::info!(mirror = %mirror, nodes = entries.len(), "Loaded address book");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "nodes": [
            {
                "node_id": 0,
                "node_account_id": "0.0.3",
                "service_endpoints": [
                    {"domain_name": "", "ip_address_v4": "34.94.106.61", "port": 50211},
                    {"domain_name": "", "ip_address_v4": "34.94.106.61", "port": 50212}
                ]
            },
            {
                "node_id": 1,
                "node_account_id": "0.0.4",
                "service_endpoints": [
                    {"domain_name": "node1.example.com", "ip_address_v4": "", "port": 50211}
                ]
            }
        ],
        "links": {"next": "/api/v1/network/nodes?limit=25&node.id=gt:1"}
    }"#;

    #[test]
    fn test_parse_page() {
        let (entries, next) = parse_page(PAGE).unwrap();
        assert_eq!(
            entries,
            vec![
                (
                    Endpoint::ipv4([34, 94, 106, 61], 50211),
                    AccountId::from_num(3)
                ),
                (
                    Endpoint::domain("node1.example.com", 50211).unwrap(),
                    AccountId::from_num(4)
                ),
            ]
        );
        assert_eq!(
            next.as_deref(),
            Some("/api/v1/network/nodes?limit=25&node.id=gt:1")
        );
    }

    #[test]
    fn test_parse_last_page() {
        let (entries, next) = parse_page(r#"{"nodes": [], "links": {"next": null}}"#).unwrap();
        assert!(entries.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_account() {
        let body = r#"{"nodes": [{"node_account_id": "zero", "service_endpoints": []}]}"#;
        assert!(matches!(parse_page(body), Err(Error::Json(_))));
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            MirrorNetwork::testnet().addresses(),
            vec!["testnet.mirrornode.hedera.com:443"]
        );
        assert_eq!(
            MirrorNetwork::mainnet().nodes()[0].base_url(),
            "https://mainnet-public.mirrornode.hedera.com:443"
        );
        assert_eq!(
            MirrorNetwork::local_node().nodes()[0].base_url(),
            "http://127.0.0.1:5551"
        );
    }

    #[test]
    fn test_from_addresses() {
        let mirror = MirrorNetwork::from_addresses(["a.example.com:443", "10.0.0.1:5551"]).unwrap();
        assert_eq!(mirror.nodes().len(), 2);
        assert!(mirror.next().is_some());
        assert!(MirrorNetwork::from_addresses(["nope"]).is_err());
        assert!(MirrorNetwork::default().next().is_none());
    }
}
