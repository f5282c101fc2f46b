//! Network endpoints.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ParseIdError;

/// Host part of an [`Endpoint`]: an IPv4 address or a domain name, never both.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndpointAddress {
    Ipv4([u8; 4]),
    Domain(String),
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(octets) => write!(f, "{}", Ipv4Addr::from(*octets)),
            Self::Domain(name) => f.write_str(name),
        }
    }
}

/// A node address: host plus port.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Endpoint {
    address: EndpointAddress,
    port: u16,
}

/// Plaintext port of a consensus node.
pub const PORT_NODE_PLAIN: u16 = 50211;
/// TLS port of a consensus node.
pub const PORT_NODE_TLS: u16 = 50212;
/// HTTPS port, used by mirror nodes.
pub const PORT_HTTPS: u16 = 443;

impl Endpoint {
    pub fn new(address: EndpointAddress, port: u16) -> Self {
        Self { address, port }
    }

    pub fn ipv4(octets: [u8; 4], port: u16) -> Self {
        Self::new(EndpointAddress::Ipv4(octets), port)
    }

    /// Create an endpoint from a domain name.
    pub fn domain(name: impl Into<String>, port: u16) -> Result<Self, ParseIdError> {
        let name = name.into();
        if !is_valid_domain(&name) {
            return Err(ParseIdError::MalformedEndpoint(name));
        }
        Ok(Self::new(EndpointAddress::Domain(name), port))
    }

    pub fn address(&self) -> &EndpointAddress {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A copy of this endpoint on another port.
    pub fn with_port(&self, port: u16) -> Self {
        Self::new(self.address.clone(), port)
    }

    /// Whether traffic to this endpoint should use TLS.
    pub fn is_tls(&self) -> bool {
        matches!(self.port, PORT_NODE_TLS | PORT_HTTPS)
    }

    /// Base URL for HTTP traffic to this endpoint.
    pub fn base_url(&self) -> String {
        let scheme = if self.is_tls() { "https" } else { "http" };
        format!("{}://{}", scheme, self)
    }
}

fn is_valid_domain(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}

impl FromStr for Endpoint {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseIdError::MalformedEndpoint(s.to_string());
        let (host, port) = s.rsplit_once(':').ok_or_else(malformed)?;
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let port: u16 = port.parse().map_err(|_| malformed())?;

        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(Self::ipv4(ip.octets(), port));
        }
        // dotted-quad lookalikes such as 300.1.2.3 are not domains either
        if host.split('.').all(|label| label.bytes().all(|b| b.is_ascii_digit())) {
            return Err(malformed());
        }
        Self::domain(host, port).map_err(|_| malformed())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}
