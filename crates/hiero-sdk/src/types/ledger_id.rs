//! Ledger identification.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseIdError;

/// The ledger a client is bound to.
///
/// Ledger ids feed the entity-id checksum algorithm, so an id with checksum
/// `-vfmkw` is only valid on the ledger that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LedgerId {
    /// Production ledger (`0x00`).
    Mainnet,
    /// Public test ledger (`0x01`).
    Testnet,
    /// Preview ledger (`0x02`).
    Previewnet,
    /// Any other ledger, identified by raw bytes.
    Other(Vec<u8>),
}

impl LedgerId {
    /// Create a ledger id from raw bytes, mapping the well-known values.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            [0x00] => Self::Mainnet,
            [0x01] => Self::Testnet,
            [0x02] => Self::Previewnet,
            other => Self::Other(other.to_vec()),
        }
    }

    /// Raw ledger id bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Mainnet => vec![0x00],
            Self::Testnet => vec![0x01],
            Self::Previewnet => vec![0x02],
            Self::Other(bytes) => bytes.clone(),
        }
    }

    /// Returns true if this is mainnet.
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }

    /// Returns true if this is testnet.
    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }

    /// Returns true if this is previewnet.
    pub fn is_previewnet(&self) -> bool {
        matches!(self, Self::Previewnet)
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
            Self::Previewnet => f.write_str("previewnet"),
            Self::Other(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

impl FromStr for LedgerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            other => hex::decode(other)
                .ok()
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| Self::from_bytes(&bytes))
                .ok_or_else(|| ParseIdError::UnknownLedger(other.to_string())),
        }
    }
}
