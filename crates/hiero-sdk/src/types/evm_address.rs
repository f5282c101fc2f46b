//! EVM address type.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseIdError;

/// A 20-byte EVM address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvmAddress([u8; 20]);

impl EvmAddress {
    /// Length in bytes.
    pub const LEN: usize = 20;

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, failing unless it is exactly 20 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(bytes).ok().map(Self)
    }

    /// Raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the long-zero address of a `shard.realm.num` entity.
    pub fn from_entity(shard: u64, realm: u64, num: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&(shard as u32).to_be_bytes());
        bytes[4..12].copy_from_slice(&realm.to_be_bytes());
        bytes[12..].copy_from_slice(&num.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for EvmAddress {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        if hex_part.len() != 40 {
            return Err(ParseIdError::MalformedEvmAddress(s.to_string()));
        }
        let bytes =
            hex::decode(hex_part).map_err(|_| ParseIdError::MalformedEvmAddress(s.to_string()))?;
        Self::try_from_slice(&bytes).ok_or_else(|| ParseIdError::MalformedEvmAddress(s.to_string()))
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress(0x{})", self)
    }
}
