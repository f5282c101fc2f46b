//! Entity identifiers.
//!
//! Every entity on the ledger is addressed as `shard.realm.num`. Text forms
//! may carry a five-letter checksum bound to a ledger (`0.0.123-vfmkw`);
//! the checksum never takes part in equality or hashing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{EvmAddress, LedgerId};
use crate::client::Client;
use crate::error::{Error, ParseIdError};
use crate::schema;

const P3: u64 = 26 * 26 * 26;
const P5: u64 = 26 * 26 * 26 * 26 * 26;
const CHECKSUM_MULTIPLIER: u64 = 1_000_003;

/// A five-letter ledger-bound checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 5]);

impl Checksum {
    fn parse(s: &str) -> Result<Self, ParseIdError> {
        <[u8; 5]>::try_from(s.as_bytes())
            .ok()
            .filter(|bytes| bytes.iter().all(u8::is_ascii_lowercase))
            .map(Self)
            .ok_or_else(|| ParseIdError::MalformedChecksum(s.to_string()))
    }

    /// The checksum letters.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Compute the checksum of an `s.r.n` address on a ledger.
    pub fn compute(ledger: &LedgerId, address: &str) -> Self {
        let digits: Vec<u64> = address
            .bytes()
            .map(|b| if b == b'.' { 10 } else { (b - b'0') as u64 })
            .collect();

        let mut weighted = 0u64;
        let mut even_sum = 0u64;
        let mut odd_sum = 0u64;
        for (i, &d) in digits.iter().enumerate() {
            weighted = (weighted * 31 + d) % P3;
            if i % 2 == 0 {
                even_sum = (even_sum + d) % 11;
            } else {
                odd_sum = (odd_sum + d) % 11;
            }
        }

        let mut ledger_hash = 0u64;
        for b in ledger.to_bytes().into_iter().chain([0u8; 6]) {
            ledger_hash = (ledger_hash * 31 + b as u64) % P5;
        }

        let combined = ((((digits.len() as u64 % 5) * 11 + even_sum) * 11 + odd_sum) * P3
            + weighted
            + ledger_hash)
            % P5;
        let mut value = (combined * CHECKSUM_MULTIPLIER) % P5;

        let mut letters = [0u8; 5];
        for slot in letters.iter_mut().rev() {
            *slot = b'a' + (value % 26) as u8;
            value /= 26;
        }
        Self(letters)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.as_str())
    }
}

fn parse_num(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Split `s.r.last[-checksum]` into its parts.
fn split_id(s: &str) -> Result<(u64, u64, &str, Option<Checksum>), ParseIdError> {
    let malformed = || ParseIdError::Malformed(s.to_string());

    let (body, checksum) = match s.split_once('-') {
        Some((body, checksum)) => (body, Some(Checksum::parse(checksum)?)),
        None => (s, None),
    };

    let mut parts = body.split('.');
    let (Some(shard), Some(realm), Some(last), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let shard = parse_num(shard).ok_or_else(malformed)?;
    let realm = parse_num(realm).ok_or_else(malformed)?;
    Ok((shard, realm, last, checksum))
}

fn check(address: &str, present: Option<Checksum>, ledger: &LedgerId) -> Result<(), ParseIdError> {
    let Some(present) = present else {
        return Ok(());
    };
    let expected = Checksum::compute(ledger, address);
    if expected == present {
        Ok(())
    } else {
        Err(ParseIdError::ChecksumMismatch {
            id: address.to_string(),
            expected: expected.to_string(),
            found: present.to_string(),
        })
    }
}

fn client_ledger(client: &Client) -> Result<LedgerId, Error> {
    client.ledger_id().ok_or_else(|| {
        Error::config("cannot validate an entity ID checksum: client has no ledger ID")
    })
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Default)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
            checksum: Option<Checksum>,
        }

        impl $name {
            /// Create an ID from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num, checksum: None }
            }

            /// Create an ID in shard 0, realm 0.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            /// The checksum parsed from text, if any.
            pub fn checksum(&self) -> Option<Checksum> {
                self.checksum
            }

            /// Validate the parsed checksum (if any) against a ledger.
            pub fn validate_checksum_for_ledger(&self, ledger: &LedgerId) -> Result<(), ParseIdError> {
                check(&self.to_string(), self.checksum, ledger)
            }

            /// Validate the parsed checksum (if any) against the client's ledger.
            pub fn validate_checksum(&self, client: &Client) -> Result<(), Error> {
                Ok(self.validate_checksum_for_ledger(&client_ledger(client)?)?)
            }

            /// Format as `s.r.n-checksum` for the client's ledger.
            pub fn to_string_with_checksum(&self, client: &Client) -> Result<String, Error> {
                let address = self.to_string();
                let checksum = Checksum::compute(&client_ledger(client)?, &address);
                Ok(format!("{}-{}", address, checksum))
            }

            /// The long-zero EVM address of this entity.
            pub fn to_evm_address(&self) -> EvmAddress {
                EvmAddress::from_entity(self.shard, self.realm, self.num)
            }

            pub(crate) fn to_schema(&self) -> schema::EntityId {
                schema::EntityId { shard: self.shard, realm: self.realm, num: self.num }
            }

            pub(crate) fn from_schema(id: &schema::EntityId) -> Self {
                Self::new(id.shard, id.realm, id.num)
            }

            fn key(&self) -> (u64, u64, u64) {
                (self.shard, self.realm, self.num)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.key() == other.key()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.key().cmp(&other.key())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, last, checksum) = split_id(s)?;
                let num = parse_num(last).ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
                Ok(Self { shard, realm, num, checksum })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s: String = Deserialize::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

entity_id! {
    /// Identifies a file.
    FileId
}

entity_id! {
    /// Identifies a token type.
    TokenId
}

entity_id! {
    /// Identifies a scheduled transaction.
    ScheduleId
}

entity_id! {
    /// Identifies a consensus topic.
    TopicId
}

/// An entity id whose last component is either a number or an EVM address.
macro_rules! aliased_entity_id {
    ($(#[$doc:meta])* $name:ident, $schema:ident, $field:ident, $noun:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Default)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            /// Entity number; zero when the entity is referenced by `evm_address`.
            pub num: u64,
            pub evm_address: Option<EvmAddress>,
            checksum: Option<Checksum>,
        }

        impl $name {
            /// Create an ID from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self {
                    shard,
                    realm,
                    num,
                    evm_address: None,
                    checksum: None,
                }
            }

            /// Create an ID in shard 0, realm 0.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            /// Create an ID aliased by an EVM address.
            pub const fn from_evm_address(shard: u64, realm: u64, address: EvmAddress) -> Self {
                Self {
                    shard,
                    realm,
                    num: 0,
                    evm_address: Some(address),
                    checksum: None,
                }
            }

            pub fn checksum(&self) -> Option<Checksum> {
                self.checksum
            }

            /// Validate the parsed checksum (if any) against a ledger.
            ///
            /// EVM-aliased IDs carry no checksum and always validate.
            pub fn validate_checksum_for_ledger(&self, ledger: &LedgerId) -> Result<(), ParseIdError> {
                if self.evm_address.is_some() {
                    return Ok(());
                }
                check(&self.to_string(), self.checksum, ledger)
            }

            /// Validate the parsed checksum (if any) against the client's ledger.
            pub fn validate_checksum(&self, client: &Client) -> Result<(), Error> {
                Ok(self.validate_checksum_for_ledger(&client_ledger(client)?)?)
            }

            /// Format as `s.r.n-checksum` for the client's ledger.
            pub fn to_string_with_checksum(&self, client: &Client) -> Result<String, Error> {
                if self.evm_address.is_some() {
                    return Err(Error::illegal_state(concat!(
                        "an EVM-aliased ",
                        $noun,
                        " ID has no checksum form"
                    )));
                }
                let address = self.to_string();
                let checksum = Checksum::compute(&client_ledger(client)?, &address);
                Ok(format!("{}-{}", address, checksum))
            }

            /// The EVM address of this entity: its alias, or its long-zero address.
            pub fn to_evm_address(&self) -> EvmAddress {
                self.evm_address
                    .unwrap_or_else(|| EvmAddress::from_entity(self.shard, self.realm, self.num))
            }

            pub(crate) fn to_schema(&self) -> schema::$schema {
                let $field = match &self.evm_address {
                    Some(address) => schema::AccountRef::Alias(address.as_bytes().to_vec()),
                    None => schema::AccountRef::Num(self.num),
                };
                schema::$schema {
                    shard: self.shard,
                    realm: self.realm,
                    $field,
                }
            }

            pub(crate) fn from_schema(id: &schema::$schema) -> Result<Self, Error> {
                match &id.$field {
                    schema::AccountRef::Num(num) => Ok(Self::new(id.shard, id.realm, *num)),
                    schema::AccountRef::Alias(bytes) => EvmAddress::try_from_slice(bytes)
                        .map(|address| Self::from_evm_address(id.shard, id.realm, address))
                        .ok_or_else(|| {
                            Error::Codec(format!(concat!($noun, " alias of {} bytes"), bytes.len()))
                        }),
                }
            }

            fn key(&self) -> (u64, u64, u64, Option<EvmAddress>) {
                (self.shard, self.realm, self.num, self.evm_address)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.key() == other.key()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.key().cmp(&other.key())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.evm_address {
                    Some(address) => write!(f, "{}.{}.{}", self.shard, self.realm, address),
                    None => write!(f, "{}.{}.{}", self.shard, self.realm, self.num),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, last, checksum) = split_id(s)?;
                if let Some(num) = parse_num(last) {
                    return Ok(Self {
                        checksum,
                        ..Self::new(shard, realm, num)
                    });
                }
                if checksum.is_none()
                    && last.len() == EvmAddress::LEN * 2
                    && let Ok(address) = last.parse::<EvmAddress>()
                {
                    return Ok(Self::from_evm_address(shard, realm, address));
                }
                Err(ParseIdError::Malformed(s.to_string()))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ParseIdError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s: String = Deserialize::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

aliased_entity_id! {
    /// Identifies an account, either by number or by EVM address alias.
    AccountId, AccountId, account, "account"
}

aliased_entity_id! {
    /// Identifies a smart contract, either by number or by EVM address.
    ContractId, ContractId, contract, "contract"
}

/// A single non-fungible token: token type plus serial number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NftId {
    pub token_id: TokenId,
    pub serial: u64,
}

impl NftId {
    pub const fn new(token_id: TokenId, serial: u64) -> Self {
        Self { token_id, serial }
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_id, self.serial)
    }
}

impl FromStr for NftId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token, serial) = s
            .split_once('/')
            .or_else(|| s.split_once('@'))
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
        let serial = parse_num(serial).ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
        Ok(Self::new(token.parse()?, serial))
    }
}
