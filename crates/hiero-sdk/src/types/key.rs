//! Cryptographic key types.
//!
//! Two curves are supported: Ed25519 and ECDSA over secp256k1. ECDSA
//! signatures are computed over the Keccak-256 digest of the message and
//! encoded as 64-byte `r || s`.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use ed25519_dalek::{Signer as _, Verifier as _};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::{ParseKeyError, SignerError};
use crate::schema;

const ED25519_PUBLIC_DER_PREFIX: &[u8] = &[
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];
const ED25519_PRIVATE_DER_PREFIX: &[u8] = &[
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];
const ECDSA_PUBLIC_DER_PREFIX: &[u8] = &[
    0x30, 0x2d, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x22, 0x00,
];
const ECDSA_PRIVATE_DER_PREFIX: &[u8] = &[
    0x30, 0x30, 0x02, 0x01, 0x00, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x04,
    0x22, 0x04, 0x20,
];

/// Key algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Ed25519,
    EcdsaSecp256k1,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::EcdsaSecp256k1 => "ecdsa-secp256k1",
        }
    }

    /// Length of a raw public key (compressed for secp256k1).
    pub fn public_key_len(&self) -> usize {
        match self {
            KeyType::Ed25519 => 32,
            KeyType::EcdsaSecp256k1 => 33,
        }
    }

    /// Length of a signature.
    pub fn signature_len(&self) -> usize {
        64
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseKeyError> {
    let s = s.trim();
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))
}

fn keccak256(message: &[u8]) -> [u8; 32] {
    Keccak256::digest(message).into()
}

// ============================================================================
// PublicKey
// ============================================================================

/// Ed25519 or secp256k1 public key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: Vec<u8>,
}

impl PublicKey {
    /// Create an Ed25519 public key from raw bytes, validating the point.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| ParseKeyError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|e| ParseKeyError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key_type: KeyType::Ed25519,
            data: arr.to_vec(),
        })
    }

    /// Create a secp256k1 public key from SEC1 bytes (compressed or not).
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| ParseKeyError::InvalidKey(e.to_string()))?;
        Ok(Self::from_ecdsa_key(&key))
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if let Some(raw) = bytes.strip_prefix(ED25519_PUBLIC_DER_PREFIX) {
            return Self::from_bytes_ed25519(raw);
        }
        if let Some(raw) = bytes.strip_prefix(ECDSA_PUBLIC_DER_PREFIX) {
            return Self::from_bytes_ecdsa(raw);
        }
        Err(ParseKeyError::UnknownDerEncoding)
    }

    /// Parse raw (32-byte Ed25519, 33-byte compressed secp256k1) or DER bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        match bytes.len() {
            32 => Self::from_bytes_ed25519(bytes),
            33 => Self::from_bytes_ecdsa(bytes),
            _ => Self::from_bytes_der(bytes),
        }
    }

    fn from_ecdsa_key(key: &k256::ecdsa::VerifyingKey) -> Self {
        Self {
            key_type: KeyType::EcdsaSecp256k1,
            data: key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Raw key bytes (compressed point for secp256k1).
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// DER-encoded SubjectPublicKeyInfo.
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix = match self.key_type {
            KeyType::Ed25519 => ED25519_PUBLIC_DER_PREFIX,
            KeyType::EcdsaSecp256k1 => ECDSA_PUBLIC_DER_PREFIX,
        };
        [prefix, self.data.as_slice()].concat()
    }

    /// Verify `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self.key_type {
            KeyType::Ed25519 => {
                let Ok(bytes) = <[u8; 32]>::try_from(self.data.as_slice()) else {
                    return false;
                };
                let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&bytes) else {
                    return false;
                };
                let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
                    return false;
                };
                key.verify(message, &signature).is_ok()
            }
            KeyType::EcdsaSecp256k1 => {
                let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.data) else {
                    return false;
                };
                let Ok(signature) = k256::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                key.verify_prehash(&keccak256(message), &signature).is_ok()
            }
        }
    }

    /// Wrap in the wire key sum.
    pub fn to_schema_key(&self) -> schema::Key {
        match self.key_type {
            KeyType::Ed25519 => schema::Key::Ed25519(self.data.clone()),
            KeyType::EcdsaSecp256k1 => schema::Key::EcdsaSecp256k1(self.data.clone()),
        }
    }

    pub(crate) fn to_signature_value(&self, signature: Vec<u8>) -> schema::SignatureValue {
        match self.key_type {
            KeyType::Ed25519 => schema::SignatureValue::Ed25519(signature),
            KeyType::EcdsaSecp256k1 => schema::SignatureValue::EcdsaSecp256k1(signature),
        }
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    /// Parses hex of raw or DER bytes, with an optional `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for PublicKey {
    /// DER hex, the conventional text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes_der()))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}:{})", self.key_type.as_str(), hex::encode(&self.data))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// PrivateKey
// ============================================================================

#[derive(Clone)]
enum PrivateKeyInner {
    Ed25519(ed25519_dalek::SigningKey),
    EcdsaSecp256k1(k256::ecdsa::SigningKey),
}

/// Ed25519 or secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey(PrivateKeyInner);

impl PrivateKey {
    /// Generate a new random Ed25519 key.
    pub fn generate_ed25519() -> Self {
        Self(PrivateKeyInner::Ed25519(ed25519_dalek::SigningKey::generate(
            &mut OsRng,
        )))
    }

    /// Generate a new random secp256k1 key.
    pub fn generate_ecdsa() -> Self {
        Self(PrivateKeyInner::EcdsaSecp256k1(
            k256::ecdsa::SigningKey::random(&mut OsRng),
        ))
    }

    /// Create an Ed25519 key from its 32-byte seed.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let seed: [u8; 32] = bytes.try_into().map_err(|_| ParseKeyError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(PrivateKeyInner::Ed25519(
            ed25519_dalek::SigningKey::from_bytes(&seed),
        )))
    }

    /// Create a secp256k1 key from its 32-byte scalar.
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if bytes.len() != 32 {
            return Err(ParseKeyError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        k256::ecdsa::SigningKey::from_slice(bytes)
            .map(|key| Self(PrivateKeyInner::EcdsaSecp256k1(key)))
            .map_err(|e| ParseKeyError::InvalidKey(e.to_string()))
    }

    /// Parse a DER-encoded PKCS#8 key.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if let Some(raw) = bytes.strip_prefix(ED25519_PRIVATE_DER_PREFIX) {
            return Self::from_bytes_ed25519(raw);
        }
        if let Some(raw) = bytes.strip_prefix(ECDSA_PRIVATE_DER_PREFIX) {
            return Self::from_bytes_ecdsa(raw);
        }
        Err(ParseKeyError::UnknownDerEncoding)
    }

    /// Parse DER bytes, or 32 raw bytes as an Ed25519 seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if bytes.len() == 32 {
            Self::from_bytes_ed25519(bytes)
        } else {
            Self::from_bytes_der(bytes)
        }
    }

    /// Parse hex of a raw secp256k1 scalar or its DER form.
    pub fn from_str_ecdsa(s: &str) -> Result<Self, ParseKeyError> {
        let bytes = decode_hex(s)?;
        if bytes.len() == 32 {
            Self::from_bytes_ecdsa(&bytes)
        } else {
            Self::from_bytes_der(&bytes)
        }
    }

    pub fn key_type(&self) -> KeyType {
        match &self.0 {
            PrivateKeyInner::Ed25519(_) => KeyType::Ed25519,
            PrivateKeyInner::EcdsaSecp256k1(_) => KeyType::EcdsaSecp256k1,
        }
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.0 {
            PrivateKeyInner::Ed25519(key) => PublicKey {
                key_type: KeyType::Ed25519,
                data: key.verifying_key().to_bytes().to_vec(),
            },
            PrivateKeyInner::EcdsaSecp256k1(key) => PublicKey::from_ecdsa_key(key.verifying_key()),
        }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        match &self.0 {
            PrivateKeyInner::Ed25519(key) => Ok(key.sign(message).to_bytes().to_vec()),
            PrivateKeyInner::EcdsaSecp256k1(key) => {
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(&keccak256(message))
                    .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    /// Raw private key bytes.
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        match &self.0 {
            PrivateKeyInner::Ed25519(key) => key.to_bytes().to_vec(),
            PrivateKeyInner::EcdsaSecp256k1(key) => key.to_bytes().to_vec(),
        }
    }

    /// DER-encoded PKCS#8.
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix = match self.key_type() {
            KeyType::Ed25519 => ED25519_PRIVATE_DER_PREFIX,
            KeyType::EcdsaSecp256k1 => ECDSA_PRIVATE_DER_PREFIX,
        };
        [prefix, self.to_bytes_raw().as_slice()].concat()
    }
}

impl FromStr for PrivateKey {
    type Err = ParseKeyError;

    /// Parses hex of DER bytes, or of a raw 32-byte Ed25519 seed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

impl TryFrom<&str> for PrivateKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes_der()))
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}:***)", self.key_type().as_str())
    }
}

// ============================================================================
// Key / KeyList
// ============================================================================

/// A key as it appears on an entity: a single public key or a (threshold) list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Single(PublicKey),
    List(KeyList),
}

impl Key {
    /// Wrap in the wire key sum.
    pub fn to_schema_key(&self) -> schema::Key {
        match self {
            Key::Single(key) => key.to_schema_key(),
            Key::List(list) => list.to_schema_key(),
        }
    }

    /// Unwrap from the wire key sum.
    pub fn from_schema_key(key: &schema::Key) -> Result<Self, ParseKeyError> {
        Ok(match key {
            schema::Key::Ed25519(bytes) => Key::Single(PublicKey::from_bytes_ed25519(bytes)?),
            schema::Key::EcdsaSecp256k1(bytes) => Key::Single(PublicKey::from_bytes_ecdsa(bytes)?),
            schema::Key::KeyList(keys) => Key::List(KeyList {
                keys: keys.iter().map(Key::from_schema_key).collect::<Result<_, _>>()?,
                threshold: None,
            }),
            schema::Key::ThresholdKey { threshold, keys } => Key::List(KeyList {
                keys: keys.iter().map(Key::from_schema_key).collect::<Result<_, _>>()?,
                threshold: Some(*threshold),
            }),
        })
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Key::Single(key)
    }
}

impl From<KeyList> for Key {
    fn from(list: KeyList) -> Self {
        Key::List(list)
    }
}

/// A list of keys. Without a threshold every key must sign; with threshold
/// `k`, any `k` of them suffice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyList {
    pub keys: Vec<Key>,
    pub threshold: Option<u32>,
}

impl KeyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list requiring `threshold` of `keys`.
    pub fn with_threshold(keys: impl IntoIterator<Item = Key>, threshold: u32) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            threshold: Some(threshold),
        }
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn to_schema_key(&self) -> schema::Key {
        let keys = self.keys.iter().map(Key::to_schema_key).collect();
        match self.threshold {
            Some(threshold) => schema::Key::ThresholdKey { threshold, keys },
            None => schema::Key::KeyList(keys),
        }
    }
}

impl FromIterator<PublicKey> for KeyList {
    fn from_iter<I: IntoIterator<Item = PublicKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Key::Single).collect(),
            threshold: None,
        }
    }
}
