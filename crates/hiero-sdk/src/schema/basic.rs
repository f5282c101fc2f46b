//! Identifier, time and key shapes shared by every message.

use borsh::{BorshDeserialize, BorshSerialize};

/// `shard.realm.num` of a file, token, topic or schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

/// How an account is referenced: by number or by EVM alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum AccountRef {
    Num(u64),
    Alias(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub account: AccountRef,
}

/// A contract, referenced by number or by EVM address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct ContractId {
    pub shard: u64,
    pub realm: u64,
    pub contract: AccountRef,
}

impl AccountId {
    pub fn num(shard: u64, realm: u64, num: u64) -> Self {
        Self {
            shard,
            realm,
            account: AccountRef::Num(num),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, BorshSerialize, BorshDeserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
    pub scheduled: bool,
    pub nonce: i32,
}

/// Key sum as carried on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum Key {
    Ed25519(Vec<u8>),
    EcdsaSecp256k1(Vec<u8>),
    KeyList(Vec<Key>),
    ThresholdKey { threshold: u32, keys: Vec<Key> },
}
