//! Core value types.
//!
//! Identifiers, amounts, keys and timestamps used throughout the SDK. All of
//! them parse from and format to the text forms used by the network's tooling.

mod endpoint;
mod evm_address;
mod hbar;
mod id;
mod key;
mod ledger_id;
mod status;
mod timestamp;
mod transaction_id;

pub use endpoint::{Endpoint, EndpointAddress, PORT_HTTPS, PORT_NODE_PLAIN, PORT_NODE_TLS};
pub use evm_address::EvmAddress;
pub use hbar::{Hbar, HbarUnit};
pub use id::{AccountId, Checksum, ContractId, FileId, NftId, ScheduleId, TokenId, TopicId};
pub use key::{Key, KeyList, KeyType, PrivateKey, PublicKey};
pub use ledger_id::LedgerId;
pub use status::Status;
pub use timestamp::Timestamp;
pub use transaction_id::TransactionId;
