//! An async Rust client for Hiero ledgers.
//!
//! **hiero-sdk** builds, signs and submits transactions and queries to the
//! consensus nodes of a Hiero network, retrying across nodes until an
//! answer arrives or the limits run out.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hiero_sdk::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hiero_sdk::Error> {
//!     // Configure once
//!     let client = Client::for_testnet();
//!     client.set_operator(AccountId::from_num(1001), "302e...".parse::<PrivateKey>()?);
//!
//!     // Check a balance (free)
//!     let balance = AccountBalanceQuery::new()
//!         .account_id(AccountId::from_num(1001))
//!         .execute(&client)
//!         .await?;
//!     println!("Balance: {}", balance.hbars);
//!
//!     // Transfer, then wait for consensus
//!     let response = TransferTransaction::new()
//!         .hbar_transfer(AccountId::from_num(1001), Hbar::new(-1))?
//!         .hbar_transfer(AccountId::from_num(1002), Hbar::new(1))?
//!         .execute(&client)
//!         .await?;
//!     let receipt = response.get_receipt(&client).await?;
//!     println!("Status: {}", receipt.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **One client**: the [`Client`] holds the network, the operator and
//!    the defaults every request falls back to
//! 2. **Requests own their overrides**: node lists, attempts, backoff and
//!    deadlines can be set per request
//! 3. **Immutable once frozen**: a frozen [`Transaction`] only accepts
//!    signatures
//! 4. **Typed failures**: every error is a variant of [`Error`]
//!
//! # Core Types
//!
//! - [`AccountId`], [`FileId`], [`TokenId`], [`TopicId`] - Entity ids with
//!   optional checksums
//! - [`Hbar`] - Amount in tinybars
//! - [`PrivateKey`], [`PublicKey`], [`Key`] - Ed25519 and ECDSA(secp256k1)
//!   keys
//! - [`TransactionId`] - Payer account plus valid start
//! - [`Status`] - Response codes from nodes
//!
//! # String Parsing
//!
//! ```
//! use hiero_sdk::{AccountId, Hbar, TransactionId};
//!
//! let account: AccountId = "0.0.1001".parse().unwrap();
//! let amount: Hbar = "1.5 ℏ".parse().unwrap();
//! let id: TransactionId = "0.0.1001@1700000000.000000001".parse().unwrap();
//! ```

pub mod client;
pub mod error;
pub mod flow;
pub mod query;
pub mod schema;
pub mod transaction;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Error, ParseAmountError, ParseIdError, ParseKeyError, SignerError, TransportError};
pub use types::*;

// Re-export client types
pub use client::{
    Client, ClientBuilder, ClientConfig, FnSigner, MirrorNetwork, Network, NetworkName, Node,
    NodeHealth, Operator, Signer,
};

// Re-export request types
pub use flow::TokenRejectFlow;
pub use query::{
    AccountBalance, AccountBalanceQuery, AccountInfo, AccountInfoQuery, FileInfo, FileInfoQuery,
    Query, QueryData, TransactionReceipt, TransactionReceiptQuery, TransactionRecord,
    TransactionRecordQuery,
};
pub use transaction::{
    AccountCreateTransaction, BatchTransaction, FileAppendTransaction, FileCreateTransaction,
    HbarTransfer, TokenDissociateTransaction, TokenRejectTransaction,
    TopicMessageSubmitTransaction, Transaction, TransactionData, TransactionResponse,
    TransferTransaction,
};
pub use transport::{Channel, GrpcWebTransport, Transport};
