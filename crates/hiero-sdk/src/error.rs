//! Error types for hiero-sdk.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by every execution
//!   - [`ParseIdError`] — Malformed entity IDs, endpoints, transaction IDs
//!   - [`ParseAmountError`] — Malformed hbar amounts
//!   - [`ParseKeyError`] — Malformed key material
//!   - [`SignerError`] — Signing failures
//!   - [`TransportError`] — Per-attempt network failures
//!
//! Retryable conditions (`BUSY`, transport failures on a single node, receipts
//! that are not yet available) are handled inside the execution loop and never
//! surface on their own. When retries run out, the last cause is carried by
//! [`Error::MaxAttemptsExceeded`].
//!
//! # Matching on precheck failures
//!
//! ```rust,no_run
//! use hiero_sdk::*;
//!
//! # async fn example(client: &Client, mut tx: TransferTransaction) -> Result<(), Error> {
//! match tx.execute(client).await {
//!     Ok(response) => println!("submitted {}", response.transaction_id),
//!     Err(Error::PrecheckStatus { status: Status::InsufficientPayerBalance, .. }) => {
//!         println!("operator is out of hbar");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::types::{Hbar, Status, TransactionId};

/// Error parsing an identifier-like value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("Input entity ID string '{0}' is malformed")]
    Malformed(String),

    #[error("Checksum '{0}' is malformed (expected five lowercase letters)")]
    MalformedChecksum(String),

    #[error("Checksum mismatch for {id}: expected '{expected}', found '{found}'")]
    ChecksumMismatch {
        id: String,
        expected: String,
        found: String,
    },

    #[error("EVM address '{0}' is malformed (expected 40 hex characters)")]
    MalformedEvmAddress(String),

    #[error("Endpoint '{0}' is malformed (expected host:port)")]
    MalformedEndpoint(String),

    #[error("Transaction ID '{0}' is malformed")]
    MalformedTransactionId(String),

    #[error("Unknown ledger '{0}'")]
    UnknownLedger(String),
}

/// Error parsing an hbar amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Invalid amount format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid number in amount: '{0}'")]
    InvalidNumber(String),

    #[error("Unknown hbar unit '{0}'")]
    UnknownUnit(String),

    #[error("Amount '{0}' is not a whole number of tinybars")]
    FractionalTinybars(String),

    #[error("Amount overflow")]
    Overflow,
}

/// Error parsing key material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex in key: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unrecognized DER key encoding")]
    UnknownDerEncoding,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },
}

/// Error during a signing operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signer returned a signature that does not verify against {0}")]
    BadSignature(String),
}

/// A failure of one RPC attempt against one node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    // ─── Connection ───
    #[error("Failed to open channel to {address}: {message}")]
    Connect { address: String, message: String },

    #[error("Channel to {0} is closed")]
    Closed(String),

    // ─── Request ───
    #[error("Request to {address} failed: {message}")]
    Request { address: String, message: String },

    #[error("Node {address} returned gRPC status {code}: {message}")]
    GrpcStatus {
        address: String,
        code: u32,
        message: String,
    },

    #[error("Node {address} did not answer within {deadline:?}")]
    DeadlineExceeded { address: String, deadline: Duration },

    // ─── Framing ───
    #[error("Malformed frame from {address}: {message}")]
    Frame { address: String, message: String },
}

impl TransportError {
    /// Address of the node the failed attempt was sent to.
    pub fn address(&self) -> &str {
        match self {
            Self::Connect { address, .. }
            | Self::Request { address, .. }
            | Self::GrpcStatus { address, .. }
            | Self::DeadlineExceeded { address, .. }
            | Self::Frame { address, .. } => address,
            Self::Closed(address) => address,
        }
    }
}

/// Main error type for all hiero-sdk operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Client has been closed")]
    Uninitialized,

    #[error("Illegal state: {0}")]
    IllegalState(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseId(#[from] ParseIdError),

    #[error(transparent)]
    ParseAmount(#[from] ParseAmountError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    // ─── Network outcome ───
    #[error("Transaction {} failed precheck with status {status}", fmt_tx(.transaction_id))]
    PrecheckStatus {
        status: Status,
        transaction_id: Option<TransactionId>,
    },

    #[error("Receipt for transaction {} contained error status {status}", fmt_tx(.transaction_id))]
    ReceiptStatus {
        status: Status,
        transaction_id: Option<TransactionId>,
    },

    #[error("Failed to get a response after {attempts} attempts{}", fmt_last(.last))]
    MaxAttemptsExceeded {
        attempts: u32,
        last: Option<Box<Error>>,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Transport(#[from] TransportError),

    // ─── Request limits ───
    #[error("Payload requires {chunks} chunks but at most {max} are allowed")]
    MaxChunksExceeded { chunks: usize, max: usize },

    #[error("Query cost {cost} exceeds the maximum payment {max}")]
    MaxQueryPaymentExceeded { cost: Hbar, max: Hbar },

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Serialization ───
    #[error("Codec error: {0}")]
    Codec(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─── Flows ───
    #[error("Flow step '{step}' failed: {source}")]
    Flow {
        step: &'static str,
        #[source]
        source: Box<Error>,
    },
}

fn fmt_tx(transaction_id: &Option<TransactionId>) -> String {
    match transaction_id {
        Some(id) => id.to_string(),
        None => "<none>".to_string(),
    }
}

fn fmt_last(last: &Option<Box<Error>>) -> String {
    match last {
        Some(e) => format!(" (last error: {})", e),
        None => String::new(),
    }
}

impl Error {
    /// The status code carried by a precheck or receipt failure.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::PrecheckStatus { status, .. } | Self::ReceiptStatus { status, .. } => {
                Some(*status)
            }
            Self::Flow { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn codec(err: impl std::fmt::Display) -> Self {
        Self::Codec(err.to_string())
    }

    pub(crate) fn frozen() -> Self {
        Self::illegal_state("transaction is immutable; it has at least one signature or has been explicitly frozen")
    }
}
