//! Wire schema and codec.
//!
//! Every message exchanged with a node is one of the borsh-encoded shapes in
//! this module. The in-memory request types ([`Transaction`](crate::Transaction),
//! [`Query`](crate::Query)) never touch bytes directly; they convert to and
//! from these shapes, and [`encode`]/[`decode`] do the rest.
//!
//! | Shape | Used for |
//! |-------|----------|
//! | [`TransactionBody`] | The signed payload of one transaction for one node |
//! | [`SignedTransaction`] | Body bytes plus [`SignatureMap`] |
//! | [`Transaction`] | Envelope submitted to a node |
//! | [`Query`] / [`Response`] | Query request and answer |
//! | [`TransactionReceipt`] / [`TransactionRecord`] | Consensus outcome |
//!
//! Encoding is canonical: decoding any encoded value and encoding it again
//! yields the same bytes.

mod basic;
mod query;
mod transaction;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::Error;

pub use basic::{AccountId, AccountRef, ContractId, EntityId, Key, Timestamp, TransactionId};
pub use query::{
    AccountInfo, FileInfo, Query, QueryData, QueryHeader, Response, ResponseData, ResponseHeader,
    ResponseType, TransactionReceipt, TransactionRecord,
};
pub use transaction::{
    AccountAmount, AtomicBatchBody, ChunkInfo, ConsensusSubmitMessageBody,
    CryptoCreateAccountBody, FileAppendBody, FileCreateBody, SignaturePair, SignatureMap,
    SignatureValue, SignedTransaction, TokenDissociateBody, TokenReference, TokenRejectBody,
    Transaction, TransactionBody, TransactionData, TransactionList, TransactionResponse,
    TransferList,
};

/// A unary RPC endpoint on a node: `proto.<service>/<method>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RpcMethod {
    pub service: &'static str,
    pub method: &'static str,
}

impl RpcMethod {
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }

    /// URL path of this method, e.g. `/proto.CryptoService/cryptoTransfer`.
    pub fn path(&self) -> String {
        format!("/proto.{}/{}", self.service, self.method)
    }
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "proto.{}/{}", self.service, self.method)
    }
}

/// Well-known RPC methods.
pub mod methods {
    use super::RpcMethod;

    pub const CRYPTO_TRANSFER: RpcMethod = RpcMethod::new("CryptoService", "cryptoTransfer");
    pub const CREATE_ACCOUNT: RpcMethod = RpcMethod::new("CryptoService", "createAccount");
    pub const GET_ACCOUNT_BALANCE: RpcMethod = RpcMethod::new("CryptoService", "cryptoGetBalance");
    pub const GET_ACCOUNT_INFO: RpcMethod = RpcMethod::new("CryptoService", "getAccountInfo");
    pub const GET_TRANSACTION_RECEIPTS: RpcMethod =
        RpcMethod::new("CryptoService", "getTransactionReceipts");
    pub const GET_TX_RECORD_BY_TX_ID: RpcMethod =
        RpcMethod::new("CryptoService", "getTxRecordByTxID");
    pub const CREATE_FILE: RpcMethod = RpcMethod::new("FileService", "createFile");
    pub const APPEND_CONTENT: RpcMethod = RpcMethod::new("FileService", "appendContent");
    pub const GET_FILE_INFO: RpcMethod = RpcMethod::new("FileService", "getFileInfo");
    pub const SUBMIT_MESSAGE: RpcMethod = RpcMethod::new("ConsensusService", "submitMessage");
    pub const REJECT_TOKEN: RpcMethod = RpcMethod::new("TokenService", "rejectToken");
    pub const DISSOCIATE_TOKENS: RpcMethod = RpcMethod::new("TokenService", "dissociateTokens");
    pub const ATOMIC_BATCH: RpcMethod = RpcMethod::new("UtilService", "atomicBatch");

    /// Methods that take a [`Query`](super::Query) and answer a
    /// [`Response`](super::Response). Every other method takes a
    /// [`Transaction`](super::Transaction).
    pub const QUERIES: [RpcMethod; 5] = [
        GET_ACCOUNT_BALANCE,
        GET_ACCOUNT_INFO,
        GET_TRANSACTION_RECEIPTS,
        GET_TX_RECORD_BY_TX_ID,
        GET_FILE_INFO,
    ];
}

impl RpcMethod {
    /// Whether this method answers queries rather than accepting transactions.
    pub fn is_query(&self) -> bool {
        methods::QUERIES.contains(self)
    }
}

/// Encode a wire message.
pub fn encode<T: BorshSerialize>(value: &T) -> Result<Vec<u8>, Error> {
    borsh::to_vec(value).map_err(Error::codec)
}

/// Decode a wire message, rejecting trailing bytes.
pub fn decode<T: BorshDeserialize>(bytes: &[u8]) -> Result<T, Error> {
    borsh::from_slice(bytes).map_err(Error::codec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> TransactionBody {
        let payer = AccountId::num(0, 0, 2);
        TransactionBody {
            transaction_id: TransactionId {
                account_id: payer.clone(),
                valid_start: Timestamp {
                    seconds: 1_700_000_000,
                    nanos: 42,
                },
                scheduled: false,
                nonce: 0,
            },
            node_account_id: AccountId::num(0, 0, 3),
            transaction_fee: 200_000_000,
            valid_duration_seconds: 120,
            memo: "hello".to_string(),
            chunk_info: None,
            batch_key: None,
            data: TransactionData::CryptoTransfer(TransferList {
                account_amounts: vec![
                    AccountAmount {
                        account_id: payer,
                        amount: -10,
                        is_approval: false,
                    },
                    AccountAmount {
                        account_id: AccountId::num(0, 0, 1001),
                        amount: 10,
                        is_approval: false,
                    },
                ],
            }),
        }
    }

    #[test]
    fn test_body_roundtrip_is_bit_exact() {
        let body = sample_body();
        let bytes = encode(&body).unwrap();
        let decoded: TransactionBody = decode(&bytes).unwrap();
        assert_eq!(decoded, body);
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode(&sample_body()).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode::<TransactionBody>(&bytes),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let bytes = encode(&sample_body()).unwrap();
        assert!(decode::<TransactionBody>(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn test_rpc_method_path() {
        assert_eq!(
            methods::CRYPTO_TRANSFER.path(),
            "/proto.CryptoService/cryptoTransfer"
        );
        assert_eq!(
            methods::GET_TRANSACTION_RECEIPTS.to_string(),
            "proto.CryptoService/getTransactionReceipts"
        );
    }
}
