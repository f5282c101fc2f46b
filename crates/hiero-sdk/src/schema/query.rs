//! Query requests, answers, receipts and records.

use borsh::{BorshDeserialize, BorshSerialize};

use super::basic::{AccountId, ContractId, EntityId, Key, Timestamp, TransactionId};
use super::transaction::{Transaction, TransferList};

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ResponseType {
    AnswerOnly,
    CostAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct QueryHeader {
    pub payment: Option<Transaction>,
    pub response_type: ResponseType,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum QueryData {
    CryptoGetAccountBalance {
        account_id: Option<AccountId>,
        contract_id: Option<ContractId>,
    },
    CryptoGetInfo {
        account_id: AccountId,
    },
    FileGetInfo {
        file_id: EntityId,
    },
    TransactionGetReceipt {
        transaction_id: TransactionId,
        include_duplicates: bool,
        include_child_receipts: bool,
    },
    TransactionGetRecord {
        transaction_id: TransactionId,
        include_duplicates: bool,
        include_child_records: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Query {
    pub header: QueryHeader,
    pub data: QueryData,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ResponseHeader {
    pub node_transaction_precheck_code: i32,
    pub response_type: ResponseType,
    pub cost: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionReceipt {
    pub status: i32,
    pub account_id: Option<AccountId>,
    pub file_id: Option<EntityId>,
    pub contract_id: Option<ContractId>,
    pub topic_id: Option<EntityId>,
    pub token_id: Option<EntityId>,
    pub schedule_id: Option<EntityId>,
    pub scheduled_transaction_id: Option<TransactionId>,
    pub topic_sequence_number: u64,
    pub topic_running_hash: Vec<u8>,
    pub total_supply: u64,
    pub serial_numbers: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    pub transaction_hash: Vec<u8>,
    pub consensus_timestamp: Option<Timestamp>,
    pub transaction_id: TransactionId,
    pub memo: String,
    pub transaction_fee: u64,
    pub transfer_list: TransferList,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub contract_account_id: String,
    pub deleted: bool,
    pub key: Option<Key>,
    pub balance: u64,
    pub receiver_sig_required: bool,
    pub expiration_time: Option<Timestamp>,
    pub auto_renew_period_seconds: i64,
    pub memo: String,
    pub owned_nfts: i64,
    pub max_automatic_token_associations: i32,
    pub ledger_id: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FileInfo {
    pub file_id: EntityId,
    pub size: i64,
    pub expiration_time: Option<Timestamp>,
    pub deleted: bool,
    pub keys: Vec<Key>,
    pub memo: String,
    pub ledger_id: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ResponseData {
    /// Cost answers and failed prechecks carry no body.
    Empty,
    CryptoGetAccountBalance {
        account_id: AccountId,
        balance: u64,
    },
    CryptoGetInfo(AccountInfo),
    FileGetInfo(FileInfo),
    TransactionGetReceipt {
        receipt: TransactionReceipt,
        duplicate_receipts: Vec<TransactionReceipt>,
        child_receipts: Vec<TransactionReceipt>,
    },
    TransactionGetRecord {
        record: TransactionRecord,
        duplicate_records: Vec<TransactionRecord>,
        child_records: Vec<TransactionRecord>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Response {
    pub header: ResponseHeader,
    pub data: ResponseData,
}
