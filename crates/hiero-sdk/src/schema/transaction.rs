//! Transaction bodies and the signed envelope.

use borsh::{BorshDeserialize, BorshSerialize};

use super::basic::{AccountId, EntityId, Key, Timestamp, TransactionId};

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: i64,
    pub is_approval: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferList {
    pub account_amounts: Vec<AccountAmount>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CryptoCreateAccountBody {
    pub key: Option<Key>,
    pub initial_balance: u64,
    pub receiver_sig_required: bool,
    pub auto_renew_period_seconds: i64,
    pub memo: String,
    pub max_automatic_token_associations: i32,
    pub alias: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FileCreateBody {
    pub keys: Vec<Key>,
    pub contents: Vec<u8>,
    pub expiration_time: Option<Timestamp>,
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FileAppendBody {
    pub file_id: Option<EntityId>,
    pub contents: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ConsensusSubmitMessageBody {
    pub topic_id: Option<EntityId>,
    pub message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum TokenReference {
    FungibleToken(EntityId),
    Nft { token_id: EntityId, serial: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TokenRejectBody {
    pub owner: Option<AccountId>,
    pub rejections: Vec<TokenReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TokenDissociateBody {
    pub account: Option<AccountId>,
    pub tokens: Vec<EntityId>,
}

/// Inner transactions are carried as [`SignedTransaction`] bytes.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AtomicBatchBody {
    pub transactions: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum TransactionData {
    CryptoTransfer(TransferList),
    CryptoCreateAccount(CryptoCreateAccountBody),
    FileCreate(FileCreateBody),
    FileAppend(FileAppendBody),
    ConsensusSubmitMessage(ConsensusSubmitMessageBody),
    TokenReject(TokenRejectBody),
    TokenDissociate(TokenDissociateBody),
    AtomicBatch(AtomicBatchBody),
}

/// Position of one chunk within a chunked payload.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ChunkInfo {
    pub initial_transaction_id: TransactionId,
    pub index: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub transaction_fee: u64,
    pub valid_duration_seconds: i64,
    pub memo: String,
    pub chunk_info: Option<ChunkInfo>,
    pub batch_key: Option<Key>,
    pub data: TransactionData,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum SignatureValue {
    Ed25519(Vec<u8>),
    EcdsaSecp256k1(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignaturePair {
    /// Full raw public key bytes of the signer.
    pub pub_key_prefix: Vec<u8>,
    pub signature: SignatureValue,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignatureMap {
    pub sig_pair: Vec<SignaturePair>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
}

/// The envelope submitted to a node.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub signed_transaction_bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

/// A node's answer to a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransactionResponse {
    pub node_transaction_precheck_code: i32,
    pub cost: u64,
}
