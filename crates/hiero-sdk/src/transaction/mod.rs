//! Transactions: build, freeze, sign, submit.
//!
//! Every transaction is a [`Transaction<D>`] over a body type implementing
//! [`TransactionData`]; the concrete transactions are aliases such as
//! [`TransferTransaction`].
//!
//! # Lifecycle
//!
//! 1. **Build**: set the body and the common fields. Setters fail with
//!    [`Error::IllegalState`] once the transaction is frozen.
//! 2. **Freeze**: bind node accounts and a transaction id, and serialize one
//!    body per (chunk, node).
//! 3. **Sign**: every body is signed by every key, once per key.
//! 4. **Execute**: submit each chunk in order; the operator signs first if it
//!    pays for the transaction.
//!
//! ```rust,no_run
//! use hiero_sdk::*;
//!
//! # async fn example(client: &Client, alice: AccountId, bob: AccountId) -> Result<(), Error> {
//! let mut tx = TransferTransaction::new();
//! tx.hbar_transfer(alice, Hbar::new(-10))?
//!     .hbar_transfer(bob, Hbar::new(10))?
//!     .memo("rent")?;
//!
//! let response = tx.execute(client).await?;
//! let receipt = response.get_receipt(client).await?;
//! assert_eq!(receipt.status, Status::Success);
//! # Ok(())
//! # }
//! ```

mod account_create;
mod batch;
mod chunked;
mod file_append;
mod file_create;
mod response;
mod token_dissociate;
mod token_reject;
mod topic_message_submit;
mod transfer;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use sha2::{Digest, Sha384};

use crate::client::execute::{self, Execute, RequestConfig};
use crate::client::{Client, FnSigner, Signer};
use crate::error::{Error, SignerError};
use crate::schema::{self, RpcMethod};
use crate::types::{AccountId, Hbar, Key, LedgerId, PrivateKey, PublicKey, Status, TransactionId};

pub use account_create::{AccountCreateTransaction, AccountCreateTransactionData};
pub use batch::{BatchTransaction, BatchTransactionData};
pub use chunked::{ChunkData, DEFAULT_MAX_CHUNKS, FILE_APPEND_CHUNK_SIZE, TOPIC_MESSAGE_CHUNK_SIZE};
pub use file_append::{FileAppendTransaction, FileAppendTransactionData};
pub use file_create::{FileCreateTransaction, FileCreateTransactionData};
pub use response::TransactionResponse;
pub use token_dissociate::{TokenDissociateTransaction, TokenDissociateTransactionData};
pub use token_reject::{TokenRejectTransaction, TokenRejectTransactionData};
pub use topic_message_submit::{TopicMessageSubmitTransaction, TopicMessageSubmitTransactionData};
pub use transfer::{HbarTransfer, TransferTransaction, TransferTransactionData};

/// Default validity window of a transaction.
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);

/// Node account that batched inner transactions are bound to.
pub const BATCH_NODE_ACCOUNT_ID: AccountId = AccountId::new(0, 0, 0);

/// The body of one kind of transaction.
pub trait TransactionData: Clone + fmt::Debug + Send + Sync {
    /// RPC the transaction is submitted to.
    fn method(&self) -> RpcMethod;

    /// Max fee used when neither the transaction nor the client sets one.
    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(2)
    }

    /// Wire body for chunk `chunk_index` (always 0 for unchunked bodies).
    fn to_schema(&self, chunk_index: usize) -> schema::TransactionData;

    fn chunk_data(&self) -> Option<&ChunkData> {
        None
    }

    /// Check the checksums of every entity id in the body.
    fn validate_checksums(&self, _ledger_id: &LedgerId) -> Result<(), Error> {
        Ok(())
    }
}

// ============================================================================
// Frozen state
// ============================================================================

/// One serialized body and the signatures collected for it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct SignedBody {
    body_bytes: Vec<u8>,
    sig_map: schema::SignatureMap,
}

impl SignedBody {
    fn signed_transaction_bytes(&self) -> Result<Vec<u8>, Error> {
        schema::encode(&schema::SignedTransaction {
            body_bytes: self.body_bytes.clone(),
            sig_map: self.sig_map.clone(),
        })
    }

    fn envelope(&self) -> Result<schema::Transaction, Error> {
        Ok(schema::Transaction {
            signed_transaction_bytes: self.signed_transaction_bytes()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FrozenChunk {
    transaction_id: TransactionId,
    bodies: BTreeMap<AccountId, SignedBody>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Frozen {
    node_account_ids: Vec<AccountId>,
    chunks: Vec<FrozenChunk>,
}

// ============================================================================
// Transaction
// ============================================================================

/// A transaction with body `D`.
#[derive(Clone, Debug)]
pub struct Transaction<D> {
    data: D,
    config: RequestConfig,
    transaction_id: Option<TransactionId>,
    memo: String,
    max_transaction_fee: Option<Hbar>,
    valid_duration: Duration,
    batch_key: Option<Key>,
    batchified: bool,
    signers: Vec<PublicKey>,
    frozen: Option<Frozen>,
}

impl<D: TransactionData + Default> Default for Transaction<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: TransactionData + Default> Transaction<D> {
    pub fn new() -> Self {
        Self::from_data(D::default())
    }
}

impl<D: TransactionData> Transaction<D> {
    pub(crate) fn from_data(data: D) -> Self {
        Self {
            data,
            config: RequestConfig::default(),
            transaction_id: None,
            memo: String::new(),
            max_transaction_fee: None,
            valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
            batch_key: None,
            batchified: false,
            signers: Vec::new(),
            frozen: None,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// The body, for mutation before freezing.
    pub(crate) fn data_mut(&mut self) -> Result<&mut D, Error> {
        self.require_not_frozen()?;
        Ok(&mut self.data)
    }

    fn require_not_frozen(&self) -> Result<(), Error> {
        if self.frozen.is_some() {
            return Err(Error::frozen());
        }
        Ok(())
    }

    // ─── Common fields ───

    /// Bind the transaction to these nodes instead of letting the client pick.
    pub fn node_account_ids(
        &mut self,
        ids: impl IntoIterator<Item = AccountId>,
    ) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.config.node_account_ids = Some(ids.into_iter().collect());
        Ok(self)
    }

    pub fn transaction_id(&mut self, id: TransactionId) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.transaction_id = Some(id);
        Ok(self)
    }

    pub fn memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.memo = memo.into();
        Ok(self)
    }

    pub fn max_transaction_fee(&mut self, fee: Hbar) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        if fee.is_negative() {
            return Err(Error::config("max transaction fee must be non-negative"));
        }
        self.max_transaction_fee = Some(fee);
        Ok(self)
    }

    pub fn transaction_valid_duration(&mut self, duration: Duration) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.valid_duration = duration;
        Ok(self)
    }

    /// Key that must sign the batch this transaction is part of.
    pub fn batch_key(&mut self, key: impl Into<Key>) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.batch_key = Some(key.into());
        Ok(self)
    }

    // ─── Execution settings ───

    pub fn max_attempts(&mut self, attempts: u32) -> Result<&mut Self, Error> {
        if attempts == 0 {
            return Err(Error::config("max attempts must be at least 1"));
        }
        self.config.max_attempts = Some(attempts);
        Ok(self)
    }

    pub fn node_backoff(&mut self, min: Duration, max: Duration) -> Result<&mut Self, Error> {
        if min > max {
            return Err(Error::config("min backoff exceeds max backoff"));
        }
        self.config.min_backoff = Some(min);
        self.config.max_backoff = Some(max);
        Ok(self)
    }

    pub fn grpc_deadline(&mut self, deadline: Duration) -> &mut Self {
        self.config.grpc_deadline = Some(deadline);
        self
    }

    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    // ─── Getters ───

    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Nodes the transaction is bound to: the frozen set, or the explicit one.
    pub fn get_node_account_ids(&self) -> Option<&[AccountId]> {
        match &self.frozen {
            Some(frozen) => Some(&frozen.node_account_ids),
            None => self.config.node_account_ids.as_deref(),
        }
    }

    pub fn get_memo(&self) -> &str {
        &self.memo
    }

    pub fn get_max_transaction_fee(&self) -> Option<Hbar> {
        self.max_transaction_fee
    }

    pub fn get_transaction_valid_duration(&self) -> Duration {
        self.valid_duration
    }

    pub fn get_batch_key(&self) -> Option<&Key> {
        self.batch_key.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn is_batchified(&self) -> bool {
        self.batchified
    }

    /// Public keys that have signed, in signing order.
    pub fn signers(&self) -> &[PublicKey] {
        &self.signers
    }

    // ─── Freeze ───

    /// Freeze without a client. Node account ids and a transaction id must
    /// have been set explicitly.
    pub fn freeze(&mut self) -> Result<&mut Self, Error> {
        self.freeze_inner(None)
    }

    /// Freeze, taking missing node ids, transaction id and max fee from
    /// `client`.
    pub fn freeze_with(&mut self, client: &Client) -> Result<&mut Self, Error> {
        self.freeze_inner(Some(client))
    }

    fn freeze_inner(&mut self, client: Option<&Client>) -> Result<&mut Self, Error> {
        if self.frozen.is_some() {
            return Ok(self);
        }

        let node_account_ids = match (&self.config.node_account_ids, client) {
            (Some(ids), _) => ids.clone(),
            (None, Some(client)) => client.node_ids_for_request(),
            (None, None) => {
                return Err(Error::config(
                    "cannot freeze without a client unless node account ids are set",
                ));
            }
        };
        if node_account_ids.is_empty() {
            return Err(Error::config("transaction has no node account ids"));
        }

        let transaction_id = match (self.transaction_id, client.and_then(Client::operator_account_id)) {
            (Some(id), _) => id,
            (None, Some(operator)) => TransactionId::generate(operator),
            (None, None) => {
                return Err(Error::config(
                    "cannot freeze without a transaction id or a client operator",
                ));
            }
        };

        if let Some(client) = client
            && client.auto_validate_checksums()
            && let Some(ledger_id) = client.ledger_id()
        {
            self.data.validate_checksums(&ledger_id)?;
        }

        let max_fee = self
            .max_transaction_fee
            .or_else(|| client.and_then(Client::default_max_transaction_fee))
            .unwrap_or_else(|| self.data.default_max_transaction_fee());

        let frozen = self.build_frozen(node_account_ids, transaction_id, max_fee)?;
        self.transaction_id = Some(transaction_id);
        self.frozen = Some(frozen);
        Ok(self)
    }

    fn build_frozen(
        &self,
        node_account_ids: Vec<AccountId>,
        transaction_id: TransactionId,
        max_fee: Hbar,
    ) -> Result<Frozen, Error> {
        let (total, with_chunk_info) = match self.data.chunk_data() {
            Some(chunks) => {
                let count = chunks.chunk_count();
                if count > chunks.max_chunks {
                    return Err(Error::MaxChunksExceeded {
                        chunks: count,
                        max: chunks.max_chunks,
                    });
                }
                (count, chunks.with_chunk_info)
            }
            None => (1, false),
        };

        let batch_key = self.batch_key.as_ref().map(Key::to_schema_key);
        let mut chunks = Vec::with_capacity(total);
        for index in 0..total {
            let chunk_id = transaction_id.offset_nanos(index as u64);
            let chunk_info = with_chunk_info.then(|| schema::ChunkInfo {
                initial_transaction_id: transaction_id.to_schema(),
                index: index as u32,
                total: total as u32,
            });
            let data = self.data.to_schema(index);

            let mut bodies = BTreeMap::new();
            for node in &node_account_ids {
                let body = schema::TransactionBody {
                    transaction_id: chunk_id.to_schema(),
                    node_account_id: node.to_schema(),
                    transaction_fee: max_fee.to_tinybars().max(0) as u64,
                    valid_duration_seconds: self.valid_duration.as_secs() as i64,
                    memo: self.memo.clone(),
                    chunk_info: chunk_info.clone(),
                    batch_key: batch_key.clone(),
                    data: data.clone(),
                };
                bodies.insert(
                    *node,
                    SignedBody {
                        body_bytes: schema::encode(&body)?,
                        sig_map: schema::SignatureMap::default(),
                    },
                );
            }
            chunks.push(FrozenChunk {
                transaction_id: chunk_id,
                bodies,
            });
        }

        Ok(Frozen {
            node_account_ids,
            chunks,
        })
    }

    // ─── Sign ───

    pub fn sign(&mut self, key: PrivateKey) -> Result<&mut Self, Error> {
        self.sign_with_signer(&key)
    }

    /// Sign with a closure producing signatures for `public_key`.
    pub fn sign_with(
        &mut self,
        public_key: PublicKey,
        signer: impl Fn(&[u8]) -> Result<Vec<u8>, SignerError> + Send + Sync + 'static,
    ) -> Result<&mut Self, Error> {
        self.sign_with_signer(&FnSigner::new(public_key, signer))
    }

    /// Add `signer`'s signature to every body.
    ///
    /// Signing twice with the same public key is a no-op. Signatures that do
    /// not verify are rejected and nothing is added.
    pub fn sign_with_signer(&mut self, signer: &dyn Signer) -> Result<&mut Self, Error> {
        let Some(frozen) = self.frozen.as_mut() else {
            return Err(Error::illegal_state("transaction must be frozen before it is signed"));
        };
        let public_key = signer.public_key();
        if self.signers.contains(&public_key) {
            return Ok(self);
        }

        let mut signatures = Vec::new();
        for body in frozen.chunks.iter().flat_map(|c| c.bodies.values()) {
            let signature = signer.sign(&body.body_bytes)?;
            if !public_key.verify(&body.body_bytes, &signature) {
                return Err(SignerError::BadSignature(public_key.to_string()).into());
            }
            signatures.push(signature);
        }

        let bodies = frozen.chunks.iter_mut().flat_map(|c| c.bodies.values_mut());
        for (body, signature) in bodies.zip(signatures) {
            body.sig_map.sig_pair.push(schema::SignaturePair {
                pub_key_prefix: public_key.to_bytes_raw(),
                signature: public_key.to_signature_value(signature),
            });
        }
        self.signers.push(public_key);
        Ok(self)
    }

    /// Freeze with `client` and sign with its operator.
    pub fn sign_with_operator(&mut self, client: &Client) -> Result<&mut Self, Error> {
        let operator = client
            .operator()
            .ok_or_else(|| Error::config("client has no operator"))?;
        self.freeze_with(client)?;
        self.sign_with_signer(operator.signer().as_ref())
    }

    fn sign_with_operator_if_payer(&mut self, client: &Client) -> Result<(), Error> {
        let Some(operator) = client.operator() else {
            return Ok(());
        };
        if self.transaction_id.map(|id| id.account_id) == Some(operator.account_id) {
            self.sign_with_signer(operator.signer().as_ref())?;
        }
        Ok(())
    }

    // ─── Batch ───

    /// Prepare the transaction to be an inner transaction of a batch: set
    /// the batch key and node `0.0.0`, freeze and sign with the operator.
    pub fn batchify(&mut self, client: &Client, batch_key: impl Into<Key>) -> Result<&mut Self, Error> {
        self.require_not_frozen()?;
        self.batch_key = Some(batch_key.into());
        self.config.node_account_ids = Some(vec![BATCH_NODE_ACCOUNT_ID]);
        self.sign_with_operator(client)?;
        self.batchified = true;
        Ok(self)
    }

    /// Signed-transaction bytes and id of a batchified transaction.
    pub(crate) fn batch_inner(&self) -> Result<(TransactionId, Vec<u8>), Error> {
        let frozen = match &self.frozen {
            Some(frozen) if self.batchified => frozen,
            _ => return Err(Error::illegal_state("inner transaction must be batchified")),
        };
        let [chunk] = frozen.chunks.as_slice() else {
            return Err(Error::illegal_state("a chunked transaction cannot be batched"));
        };
        let body = chunk
            .bodies
            .get(&BATCH_NODE_ACCOUNT_ID)
            .ok_or_else(|| Error::illegal_state("inner transaction is not bound to node 0.0.0"))?;
        Ok((chunk.transaction_id, body.signed_transaction_bytes()?))
    }

    /// Envelope of the first chunk for `node_account_id`.
    pub(crate) fn envelope_for(&self, node_account_id: AccountId) -> Result<schema::Transaction, Error> {
        self.frozen
            .as_ref()
            .and_then(|f| f.chunks.first())
            .and_then(|c| c.bodies.get(&node_account_id))
            .ok_or_else(|| Error::illegal_state(format!("no body frozen for node {}", node_account_id)))?
            .envelope()
    }

    // ─── Execute ───

    /// Submit the transaction; for chunked transactions, every chunk.
    ///
    /// Returns the response of the first chunk.
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse, Error> {
        self.execute_with_timeout(client, None).await
    }

    pub async fn execute_with_timeout(
        &mut self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionResponse, Error> {
        let responses = self.execute_all_with_timeout(client, timeout).await?;
        responses
            .into_iter()
            .next()
            .ok_or_else(|| Error::illegal_state("transaction has no chunks"))
    }

    /// Submit every chunk in order, waiting for each chunk's receipt before
    /// the next one when there is more than one.
    pub async fn execute_all(&mut self, client: &Client) -> Result<Vec<TransactionResponse>, Error> {
        self.execute_all_with_timeout(client, None).await
    }

    pub async fn execute_all_with_timeout(
        &mut self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<Vec<TransactionResponse>, Error> {
        if self.batchified {
            return Err(Error::illegal_state(
                "a batchified transaction can only be executed inside a batch",
            ));
        }
        client.ensure_open()?;
        self.freeze_with(client)?;
        self.sign_with_operator_if_payer(client)?;

        let Some(frozen) = &self.frozen else {
            return Err(Error::illegal_state("transaction is not frozen"));
        };
        let total = frozen.chunks.len();
        let mut responses = Vec::with_capacity(total);

        for (index, chunk) in frozen.chunks.iter().enumerate() {
            let submit = SubmitChunk {
                config: &self.config,
                method: self.data.method(),
                node_account_ids: &frozen.node_account_ids,
                chunk,
            };
            let response = execute::execute(client, &submit, timeout).await?;
            if total > 1 {
                tracing::debug!(
                    transaction_id = %chunk.transaction_id,
                    chunk = index,
                    total,
                    "Waiting for chunk receipt"
                );
                response.get_receipt_with_timeout(client, timeout).await?;
            }
            responses.push(response);
        }
        Ok(responses)
    }

    /// Serialize every frozen body as a transaction list: chunk by chunk,
    /// nodes ascending within a chunk.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let Some(frozen) = &self.frozen else {
            return Err(Error::illegal_state("transaction must be frozen before it is serialized"));
        };
        let transactions = frozen
            .chunks
            .iter()
            .flat_map(|c| c.bodies.values())
            .map(SignedBody::envelope)
            .collect::<Result<Vec<_>, _>>()?;
        schema::encode(&schema::TransactionList { transactions })
    }
}

// ============================================================================
// Submission
// ============================================================================

/// One chunk of a frozen transaction, as driven by the attempt loop.
struct SubmitChunk<'a> {
    config: &'a RequestConfig,
    method: RpcMethod,
    node_account_ids: &'a [AccountId],
    chunk: &'a FrozenChunk,
}

impl SubmitChunk<'_> {
    fn body(&self, node_account_id: AccountId) -> Result<&SignedBody, Error> {
        self.chunk.bodies.get(&node_account_id).ok_or_else(|| {
            Error::illegal_state(format!("no body frozen for node {}", node_account_id))
        })
    }
}

impl Execute for SubmitChunk<'_> {
    type Response = schema::TransactionResponse;
    type Output = TransactionResponse;

    fn config(&self) -> &RequestConfig {
        self.config
    }

    fn node_account_ids(&self) -> &[AccountId] {
        self.node_account_ids
    }

    fn method(&self) -> RpcMethod {
        self.method
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.chunk.transaction_id)
    }

    fn make_request(&self, node_account_id: AccountId) -> Result<Vec<u8>, Error> {
        schema::encode(&self.body(node_account_id)?.envelope()?)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error> {
        schema::decode(bytes)
    }

    fn precheck_status(&self, response: &Self::Response) -> Status {
        Status::from_code(response.node_transaction_precheck_code)
    }

    fn make_output(
        &self,
        _response: Self::Response,
        node_account_id: AccountId,
    ) -> Result<Self::Output, Error> {
        let signed = self.body(node_account_id)?.signed_transaction_bytes()?;
        Ok(TransactionResponse {
            node_id: node_account_id,
            transaction_id: self.chunk.transaction_id,
            transaction_hash: Sha384::digest(&signed).to_vec(),
            validate_status: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use crate::types::{Timestamp, TopicId};

    fn tx_id() -> TransactionId {
        TransactionId::with_valid_start(AccountId::from_num(2), Timestamp::new(1_700_000_000, 0))
    }

    fn transfer() -> TransferTransaction {
        let mut tx = TransferTransaction::new();
        tx.hbar_transfer(AccountId::from_num(2), Hbar::new(-1))
            .unwrap()
            .hbar_transfer(AccountId::from_num(1001), Hbar::new(1))
            .unwrap();
        tx
    }

    fn client_with_operator(key: PrivateKey) -> Client {
        Client::builder()
            .network([
                ("127.0.0.1:50211", AccountId::from_num(3)),
                ("127.0.0.2:50211", AccountId::from_num(4)),
            ])
            .unwrap()
            .transport(MockTransport::new())
            .operator(AccountId::from_num(2), key)
            .build()
            .unwrap()
    }

    fn decode_bodies(tx: &TransferTransaction) -> Vec<schema::TransactionBody> {
        let list: schema::TransactionList = schema::decode(&tx.to_bytes().unwrap()).unwrap();
        list.transactions
            .iter()
            .map(|t| {
                let signed: schema::SignedTransaction =
                    schema::decode(&t.signed_transaction_bytes).unwrap();
                schema::decode(&signed.body_bytes).unwrap()
            })
            .collect()
    }

    // ========================================================================
    // Freeze
    // ========================================================================

    #[test]
    fn test_freeze_without_client_needs_nodes_and_id() {
        let mut tx = transfer();
        assert!(matches!(tx.freeze(), Err(Error::Config(_))));

        tx.node_account_ids([AccountId::from_num(3)]).unwrap();
        assert!(matches!(tx.freeze(), Err(Error::Config(_))));

        tx.transaction_id(tx_id()).unwrap();
        tx.freeze().unwrap();
        assert!(tx.is_frozen());
    }

    #[test]
    fn test_freeze_with_client_without_operator_needs_id() {
        let client = Client::builder()
            .network([("127.0.0.1:50211", AccountId::from_num(3))])
            .unwrap()
            .transport(MockTransport::new())
            .build()
            .unwrap();
        let mut tx = transfer();
        assert!(matches!(tx.freeze_with(&client), Err(Error::Config(_))));
        tx.transaction_id(tx_id()).unwrap();
        tx.freeze_with(&client).unwrap();
        assert_eq!(tx.get_node_account_ids().unwrap(), &[AccountId::from_num(3)]);
    }

    #[test]
    fn test_freeze_with_client_generates_id() {
        let client = client_with_operator(PrivateKey::generate_ed25519());
        let mut tx = transfer();
        tx.freeze_with(&client).unwrap();
        let id = tx.get_transaction_id().unwrap();
        assert_eq!(id.account_id, AccountId::from_num(2));
        assert!(id.valid_start < Timestamp::now());
        // a third of two nodes, rounded up
        assert_eq!(tx.get_node_account_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_frozen_rejects_mutation() {
        let mut tx = transfer();
        tx.node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .freeze()
            .unwrap();

        assert!(matches!(tx.memo("late"), Err(Error::IllegalState(_))));
        assert!(matches!(
            tx.hbar_transfer(AccountId::from_num(5), Hbar::new(1)),
            Err(Error::IllegalState(_))
        ));
        assert!(matches!(
            tx.node_account_ids([AccountId::from_num(4)]),
            Err(Error::IllegalState(_))
        ));
    }

    #[test]
    fn test_body_fields() {
        let mut tx = transfer();
        tx.node_account_ids([AccountId::from_num(3), AccountId::from_num(4)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .memo("hi")
            .unwrap()
            .max_transaction_fee(Hbar::new(3))
            .unwrap()
            .freeze()
            .unwrap();

        let bodies = decode_bodies(&tx);
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].node_account_id, AccountId::from_num(3).to_schema());
        assert_eq!(bodies[1].node_account_id, AccountId::from_num(4).to_schema());
        for body in &bodies {
            assert_eq!(body.memo, "hi");
            assert_eq!(body.transaction_fee, 300_000_000);
            assert_eq!(body.valid_duration_seconds, 120);
            assert_eq!(body.transaction_id, tx_id().to_schema());
            assert!(body.chunk_info.is_none());
        }
    }

    #[test]
    fn test_default_max_fee_per_type() {
        let mut tx = transfer();
        tx.node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .freeze()
            .unwrap();
        assert_eq!(decode_bodies(&tx)[0].transaction_fee, 200_000_000);
    }

    // ========================================================================
    // Sign
    // ========================================================================

    #[test]
    fn test_sign_requires_frozen() {
        let mut tx = transfer();
        let err = tx.sign(PrivateKey::generate_ed25519()).unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }

    #[test]
    fn test_sign_is_idempotent_per_key() {
        let a = PrivateKey::generate_ed25519();
        let b = PrivateKey::generate_ecdsa();
        let mut tx = transfer();
        tx.node_account_ids([AccountId::from_num(3), AccountId::from_num(4)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .freeze()
            .unwrap();
        tx.sign(a.clone()).unwrap().sign(b.clone()).unwrap().sign(a.clone()).unwrap();

        assert_eq!(tx.signers(), &[a.public_key(), b.public_key()]);
        let frozen = tx.frozen.as_ref().unwrap();
        for body in frozen.chunks.iter().flat_map(|c| c.bodies.values()) {
            assert_eq!(body.sig_map.sig_pair.len(), 2);
            let pair = &body.sig_map.sig_pair[0];
            assert_eq!(pair.pub_key_prefix, a.public_key().to_bytes_raw());
            let schema::SignatureValue::Ed25519(signature) = &pair.signature else {
                panic!("expected an ed25519 signature");
            };
            assert!(a.public_key().verify(&body.body_bytes, signature));
        }
    }

    #[test]
    fn test_sign_rejects_bad_signature() {
        let key = PrivateKey::generate_ed25519();
        let other = PrivateKey::generate_ed25519();
        let mut tx = transfer();
        tx.node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .freeze()
            .unwrap();
        let err = tx
            .sign_with(key.public_key(), move |message| other.sign(message))
            .unwrap_err();
        assert!(matches!(err, Error::Signing(SignerError::BadSignature(_))));
        assert!(tx.signers().is_empty());
    }

    #[test]
    fn test_sign_with_operator() {
        let key = PrivateKey::generate_ed25519();
        let client = client_with_operator(key.clone());
        let mut tx = transfer();
        tx.sign_with_operator(&client).unwrap();
        assert!(tx.is_frozen());
        assert_eq!(tx.signers(), &[key.public_key()]);
    }

    // ========================================================================
    // Chunks
    // ========================================================================

    #[test]
    fn test_chunk_ids_and_info() {
        let mut tx = TopicMessageSubmitTransaction::new();
        tx.topic_id(TopicId::from_num(77))
            .unwrap()
            .message(vec![7u8; 2500])
            .unwrap()
            .node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap()
            .freeze()
            .unwrap();

        let frozen = tx.frozen.as_ref().unwrap();
        assert_eq!(frozen.chunks.len(), 3);
        for (k, chunk) in frozen.chunks.iter().enumerate() {
            assert_eq!(chunk.transaction_id, tx_id().offset_nanos(k as u64));
            let body: schema::TransactionBody =
                schema::decode(&chunk.bodies[&AccountId::from_num(3)].body_bytes).unwrap();
            let info = body.chunk_info.unwrap();
            assert_eq!(info.index, k as u32);
            assert_eq!(info.total, 3);
            assert_eq!(info.initial_transaction_id, tx_id().to_schema());
        }
    }

    #[test]
    fn test_chunk_limit_at_freeze() {
        let mut tx = TopicMessageSubmitTransaction::new();
        tx.message(vec![0u8; 1024 * 3 + 1])
            .unwrap()
            .max_chunks(3)
            .unwrap()
            .node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .transaction_id(tx_id())
            .unwrap();
        let err = tx.freeze().unwrap_err();
        assert!(matches!(err, Error::MaxChunksExceeded { chunks: 4, max: 3 }));
        assert!(!tx.is_frozen());
    }

    // ========================================================================
    // Batch
    // ========================================================================

    #[test]
    fn test_batchify() {
        let key = PrivateKey::generate_ed25519();
        let client = client_with_operator(key.clone());
        let mut tx = transfer();
        tx.batchify(&client, key.public_key()).unwrap();

        assert!(tx.is_batchified());
        assert_eq!(tx.get_node_account_ids().unwrap(), &[BATCH_NODE_ACCOUNT_ID]);
        assert_eq!(tx.get_batch_key(), Some(&Key::Single(key.public_key())));
        assert_eq!(tx.signers(), &[key.public_key()]);
        let (id, bytes) = tx.batch_inner().unwrap();
        assert_eq!(Some(id), tx.get_transaction_id());
        let signed: schema::SignedTransaction = schema::decode(&bytes).unwrap();
        assert_eq!(signed.sig_map.sig_pair.len(), 1);
    }

    #[tokio::test]
    async fn test_batchified_cannot_execute_directly() {
        let key = PrivateKey::generate_ed25519();
        let client = client_with_operator(key.clone());
        let mut tx = transfer();
        tx.batchify(&client, key.public_key()).unwrap();
        let err = tx.execute(&client).await.unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }

    #[test]
    fn test_to_bytes_requires_frozen() {
        assert!(matches!(transfer().to_bytes(), Err(Error::IllegalState(_))));
    }
}
