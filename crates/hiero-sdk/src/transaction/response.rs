//! What a node says when it accepts a transaction.

use std::time::Duration;

use crate::client::Client;
use crate::error::Error;
use crate::query::{TransactionReceipt, TransactionReceiptQuery, TransactionRecord, TransactionRecordQuery};
use crate::types::{AccountId, TransactionId};

/// Handle to a submitted transaction.
///
/// Acceptance by a node only means the transaction passed precheck; its
/// outcome is in the receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Node the transaction was submitted to.
    pub node_id: AccountId,
    pub transaction_id: TransactionId,
    /// SHA-384 of the submitted signed transaction.
    pub transaction_hash: Vec<u8>,
    /// Whether [`get_receipt`](Self::get_receipt) and
    /// [`get_record`](Self::get_record) fail on a non-`SUCCESS` status.
    pub validate_status: bool,
}

impl TransactionResponse {
    pub fn validate_status(&mut self, validate: bool) -> &mut Self {
        self.validate_status = validate;
        self
    }

    /// A receipt query for this transaction, bound to the node it was
    /// submitted to.
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        let mut query = TransactionReceiptQuery::new();
        query
            .transaction_id(self.transaction_id)
            .node_account_ids([self.node_id]);
        query
    }

    /// A record query for this transaction, bound to the node it was
    /// submitted to.
    pub fn get_record_query(&self) -> TransactionRecordQuery {
        let mut query = TransactionRecordQuery::new();
        query
            .transaction_id(self.transaction_id)
            .node_account_ids([self.node_id]);
        query
    }

    /// Wait for the receipt.
    ///
    /// With `validate_status` set (the default), a receipt whose status is
    /// not `SUCCESS` is returned as [`Error::ReceiptStatus`].
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, Error> {
        self.get_receipt_with_timeout(client, None).await
    }

    pub async fn get_receipt_with_timeout(
        &self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt, Error> {
        let receipt = self
            .get_receipt_query()
            .execute_with_timeout(client, timeout)
            .await?;
        receipt.validate_status(self.validate_status)?;
        Ok(receipt)
    }

    /// Wait for the receipt, then fetch the record.
    pub async fn get_record(&self, client: &Client) -> Result<TransactionRecord, Error> {
        self.get_receipt(client).await?;
        self.get_record_query().execute(client).await
    }
}
