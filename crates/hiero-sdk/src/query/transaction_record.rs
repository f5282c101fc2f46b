//! Record of a submitted transaction.

use super::{Query, QueryData, TransactionReceipt, is_pending_precheck, is_pending_receipt_status};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::transaction::HbarTransfer;
use crate::types::{AccountId, Hbar, LedgerId, Status, Timestamp, TransactionId};

/// Full consensus record of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    /// SHA-384 of the signed transaction.
    pub transaction_hash: Vec<u8>,
    pub consensus_timestamp: Option<Timestamp>,
    pub transaction_id: TransactionId,
    pub transaction_memo: String,
    /// Fee actually charged.
    pub transaction_fee: Hbar,
    pub transfers: Vec<HbarTransfer>,
    pub duplicates: Vec<TransactionRecord>,
    pub children: Vec<TransactionRecord>,
}

impl TransactionRecord {
    pub(crate) fn from_schema(record: &schema::TransactionRecord) -> Result<Self, Error> {
        let transaction_id = TransactionId::from_schema(&record.transaction_id)?;
        let transfers = record
            .transfer_list
            .account_amounts
            .iter()
            .map(|aa| {
                Ok(HbarTransfer {
                    account_id: AccountId::from_schema(&aa.account_id)?,
                    amount: Hbar::from_tinybars(aa.amount),
                    is_approved: aa.is_approval,
                })
            })
            .collect::<Result<_, Error>>()?;

        Ok(Self {
            receipt: TransactionReceipt::from_schema(&record.receipt, Some(transaction_id))?,
            transaction_hash: record.transaction_hash.clone(),
            consensus_timestamp: record.consensus_timestamp.as_ref().map(Timestamp::from_schema),
            transaction_id,
            transaction_memo: record.memo.clone(),
            transaction_fee: Hbar::from_tinybars(record.transaction_fee.min(i64::MAX as u64) as i64),
            transfers,
            duplicates: Vec::new(),
            children: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionRecordQueryData {
    transaction_id: Option<TransactionId>,
    include_duplicates: bool,
    include_children: bool,
    validate_status: bool,
}

/// Fetch the record of a transaction. Paid.
///
/// Like the receipt query, it waits until the outcome is final.
pub type TransactionRecordQuery = Query<TransactionRecordQueryData>;

impl TransactionRecordQuery {
    pub fn transaction_id(&mut self, id: TransactionId) -> &mut Self {
        self.data_mut().transaction_id = Some(id);
        self
    }

    pub fn include_duplicates(&mut self, value: bool) -> &mut Self {
        self.data_mut().include_duplicates = value;
        self
    }

    pub fn include_children(&mut self, value: bool) -> &mut Self {
        self.data_mut().include_children = value;
        self
    }

    /// Fail with [`Error::ReceiptStatus`] unless the record's receipt reports
    /// `SUCCESS`.
    pub fn validate_status(&mut self, value: bool) -> &mut Self {
        self.data_mut().validate_status = value;
        self
    }

    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.data().transaction_id
    }
}

impl QueryData for TransactionRecordQueryData {
    type Output = TransactionRecord;

    fn method(&self) -> RpcMethod {
        methods::GET_TX_RECORD_BY_TX_ID
    }

    fn to_schema(&self) -> Result<schema::QueryData, Error> {
        let transaction_id = self
            .transaction_id
            .ok_or_else(|| Error::config("record query needs a transaction id"))?;
        Ok(schema::QueryData::TransactionGetRecord {
            transaction_id: transaction_id.to_schema(),
            include_duplicates: self.include_duplicates,
            include_child_records: self.include_children,
        })
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    fn should_retry_precheck(&self, status: Status) -> bool {
        is_pending_precheck(status)
    }

    fn should_retry(&self, data: &schema::ResponseData) -> bool {
        match data {
            schema::ResponseData::TransactionGetRecord { record, .. } => {
                is_pending_receipt_status(Status::from_code(record.receipt.status))
            }
            _ => false,
        }
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error> {
        let schema::ResponseData::TransactionGetRecord {
            record,
            duplicate_records,
            child_records,
        } = data
        else {
            return Err(Error::codec("expected a record answer"));
        };

        let mut output = TransactionRecord::from_schema(&record)?;
        output.duplicates = duplicate_records
            .iter()
            .map(TransactionRecord::from_schema)
            .collect::<Result<_, _>>()?;
        output.children = child_records
            .iter()
            .map(TransactionRecord::from_schema)
            .collect::<Result<_, _>>()?;
        output.receipt.validate_status(self.validate_status)?;
        Ok(output)
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.transaction_id {
            id.account_id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
