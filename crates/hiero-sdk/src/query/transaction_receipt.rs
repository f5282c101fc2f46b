//! Receipt of a submitted transaction.

use super::{Query, QueryData, is_pending_precheck, is_pending_receipt_status};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{
    AccountId, ContractId, FileId, LedgerId, ScheduleId, Status, TokenId, TopicId, TransactionId,
};

/// Outcome of a transaction once it reached consensus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Transaction the receipt belongs to, when known.
    pub transaction_id: Option<TransactionId>,
    pub status: Status,
    pub account_id: Option<AccountId>,
    pub file_id: Option<FileId>,
    pub contract_id: Option<ContractId>,
    pub topic_id: Option<TopicId>,
    pub token_id: Option<TokenId>,
    pub schedule_id: Option<ScheduleId>,
    pub scheduled_transaction_id: Option<TransactionId>,
    pub topic_sequence_number: u64,
    pub topic_running_hash: Option<Vec<u8>>,
    pub total_supply: u64,
    pub serials: Vec<i64>,
    pub duplicates: Vec<TransactionReceipt>,
    pub children: Vec<TransactionReceipt>,
}

impl TransactionReceipt {
    pub(crate) fn from_schema(
        receipt: &schema::TransactionReceipt,
        transaction_id: Option<TransactionId>,
    ) -> Result<Self, Error> {
        Ok(Self {
            transaction_id,
            status: Status::from_code(receipt.status),
            account_id: receipt
                .account_id
                .as_ref()
                .map(AccountId::from_schema)
                .transpose()?,
            file_id: receipt.file_id.as_ref().map(FileId::from_schema),
            contract_id: receipt
                .contract_id
                .as_ref()
                .map(ContractId::from_schema)
                .transpose()?,
            topic_id: receipt.topic_id.as_ref().map(TopicId::from_schema),
            token_id: receipt.token_id.as_ref().map(TokenId::from_schema),
            schedule_id: receipt.schedule_id.as_ref().map(ScheduleId::from_schema),
            scheduled_transaction_id: receipt
                .scheduled_transaction_id
                .as_ref()
                .map(TransactionId::from_schema)
                .transpose()?,
            topic_sequence_number: receipt.topic_sequence_number,
            topic_running_hash: (!receipt.topic_running_hash.is_empty())
                .then(|| receipt.topic_running_hash.clone()),
            total_supply: receipt.total_supply,
            serials: receipt.serial_numbers.clone(),
            duplicates: Vec::new(),
            children: Vec::new(),
        })
    }

    /// With `validate` set, fail unless the status is `SUCCESS`.
    pub fn validate_status(&self, validate: bool) -> Result<&Self, Error> {
        if validate && self.status != Status::Success {
            return Err(Error::ReceiptStatus {
                status: self.status,
                transaction_id: self.transaction_id,
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionReceiptQueryData {
    transaction_id: Option<TransactionId>,
    include_duplicates: bool,
    include_children: bool,
    validate_status: bool,
}

/// Wait for and fetch the receipt of a transaction. Free.
///
/// The query keeps asking while the receipt is not final, within the
/// attempt and timeout limits.
pub type TransactionReceiptQuery = Query<TransactionReceiptQueryData>;

impl TransactionReceiptQuery {
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

    /// Fail with [`Error::ReceiptStatus`] unless the receipt reports `SUCCESS`.
    pub fn validate_status(&mut self, value: bool) -> &mut Self {
        self.data_mut().validate_status = value;
        self
    }

    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.data().transaction_id
    }
}

impl QueryData for TransactionReceiptQueryData {
    type Output = TransactionReceipt;

    fn method(&self) -> RpcMethod {
        methods::GET_TRANSACTION_RECEIPTS
    }

    fn to_schema(&self) -> Result<schema::QueryData, Error> {
        let transaction_id = self
            .transaction_id
            .ok_or_else(|| Error::config("receipt query needs a transaction id"))?;
        Ok(schema::QueryData::TransactionGetReceipt {
            transaction_id: transaction_id.to_schema(),
            include_duplicates: self.include_duplicates,
            include_child_receipts: self.include_children,
        })
    }

    fn is_paid(&self) -> bool {
        false
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    fn should_retry_precheck(&self, status: Status) -> bool {
        is_pending_precheck(status)
    }

    fn should_retry(&self, data: &schema::ResponseData) -> bool {
        match data {
            schema::ResponseData::TransactionGetReceipt { receipt, .. } => {
                is_pending_receipt_status(Status::from_code(receipt.status))
            }
            _ => false,
        }
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error> {
        let schema::ResponseData::TransactionGetReceipt {
            receipt,
            duplicate_receipts,
            child_receipts,
        } = data
        else {
            return Err(Error::codec("expected a receipt answer"));
        };

        let convert = |r: &schema::TransactionReceipt| TransactionReceipt::from_schema(r, self.transaction_id);
        let mut output = convert(&receipt)?;
        output.duplicates = duplicate_receipts.iter().map(convert).collect::<Result<_, _>>()?;
        output.children = child_receipts.iter().map(convert).collect::<Result<_, _>>()?;
        output.validate_status(self.validate_status)?;
        Ok(output)
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.transaction_id {
            id.account_id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
