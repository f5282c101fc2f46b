//! Queries: read-only requests answered by a single node.
//!
//! Every query is a [`Query<D>`] over a body type implementing
//! [`QueryData`]; the concrete queries are aliases such as
//! [`AccountBalanceQuery`].
//!
//! # Payment
//!
//! Most queries cost hbar. Unless an explicit payment is set, executing a
//! paid query first asks a node for the cost (free), checks it against the
//! maximum payment, then attaches one signed transfer operator → node per
//! candidate node. Receipt and balance queries are free.
//!
//! ```rust,no_run
//! use hiero_sdk::*;
//!
//! # async fn example(client: &Client) -> Result<(), Error> {
//! let info = AccountInfoQuery::new()
//!     .account_id(AccountId::from_num(1001))
//!     .max_query_payment(Hbar::new(1))
//!     .execute(client)
//!     .await?;
//! println!("balance: {}", info.balance);
//! # Ok(())
//! # }
//! ```

mod account_balance;
mod account_info;
mod file_info;
mod transaction_receipt;
mod transaction_record;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::client::Client;
use crate::client::execute::{self, Execute, RequestConfig};
use crate::error::Error;
use crate::schema::{self, RpcMethod};
use crate::transaction::TransferTransaction;
use crate::types::{AccountId, Hbar, LedgerId, Status, TransactionId};

pub use account_balance::{AccountBalance, AccountBalanceQuery, AccountBalanceQueryData};
pub use account_info::{AccountInfo, AccountInfoQuery, AccountInfoQueryData};
pub use file_info::{FileInfo, FileInfoQuery, FileInfoQueryData};
pub use transaction_receipt::{
    TransactionReceipt, TransactionReceiptQuery, TransactionReceiptQueryData,
};
pub use transaction_record::{TransactionRecord, TransactionRecordQuery, TransactionRecordQueryData};

/// The body of one kind of query.
pub trait QueryData: Clone + fmt::Debug + Send + Sync {
    type Output;

    fn method(&self) -> RpcMethod;

    /// Wire body. Fails if a required field is missing.
    fn to_schema(&self) -> Result<schema::QueryData, Error>;

    /// Whether answering costs hbar.
    fn is_paid(&self) -> bool {
        true
    }

    /// Transaction the query is about, for logs and errors.
    fn transaction_id(&self) -> Option<TransactionId> {
        None
    }

    /// Extra precheck codes that mean "ask again".
    fn should_retry_precheck(&self, _status: Status) -> bool {
        false
    }

    /// Ask again although the precheck passed.
    fn should_retry(&self, _data: &schema::ResponseData) -> bool {
        false
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error>;

    fn validate_checksums(&self, _ledger_id: &LedgerId) -> Result<(), Error> {
        Ok(())
    }
}

/// A query with body `D`.
#[derive(Clone, Debug)]
pub struct Query<D> {
    data: D,
    config: RequestConfig,
    payment_amount: Option<Hbar>,
    max_query_payment: Option<Hbar>,
}

impl<D: QueryData + Default> Default for Query<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: QueryData + Default> Query<D> {
    pub fn new() -> Self {
        Self::from_data(D::default())
    }
}

impl<D: QueryData> Query<D> {
    pub(crate) fn from_data(data: D) -> Self {
        Self {
            data,
            config: RequestConfig::default(),
            payment_amount: None,
            max_query_payment: None,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    // ─── Settings ───

    pub fn node_account_ids(&mut self, ids: impl IntoIterator<Item = AccountId>) -> &mut Self {
        self.config.node_account_ids = Some(ids.into_iter().collect());
        self
    }

    /// Pay exactly this much instead of asking for the cost first.
    pub fn payment_amount(&mut self, amount: Hbar) -> &mut Self {
        self.payment_amount = Some(amount);
        self
    }

    /// Refuse to pay more than this for the query.
    pub fn max_query_payment(&mut self, max: Hbar) -> &mut Self {
        self.max_query_payment = Some(max);
        self
    }

    pub fn max_attempts(&mut self, attempts: u32) -> &mut Self {
        self.config.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn node_backoff(&mut self, min: Duration, max: Duration) -> &mut Self {
        self.config.min_backoff = Some(min.min(max));
        self.config.max_backoff = Some(max);
        self
    }

    pub fn grpc_deadline(&mut self, deadline: Duration) -> &mut Self {
        self.config.grpc_deadline = Some(deadline);
        self
    }

    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn get_node_account_ids(&self) -> Option<&[AccountId]> {
        self.config.node_account_ids.as_deref()
    }

    pub fn get_payment_amount(&self) -> Option<Hbar> {
        self.payment_amount
    }

    pub fn get_max_query_payment(&self) -> Option<Hbar> {
        self.max_query_payment
    }

    // ─── Execute ───

    fn prepare(&self, client: &Client) -> Result<Vec<AccountId>, Error> {
        client.ensure_open()?;
        if client.auto_validate_checksums()
            && let Some(ledger_id) = client.ledger_id()
        {
            self.data.validate_checksums(&ledger_id)?;
        }
        let node_ids = match &self.config.node_account_ids {
            Some(ids) => ids.clone(),
            None => client.node_ids_for_request(),
        };
        if node_ids.is_empty() {
            return Err(Error::config("query has no node account ids"));
        }
        Ok(node_ids)
    }

    /// What a node charges to answer this query. Free queries cost zero
    /// without asking.
    pub async fn get_cost(&self, client: &Client) -> Result<Hbar, Error> {
        let node_ids = self.prepare(client)?;
        self.cost_with(client, node_ids, None).await
    }

    async fn cost_with(
        &self,
        client: &Client,
        node_ids: Vec<AccountId>,
        timeout: Option<Duration>,
    ) -> Result<Hbar, Error> {
        if !self.data.is_paid() {
            return Ok(Hbar::ZERO);
        }
        let request = QueryRequest {
            query: self,
            node_ids,
            payments: BTreeMap::new(),
            response_type: schema::ResponseType::CostAnswer,
        };
        let response = execute::execute(client, &request, timeout).await?;
        Ok(Hbar::from_tinybars(response.header.cost.min(i64::MAX as u64) as i64))
    }

    pub async fn execute(&self, client: &Client) -> Result<D::Output, Error> {
        self.execute_with_timeout(client, None).await
    }

    pub async fn execute_with_timeout(
        &self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<D::Output, Error> {
        let node_ids = self.prepare(client)?;

        let payments = if self.data.is_paid() {
            if client.operator().is_none() {
                return Err(Error::config("a paid query requires a client operator"));
            }
            let amount = match self.payment_amount {
                Some(amount) => amount,
                None => {
                    let cost = self.cost_with(client, node_ids.clone(), timeout).await?;
                    let max = self
                        .max_query_payment
                        .unwrap_or_else(|| client.default_max_query_payment());
                    if cost > max {
                        return Err(Error::MaxQueryPaymentExceeded { cost, max });
                    }
                    cost
                }
            };
            make_payments(client, &node_ids, amount)?
        } else {
            BTreeMap::new()
        };

        let request = QueryRequest {
            query: self,
            node_ids,
            payments,
            response_type: schema::ResponseType::AnswerOnly,
        };
        let response = execute::execute(client, &request, timeout).await?;
        self.data.make_output(response.data)
    }
}

/// One payment per node: a transfer of `amount` from the operator to the
/// node, all sharing a transaction id, signed by the operator.
fn make_payments(
    client: &Client,
    node_ids: &[AccountId],
    amount: Hbar,
) -> Result<BTreeMap<AccountId, schema::Transaction>, Error> {
    let operator = client
        .operator()
        .ok_or_else(|| Error::config("a paid query requires a client operator"))?;
    let transaction_id = TransactionId::generate(operator.account_id);
    let debit = amount
        .checked_neg()
        .ok_or_else(|| Error::config(format!("query payment {} out of range", amount)))?;

    let mut payments = BTreeMap::new();
    for node in node_ids {
        let mut payment = TransferTransaction::new();
        payment
            .hbar_transfer(operator.account_id, debit)?
            .hbar_transfer(*node, amount)?
            .node_account_ids([*node])?
            .transaction_id(transaction_id)?
            .freeze()?
            .sign_with_signer(operator.signer().as_ref())?;
        payments.insert(*node, payment.envelope_for(*node)?);
    }
    Ok(payments)
}

// ============================================================================
// Execution
// ============================================================================

struct QueryRequest<'a, D> {
    query: &'a Query<D>,
    node_ids: Vec<AccountId>,
    payments: BTreeMap<AccountId, schema::Transaction>,
    response_type: schema::ResponseType,
}

impl<D: QueryData> Execute for QueryRequest<'_, D> {
    type Response = schema::Response;
    type Output = schema::Response;

    fn config(&self) -> &RequestConfig {
        &self.query.config
    }

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_ids
    }

    fn method(&self) -> RpcMethod {
        self.query.data.method()
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.query.data.transaction_id()
    }

    fn make_request(&self, node_account_id: AccountId) -> Result<Vec<u8>, Error> {
        let query = schema::Query {
            header: schema::QueryHeader {
                payment: self.payments.get(&node_account_id).cloned(),
                response_type: self.response_type,
            },
            data: self.query.data.to_schema()?,
        };
        schema::encode(&query)
    }

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error> {
        schema::decode(bytes)
    }

    fn precheck_status(&self, response: &Self::Response) -> Status {
        Status::from_code(response.header.node_transaction_precheck_code)
    }

    fn should_retry_precheck(&self, status: Status) -> bool {
        self.query.data.should_retry_precheck(status)
    }

    fn should_retry(&self, response: &Self::Response) -> bool {
        self.response_type == schema::ResponseType::AnswerOnly
            && self.query.data.should_retry(&response.data)
    }

    fn make_output(
        &self,
        response: Self::Response,
        _node_account_id: AccountId,
    ) -> Result<Self::Output, Error> {
        Ok(response)
    }
}

/// Receipt statuses meaning "not final yet".
pub(crate) fn is_pending_receipt_status(status: Status) -> bool {
    matches!(
        status,
        Status::Busy
            | Status::Unknown
            | Status::Ok
            | Status::ReceiptNotFound
            | Status::RecordNotFound
    )
}

/// Precheck codes a receipt or record query waits out.
pub(crate) fn is_pending_precheck(status: Status) -> bool {
    matches!(
        status,
        Status::Unknown | Status::ReceiptNotFound | Status::RecordNotFound
    )
}
