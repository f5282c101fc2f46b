//! Scripted in-process transport for tests.
//!
//! [`MockTransport`] answers every call without touching the network. Replies
//! are scripted per node address and consumed in order; once a node's script
//! runs out, a fallback responder answers (by default, a well-behaved node).
//!
//! # Features
//!
//! - **Scripted replies**: precheck codes, query answers, receipts, raw bytes
//! - **Failure injection**: transport errors, refused connections, hung calls
//! - **Delays**: any reply can be delayed
//! - **Request log**: every call with its node, method, body and time
//!
//! # Example
//!
//! ```rust
//! use hiero_sdk::transport::mock::{MockReply, MockTransport};
//! use hiero_sdk::Status;
//!
//! let mock = MockTransport::new();
//! mock.push("127.0.0.1:50211", MockReply::precheck(Status::Busy));
//! mock.push("127.0.0.1:50211", MockReply::precheck(Status::Ok));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;

use super::{Channel, Transport};
use crate::error::TransportError;
use crate::schema::{self, RpcMethod};
use crate::types::{Endpoint, Hbar, Status};

type Responder = dyn Fn(&MockRequest) -> MockReply + Send + Sync;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// MockReply
// ============================================================================

/// What a mock node answers to one call.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// A transaction submission answer.
    Transaction(schema::TransactionResponse),
    /// A query answer.
    Query(schema::Response),
    /// Raw response bytes.
    Raw(Vec<u8>),
    /// The call fails at the transport level.
    Fail(String),
    /// The node reports gRPC `UNAVAILABLE`.
    Unavailable,
    /// The call never completes.
    Hang,
    /// Another reply, delivered after a delay.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// Answer a transaction with a precheck code.
    pub fn precheck(status: Status) -> Self {
        Self::Transaction(schema::TransactionResponse {
            node_transaction_precheck_code: status.code(),
            cost: 0,
        })
    }

    /// Answer a query with a precheck code and body.
    pub fn query(precheck: Status, data: schema::ResponseData) -> Self {
        Self::Query(schema::Response {
            header: schema::ResponseHeader {
                node_transaction_precheck_code: precheck.code(),
                response_type: schema::ResponseType::AnswerOnly,
                cost: 0,
            },
            data,
        })
    }

    /// Answer a cost query.
    pub fn cost(cost: Hbar) -> Self {
        Self::Query(schema::Response {
            header: schema::ResponseHeader {
                node_transaction_precheck_code: Status::Ok.code(),
                response_type: schema::ResponseType::CostAnswer,
                cost: cost.to_tinybars().max(0) as u64,
            },
            data: schema::ResponseData::Empty,
        })
    }

    /// Answer a receipt query with a receipt of the given status.
    pub fn receipt(status: Status) -> Self {
        Self::receipt_with(schema::TransactionReceipt {
            status: status.code(),
            ..Default::default()
        })
    }

    /// Answer a receipt query with a full receipt.
    pub fn receipt_with(receipt: schema::TransactionReceipt) -> Self {
        Self::query(
            Status::Ok,
            schema::ResponseData::TransactionGetReceipt {
                receipt,
                duplicate_receipts: Vec::new(),
                child_receipts: Vec::new(),
            },
        )
    }

    /// Deliver this reply after `delay`.
    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }

    /// The answer of a healthy node with nothing scripted.
    ///
    /// Transactions pass precheck; cost queries cost `cost`; receipt and
    /// record queries report `SUCCESS`; balance queries report zero.
    pub fn well_behaved(request: &MockRequest, cost: Hbar) -> Self {
        if !request.method.is_query() {
            return Self::precheck(Status::Ok);
        }
        let Some(query) = request.query() else {
            return Self::Fail(format!("undecodable query to {}", request.method));
        };
        if query.header.response_type == schema::ResponseType::CostAnswer {
            return Self::cost(cost);
        }
        match query.data {
            schema::QueryData::TransactionGetReceipt { .. } => Self::receipt(Status::Success),
            schema::QueryData::TransactionGetRecord { transaction_id, .. } => Self::query(
                Status::Ok,
                schema::ResponseData::TransactionGetRecord {
                    record: schema::TransactionRecord {
                        receipt: schema::TransactionReceipt {
                            status: Status::Success.code(),
                            ..Default::default()
                        },
                        transaction_hash: Vec::new(),
                        consensus_timestamp: None,
                        transaction_id,
                        memo: String::new(),
                        transaction_fee: 0,
                        transfer_list: schema::TransferList::default(),
                    },
                    duplicate_records: Vec::new(),
                    child_records: Vec::new(),
                },
            ),
            schema::QueryData::CryptoGetAccountBalance {
                account_id: Some(account_id),
                ..
            } => Self::query(
                Status::Ok,
                schema::ResponseData::CryptoGetAccountBalance {
                    account_id,
                    balance: 0,
                },
            ),
            _ => Self::Fail(format!("no scripted reply for {}", request.method)),
        }
    }
}

// ============================================================================
// MockRequest
// ============================================================================

/// One call received by the mock.
#[derive(Clone, Debug)]
pub struct MockRequest {
    /// `host:port` of the node called.
    pub address: String,
    pub method: RpcMethod,
    pub body: Vec<u8>,
    pub at: Instant,
}

impl MockRequest {
    /// The submitted transaction's signed envelope, if this is a submission.
    pub fn signed_transaction(&self) -> Option<schema::SignedTransaction> {
        let transaction: schema::Transaction = schema::decode(&self.body).ok()?;
        schema::decode(&transaction.signed_transaction_bytes).ok()
    }

    /// The submitted transaction body, if this is a submission.
    pub fn transaction_body(&self) -> Option<schema::TransactionBody> {
        schema::decode(&self.signed_transaction()?.body_bytes).ok()
    }

    /// The query, if this is a query call.
    pub fn query(&self) -> Option<schema::Query> {
        schema::decode(&self.body).ok()
    }
}

// ============================================================================
// MockTransport
// ============================================================================

#[derive(Default)]
struct MockState {
    scripts: Mutex<HashMap<String, VecDeque<MockReply>>>,
    fallback: Mutex<Option<Arc<Responder>>>,
    refused: Mutex<HashSet<String>>,
    requests: Mutex<Vec<MockRequest>>,
    connects: Mutex<HashMap<String, usize>>,
    cost: Mutex<Hbar>,
}

/// In-process [`Transport`] with scripted replies.
///
/// Cloning yields a handle to the same state, so a test can keep one handle
/// while the client owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next unanswered call to `address`.
    pub fn push(&self, address: &str, reply: MockReply) {
        lock(&self.state.scripts)
            .entry(address.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queue several replies for `address`, in order.
    pub fn push_all(&self, address: &str, replies: impl IntoIterator<Item = MockReply>) {
        for reply in replies {
            self.push(address, reply);
        }
    }

    /// Answer calls with an empty script using `responder`.
    pub fn set_fallback(&self, responder: impl Fn(&MockRequest) -> MockReply + Send + Sync + 'static) {
        *lock(&self.state.fallback) = Some(Arc::new(responder));
    }

    /// Cost reported by the default responder for cost queries.
    pub fn set_query_cost(&self, cost: Hbar) {
        *lock(&self.state.cost) = cost;
    }

    /// Refuse to open channels to `address`.
    pub fn refuse_connections(&self, address: &str) {
        lock(&self.state.refused).insert(address.to_string());
    }

    /// Every call received so far, in arrival order.
    pub fn requests(&self) -> Vec<MockRequest> {
        lock(&self.state.requests).clone()
    }

    /// Calls received by `address`.
    pub fn requests_to(&self, address: &str) -> Vec<MockRequest> {
        lock(&self.state.requests)
            .iter()
            .filter(|r| r.address == address)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, address: &str) -> usize {
        lock(&self.state.requests)
            .iter()
            .filter(|r| r.address == address)
            .count()
    }

    /// Total calls received across all addresses.
    pub fn total_calls(&self) -> usize {
        lock(&self.state.requests).len()
    }

    /// Number of channels opened to `address`.
    pub fn connect_count(&self, address: &str) -> usize {
        lock(&self.state.connects).get(address).copied().unwrap_or(0)
    }

    /// Forget requests and scripts.
    pub fn reset(&self) {
        lock(&self.state.scripts).clear();
        lock(&self.state.requests).clear();
        lock(&self.state.connects).clear();
        lock(&self.state.refused).clear();
        *lock(&self.state.fallback) = None;
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.total_calls())
            .finish()
    }
}

impl Transport for MockTransport {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Channel>, TransportError> {
        let address = endpoint.to_string();
        if lock(&self.state.refused).contains(&address) {
            return Err(TransportError::Connect {
                address,
                message: "connection refused".to_string(),
            });
        }
        *lock(&self.state.connects).entry(address.clone()).or_default() += 1;
        Ok(Arc::new(MockChannel {
            address,
            state: self.state.clone(),
        }))
    }
}

struct MockChannel {
    address: String,
    state: Arc<MockState>,
}

impl std::fmt::Debug for MockChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChannel")
            .field("address", &self.address)
            .finish()
    }
}

impl MockChannel {
    fn next_reply(&self, request: &MockRequest) -> MockReply {
        if let Some(reply) = lock(&self.state.scripts)
            .get_mut(&self.address)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        let fallback = lock(&self.state.fallback).clone();
        match fallback {
            Some(responder) => responder(request),
            None => MockReply::well_behaved(request, *lock(&self.state.cost)),
        }
    }

    async fn call(&self, method: RpcMethod, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let request = MockRequest {
            address: self.address.clone(),
            method,
            body,
            at: Instant::now(),
        };
        let mut reply = self.next_reply(&request);
        lock(&self.state.requests).push(request);

        loop {
            return match reply {
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                    continue;
                }
                MockReply::Hang => futures::future::pending().await,
                MockReply::Fail(message) => Err(TransportError::Request {
                    address: self.address.clone(),
                    message,
                }),
                MockReply::Unavailable => Err(TransportError::GrpcStatus {
                    address: self.address.clone(),
                    code: 14,
                    message: "unavailable".to_string(),
                }),
                MockReply::Raw(bytes) => Ok(bytes),
                MockReply::Transaction(response) => schema::encode(&response).map_err(|e| self.frame_error(e)),
                MockReply::Query(response) => schema::encode(&response).map_err(|e| self.frame_error(e)),
            };
        }
    }

    fn frame_error(&self, err: impl std::fmt::Display) -> TransportError {
        TransportError::Frame {
            address: self.address.clone(),
            message: err.to_string(),
        }
    }
}

impl Channel for MockChannel {
    fn unary(
        &self,
        method: RpcMethod,
        request: Vec<u8>,
        _deadline: Duration,
    ) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        self.call(method, request).boxed()
    }
}
