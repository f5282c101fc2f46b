//! Shared helpers for the mock-driven tests.

use std::sync::Once;
use std::time::Duration;

use hiero_sdk::schema;
use hiero_sdk::transport::mock::{MockRequest, MockTransport};
use hiero_sdk::{AccountId, Client, Hbar, PrivateKey, TransferTransaction};

pub const NODE_A: &str = "127.0.0.1:50211";
pub const NODE_B: &str = "127.0.0.2:50211";
pub const NODE_C: &str = "127.0.0.3:50211";

pub const MIN_BACKOFF: Duration = Duration::from_millis(250);
pub const MAX_BACKOFF: Duration = Duration::from_secs(8);

pub const OPERATOR: AccountId = AccountId::new(0, 0, 2);

static TRACING: Once = Once::new();

/// Route library logs to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Node account id served at `address` in [`client_with`].
pub fn node_id(address: &str) -> AccountId {
    match address {
        NODE_A => AccountId::from_num(3),
        NODE_B => AccountId::from_num(4),
        NODE_C => AccountId::from_num(5),
        other => panic!("unknown test node {other}"),
    }
}

/// A client over `addresses`, operated by `0.0.2` with `key`.
pub fn client_with(mock: &MockTransport, addresses: &[&str], key: &PrivateKey) -> Client {
    init_tracing();
    Client::builder()
        .network(addresses.iter().map(|a| (*a, node_id(a))))
        .unwrap()
        .transport(mock.clone())
        .operator(OPERATOR, key.clone())
        .node_backoff(MIN_BACKOFF, MAX_BACKOFF)
        .build()
        .unwrap()
}

/// A client over nodes A, B and C with a fresh operator key.
pub fn client(mock: &MockTransport) -> Client {
    client_with(mock, &[NODE_A, NODE_B, NODE_C], &PrivateKey::generate_ed25519())
}

pub fn transfer(tinybars: i64) -> TransferTransaction {
    let mut tx = TransferTransaction::new();
    tx.hbar_transfer(OPERATOR, Hbar::from_tinybars(-tinybars))
        .unwrap()
        .hbar_transfer(AccountId::from_num(1001), Hbar::from_tinybars(tinybars))
        .unwrap();
    tx
}

/// Requests that submitted a transaction, in arrival order.
pub fn submissions(mock: &MockTransport) -> Vec<MockRequest> {
    mock.requests()
        .into_iter()
        .filter(|r| !r.method.is_query())
        .collect()
}

/// Requests that asked for a receipt, in arrival order.
pub fn receipt_queries(mock: &MockTransport) -> Vec<MockRequest> {
    mock.requests()
        .into_iter()
        .filter(|r| {
            matches!(
                r.query().map(|q| q.data),
                Some(schema::QueryData::TransactionGetReceipt { .. })
            )
        })
        .collect()
}
