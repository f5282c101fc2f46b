//! Retry, rotation, deadline and lifecycle behavior of the execution loop,
//! observed through real transactions and queries.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hiero_sdk::transport::mock::{MockReply, MockTransport};
use hiero_sdk::{AccountBalanceQuery, AccountId, Client, Error, NodeHealth, PrivateKey, Status};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

use crate::common::*;

fn health(client: &Client, id: AccountId) -> NodeHealth {
    client.with_network(|network| {
        network
            .nodes()
            .find(|n| n.account_id() == id)
            .map(|n| n.health())
            .unwrap()
    })
}

// =============================================================================
// Retry and rotation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_busy_retries_on_same_node_with_backoff() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    mock.push_all(
        NODE_A,
        [
            MockReply::precheck(Status::Busy),
            MockReply::precheck(Status::Busy),
            MockReply::precheck(Status::Ok),
        ],
    );

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A)]).unwrap();
    let response = assert_ok!(tx.execute(&client).await);

    assert_eq!(response.node_id, node_id(NODE_A));
    let sent = submissions(&mock);
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|r| r.address == NODE_A));
    assert!(sent[1].at - sent[0].at >= MIN_BACKOFF);
    assert!(sent[2].at - sent[1].at >= MIN_BACKOFF * 2);
    assert_eq!(health(&client, node_id(NODE_A)), NodeHealth::Healthy);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_rotates_and_marks_node_unhealthy() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    // Whichever node is asked first drops the call.
    let calls = AtomicUsize::new(0);
    mock.set_fallback(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::Fail("connection reset".into())
        } else {
            MockReply::precheck(Status::Ok)
        }
    });

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)]).unwrap();
    let response = assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].address, sent[1].address);
    assert_eq!(response.node_id, node_id(&sent[1].address));

    let failed = node_id(&sent[0].address);
    assert_eq!(
        health(&client, failed),
        NodeHealth::UnhealthyUntil(sent[0].at + MIN_BACKOFF)
    );
    assert!(!client.with_network(|n| {
        n.nodes()
            .find(|node| node.account_id() == failed)
            .unwrap()
            .is_healthy(Instant::now())
    }));
}

/// Fails the first submission, accepts every later one.
fn fail_first_call(mock: &MockTransport) {
    let calls = AtomicUsize::new(0);
    mock.set_fallback(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::Fail("connection reset".into())
        } else {
            MockReply::precheck(Status::Ok)
        }
    });
}

#[tokio::test(start_paused = true)]
async fn test_configured_min_backoff_marks_failed_node() {
    let mock = MockTransport::new();
    let min = Duration::from_secs(2);
    let client = Client::builder()
        .network([(NODE_A, node_id(NODE_A)), (NODE_B, node_id(NODE_B))])
        .unwrap()
        .transport(mock.clone())
        .operator(OPERATOR, PrivateKey::generate_ed25519())
        .node_backoff(min, MAX_BACKOFF)
        .build()
        .unwrap();
    fail_first_call(&mock);

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)]).unwrap();
    assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(
        health(&client, node_id(&sent[0].address)),
        NodeHealth::UnhealthyUntil(sent[0].at + min)
    );
}

#[tokio::test(start_paused = true)]
async fn test_node_backoff_setter_applies_to_existing_nodes() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    let (min, max) = (Duration::from_millis(10), Duration::from_millis(100));
    assert_ok!(client.set_node_backoff(min, max));
    fail_first_call(&mock);

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)]).unwrap();
    assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(
        health(&client, node_id(&sent[0].address)),
        NodeHealth::UnhealthyUntil(sent[0].at + min)
    );
}

#[tokio::test(start_paused = true)]
async fn test_busy_backoff_restarts_on_new_node() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    // first node: BUSY, BUSY, then drops the call; second node: BUSY, OK
    let calls = AtomicUsize::new(0);
    mock.set_fallback(move |_| match calls.fetch_add(1, Ordering::SeqCst) {
        0 | 1 | 3 => MockReply::precheck(Status::Busy),
        2 => MockReply::Fail("connection reset".into()),
        _ => MockReply::precheck(Status::Ok),
    });

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)]).unwrap();
    let response = assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(sent.len(), 5);
    assert_eq!(sent[2].address, sent[0].address);
    assert_ne!(sent[3].address, sent[0].address);
    assert_eq!(response.node_id, node_id(&sent[4].address));
    assert!(sent[2].at - sent[1].at >= MIN_BACKOFF * 2);
    let delay = sent[4].at - sent[3].at;
    assert!(delay >= MIN_BACKOFF && delay < MIN_BACKOFF * 2);
}

#[tokio::test(start_paused = true)]
async fn test_max_attempts_never_repeats_a_node() {
    let mock = MockTransport::new();
    let client = client(&mock);
    mock.set_fallback(|_| MockReply::Unavailable);

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B), node_id(NODE_C)])
        .unwrap()
        .max_attempts(3)
        .unwrap();
    let err = assert_err!(tx.execute(&client).await);

    let Error::MaxAttemptsExceeded { attempts, last } = err else {
        panic!("expected MaxAttemptsExceeded, got {err:?}");
    };
    assert_eq!(attempts, 3);
    assert!(matches!(last.as_deref(), Some(Error::Transport(_))));

    let addresses: HashSet<String> = submissions(&mock).into_iter().map(|r| r.address).collect();
    assert_eq!(addresses.len(), 3);
    for address in [NODE_A, NODE_B, NODE_C] {
        assert!(matches!(
            health(&client, node_id(address)),
            NodeHealth::UnhealthyUntil(_)
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn test_attempts_stop_when_nodes_run_out() {
    let mock = MockTransport::new();
    let client = client(&mock);
    mock.set_fallback(|_| MockReply::Fail("refused".into()));

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)])
        .unwrap()
        .max_attempts(10)
        .unwrap();
    let err = assert_err!(tx.execute(&client).await);

    assert!(matches!(err, Error::MaxAttemptsExceeded { attempts: 2, .. }));
    assert_eq!(mock.total_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_node_account_rotates() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    let calls = AtomicUsize::new(0);
    mock.set_fallback(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::precheck(Status::InvalidNodeAccount)
        } else {
            MockReply::precheck(Status::Ok)
        }
    });

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)]).unwrap();
    assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].address, sent[1].address);
    // Each node receives the body bound to its own account.
    for request in &sent {
        let body = request.transaction_body().unwrap();
        assert_eq!(
            body.node_account_id,
            hiero_sdk::schema::AccountId::num(0, 0, node_id(&request.address).num)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_terminal_precheck_is_not_retried() {
    let mock = MockTransport::new();
    let client = client(&mock);
    mock.set_fallback(|_| MockReply::precheck(Status::InsufficientPayerBalance));

    let mut tx = transfer(10);
    let err = assert_err!(tx.execute(&client).await);

    assert_eq!(err.status(), Some(Status::InsufficientPayerBalance));
    assert!(matches!(err, Error::PrecheckStatus { transaction_id: Some(_), .. }));
    assert_eq!(mock.total_calls(), 1);
}

// =============================================================================
// Deadlines
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_attempt_deadline_moves_to_next_node() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A, NODE_B], &PrivateKey::generate_ed25519());
    let calls = AtomicUsize::new(0);
    mock.set_fallback(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            MockReply::Hang
        } else {
            MockReply::precheck(Status::Ok)
        }
    });

    let mut tx = transfer(10);
    tx.node_account_ids([node_id(NODE_A), node_id(NODE_B)])
        .unwrap()
        .grpc_deadline(Duration::from_secs(2));
    let start = Instant::now();
    assert_ok!(tx.execute(&client).await);

    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(submissions(&mock).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_bounds_whole_execution() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    mock.set_fallback(|_| MockReply::precheck(Status::Busy));

    let mut tx = transfer(10);
    tx.request_timeout(Duration::from_secs(3));
    let err = assert_err!(tx.execute(&client).await);

    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(3)));
}

#[tokio::test]
async fn test_deadline_setters_keep_invariant() {
    let mock = MockTransport::new();
    let client = client(&mock);

    client.set_request_timeout(Duration::from_secs(30)).unwrap();
    client.set_grpc_deadline(Some(Duration::from_secs(10))).unwrap();

    assert!(client.set_grpc_deadline(Some(Duration::from_secs(31))).is_err());
    assert_eq!(client.grpc_deadline(), Some(Duration::from_secs(10)));

    assert!(client.set_request_timeout(Duration::from_secs(5)).is_err());
    assert_eq!(client.request_timeout(), Duration::from_secs(30));

    client.set_grpc_deadline(None).unwrap();
    client.set_request_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(client.request_timeout(), Duration::from_secs(5));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_closed_client_fails_every_execution() {
    let mock = MockTransport::new();
    let client = client(&mock);
    assert_ok!(client.ping(node_id(NODE_A)).await);
    assert_eq!(mock.connect_count(NODE_A), 1);

    client.close();
    assert!(client.is_closed());

    let mut tx = transfer(10);
    assert!(matches!(tx.execute(&client).await, Err(Error::Uninitialized)));
    let mut query = AccountBalanceQuery::new();
    query.account_id(OPERATOR);
    assert!(matches!(query.execute(&client).await, Err(Error::Uninitialized)));
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_ping_all_reuses_channels() {
    let mock = MockTransport::new();
    let client = client(&mock);

    assert_ok!(client.ping_all().await);
    assert_ok!(client.ping_all().await);

    for address in [NODE_A, NODE_B, NODE_C] {
        assert_eq!(mock.call_count(address), 2);
        assert_eq!(mock.connect_count(address), 1);
    }
}
