//! Freezing, signing, chunking and batching through a mock network.

use hiero_sdk::schema;
use hiero_sdk::transport::mock::{MockReply, MockTransport};
use hiero_sdk::{
    AccountId, BatchTransaction, Client, Error, FileAppendTransaction, FileId, PrivateKey, Status,
    Timestamp, TopicId, TopicMessageSubmitTransaction, TransactionId,
};
use tokio_test::{assert_err, assert_ok};

use crate::common::*;

fn base_id() -> TransactionId {
    TransactionId::with_valid_start(OPERATOR, Timestamp::new(1_700_000_000, 100))
}

fn signers_of(request: &hiero_sdk::transport::mock::MockRequest) -> Vec<Vec<u8>> {
    request
        .signed_transaction()
        .unwrap()
        .sig_map
        .sig_pair
        .into_iter()
        .map(|p| p.pub_key_prefix)
        .collect()
}

// =============================================================================
// Freeze and sign
// =============================================================================

#[tokio::test]
async fn test_freeze_needs_operator_or_explicit_ids() {
    let mock = MockTransport::new();
    let client = Client::builder()
        .network([(NODE_A, node_id(NODE_A))])
        .unwrap()
        .transport(mock.clone())
        .build()
        .unwrap();

    let mut tx = transfer(5);
    assert!(matches!(tx.freeze_with(&client), Err(Error::Config(_))));
    assert!(!tx.is_frozen());

    let mut tx = transfer(5);
    assert!(matches!(tx.freeze(), Err(Error::Config(_))));

    tx.transaction_id(base_id()).unwrap();
    assert_ok!(tx.freeze_with(&client));
    assert_eq!(tx.get_node_account_ids().unwrap(), &[node_id(NODE_A)]);
}

#[tokio::test]
async fn test_signatures_are_unique_per_key() {
    let mock = MockTransport::new();
    let operator_key = PrivateKey::generate_ed25519();
    let client = client_with(&mock, &[NODE_A], &operator_key);
    let extra = PrivateKey::generate_ecdsa();

    let mut tx = transfer(5);
    tx.freeze_with(&client)
        .unwrap()
        .sign(extra.clone())
        .unwrap()
        .sign(extra.clone())
        .unwrap()
        .sign(operator_key.clone())
        .unwrap();
    assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    assert_eq!(sent.len(), 1);
    let mut signers = signers_of(&sent[0]);
    signers.sort();
    let mut expected = vec![
        extra.public_key().to_bytes_raw(),
        operator_key.public_key().to_bytes_raw(),
    ];
    expected.sort();
    assert_eq!(signers, expected);
}

#[tokio::test]
async fn test_frozen_transaction_rejects_changes() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = transfer(5);
    tx.freeze_with(&client).unwrap();
    assert!(matches!(
        tx.hbar_transfer(AccountId::from_num(7), hiero_sdk::Hbar::new(1)),
        Err(Error::IllegalState(_))
    ));
    assert!(matches!(tx.memo("late"), Err(Error::IllegalState(_))));
}

#[tokio::test]
async fn test_hash_matches_submitted_bytes() {
    use sha2::{Digest, Sha384};

    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = transfer(5);
    let response = assert_ok!(tx.execute(&client).await);

    let sent = submissions(&mock);
    let envelope: schema::Transaction = schema::decode(&sent[0].body).unwrap();
    let hash = Sha384::digest(&envelope.signed_transaction_bytes);
    assert_eq!(response.transaction_hash, hash.to_vec());
    assert_eq!(Some(response.transaction_id), tx.get_transaction_id());
}

// =============================================================================
// Chunks
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_chunks_are_submitted_in_order_with_consecutive_valid_starts() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = TopicMessageSubmitTransaction::new();
    tx.topic_id(TopicId::from_num(77))
        .unwrap()
        .message(vec![1u8; 2500])
        .unwrap()
        .transaction_id(base_id())
        .unwrap();
    let responses = assert_ok!(tx.execute_all(&client).await);
    assert_eq!(responses.len(), 3);

    // Each chunk waits for its receipt before the next is sent.
    let methods: Vec<bool> = mock.requests().iter().map(|r| r.method.is_query()).collect();
    assert_eq!(methods, vec![false, true, false, true, false, true]);

    let bodies: Vec<schema::TransactionBody> = submissions(&mock)
        .iter()
        .map(|r| r.transaction_body().unwrap())
        .collect();
    let initial = bodies[0].transaction_id.clone();
    for (k, body) in bodies.iter().enumerate() {
        assert_eq!(body.transaction_id.valid_start.seconds, 1_700_000_000);
        assert_eq!(body.transaction_id.valid_start.nanos, 100 + k as i32);
        let info = body.chunk_info.as_ref().unwrap();
        assert_eq!(info.index, k as u32);
        assert_eq!(info.total, 3);
        assert_eq!(info.initial_transaction_id, initial);
        assert_eq!(responses[k].transaction_id, base_id().offset_nanos(k as u64));
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_chunk_receipt_stops_remaining_chunks() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    mock.push_all(
        NODE_A,
        [
            MockReply::precheck(Status::Ok),
            MockReply::receipt(Status::InvalidFileId),
        ],
    );

    let mut tx = FileAppendTransaction::new();
    tx.file_id(FileId::from_num(150))
        .unwrap()
        .contents(vec![0u8; 9000])
        .unwrap();
    let err = assert_err!(tx.execute(&client).await);

    assert!(matches!(
        err,
        Error::ReceiptStatus {
            status: Status::InvalidFileId,
            ..
        }
    ));
    assert_eq!(submissions(&mock).len(), 1);
}

#[tokio::test]
async fn test_chunk_limit_checked_before_submit() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = FileAppendTransaction::new();
    tx.file_id(FileId::from_num(150))
        .unwrap()
        .contents(vec![0u8; 4096 * 2 + 1])
        .unwrap()
        .max_chunks(2)
        .unwrap();
    let err = assert_err!(tx.execute(&client).await);

    assert!(matches!(err, Error::MaxChunksExceeded { chunks: 3, max: 2 }));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_file_append_has_no_chunk_info() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = FileAppendTransaction::new();
    tx.file_id(FileId::from_num(150))
        .unwrap()
        .contents(vec![9u8; 5000])
        .unwrap();
    assert_ok!(tx.execute(&client).await);

    let bodies: Vec<schema::TransactionBody> = submissions(&mock)
        .iter()
        .map(|r| r.transaction_body().unwrap())
        .collect();
    assert_eq!(bodies.len(), 2);
    assert!(bodies.iter().all(|b| b.chunk_info.is_none()));
    let schema::TransactionData::FileAppend(last) = &bodies[1].data else {
        panic!("expected a file append body");
    };
    assert_eq!(last.contents.len(), 5000 - 4096);
}

// =============================================================================
// Batch
// =============================================================================

#[tokio::test]
async fn test_batch_submits_inner_transactions() {
    let mock = MockTransport::new();
    let operator_key = PrivateKey::generate_ed25519();
    let client = client_with(&mock, &[NODE_A], &operator_key);

    let mut first = transfer(1);
    first.batchify(&client, operator_key.public_key()).unwrap();
    let mut second = transfer(2);
    second.batchify(&client, operator_key.public_key()).unwrap();

    let mut batch = BatchTransaction::new();
    batch
        .add_inner_transaction(&first)
        .unwrap()
        .add_inner_transaction(&second)
        .unwrap();
    let response = assert_ok!(batch.execute(&client).await);
    assert_ok!(response.get_receipt(&client).await);

    let sent = submissions(&mock);
    assert_eq!(sent.len(), 1);
    let body = sent[0].transaction_body().unwrap();
    let schema::TransactionData::AtomicBatch(inner) = body.data else {
        panic!("expected a batch body");
    };
    assert_eq!(inner.transactions.len(), 2);
    for bytes in &inner.transactions {
        let signed: schema::SignedTransaction = schema::decode(bytes).unwrap();
        let inner_body: schema::TransactionBody = schema::decode(&signed.body_bytes).unwrap();
        assert_eq!(inner_body.node_account_id, schema::AccountId::num(0, 0, 0));
        assert_eq!(inner_body.batch_key, Some(operator_key.public_key().to_schema_key()));
    }
}
