//! Receipt polling and paid queries through a mock network.

use hiero_sdk::schema;
use hiero_sdk::transport::mock::{MockReply, MockTransport};
use hiero_sdk::{
    AccountBalanceQuery, AccountId, AccountInfoQuery, Error, Hbar, LedgerId, PrivateKey, Status,
    TransactionReceiptQuery,
};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

use crate::common::*;

fn account_info_answer() -> MockReply {
    MockReply::query(
        Status::Ok,
        schema::ResponseData::CryptoGetInfo(schema::AccountInfo {
            account_id: schema::AccountId::num(0, 0, 1001),
            contract_account_id: String::new(),
            deleted: false,
            key: None,
            balance: 42,
            receiver_sig_required: false,
            expiration_time: None,
            auto_renew_period_seconds: 7_776_000,
            memo: String::new(),
            owned_nfts: 0,
            max_automatic_token_associations: 0,
            ledger_id: LedgerId::Testnet.to_bytes(),
        }),
    )
}

// =============================================================================
// Receipts
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_receipt_polls_until_final() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = transfer(5);
    let response = assert_ok!(tx.execute(&client).await);
    mock.push_all(
        NODE_A,
        [
            MockReply::receipt(Status::Unknown),
            MockReply::query(
                Status::ReceiptNotFound,
                schema::ResponseData::TransactionGetReceipt {
                    receipt: schema::TransactionReceipt::default(),
                    duplicate_receipts: Vec::new(),
                    child_receipts: Vec::new(),
                },
            ),
            MockReply::receipt(Status::Success),
        ],
    );

    let start = Instant::now();
    let receipt = assert_ok!(response.get_receipt(&client).await);

    assert_eq!(receipt.status, Status::Success);
    assert_eq!(receipt.transaction_id, Some(response.transaction_id));
    assert_eq!(receipt_queries(&mock).len(), 3);
    assert!(start.elapsed() >= MIN_BACKOFF * 3);
    // Receipts are free.
    assert!(
        receipt_queries(&mock)
            .iter()
            .all(|r| r.query().unwrap().header.payment.is_none())
    );
}

#[tokio::test(start_paused = true)]
async fn test_receipt_status_is_validated() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = transfer(5);
    let mut response = assert_ok!(tx.execute(&client).await);
    mock.push(NODE_A, MockReply::receipt(Status::InsufficientPayerBalance));
    mock.push(NODE_A, MockReply::receipt(Status::InsufficientPayerBalance));

    let err = assert_err!(response.get_receipt(&client).await);
    assert!(matches!(
        err,
        Error::ReceiptStatus {
            status: Status::InsufficientPayerBalance,
            ..
        }
    ));

    response.validate_status(false);
    let receipt = assert_ok!(response.get_receipt(&client).await);
    assert_eq!(receipt.status, Status::InsufficientPayerBalance);
}

#[tokio::test]
async fn test_receipt_query_needs_transaction_id() {
    let mock = MockTransport::new();
    let client = client(&mock);
    let err = assert_err!(TransactionReceiptQuery::new().execute(&client).await);
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_record_follows_receipt() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());

    let mut tx = transfer(5);
    let response = assert_ok!(tx.execute(&client).await);
    let record = assert_ok!(response.get_record(&client).await);

    assert_eq!(record.receipt.status, Status::Success);
    assert_eq!(record.transaction_id, response.transaction_id);
    let kinds: Vec<&str> = mock.requests().iter().map(|r| r.method.method).collect();
    assert_eq!(
        kinds,
        vec![
            "cryptoTransfer",
            "getTransactionReceipts",
            "getTxRecordByTxID",
            "getTxRecordByTxID"
        ]
    );
}

// =============================================================================
// Payment
// =============================================================================

#[tokio::test]
async fn test_paid_query_asks_cost_then_pays_node() {
    let mock = MockTransport::new();
    let operator_key = PrivateKey::generate_ed25519();
    let client = client_with(&mock, &[NODE_A], &operator_key);
    mock.push_all(NODE_A, [MockReply::cost(Hbar::from_tinybars(25)), account_info_answer()]);

    let mut query = AccountInfoQuery::new();
    query.account_id(AccountId::from_num(1001));
    let info = assert_ok!(query.execute(&client).await);
    assert_eq!(info.balance, Hbar::from_tinybars(42));

    let queries: Vec<schema::Query> = mock.requests().iter().map(|r| r.query().unwrap()).collect();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].header.response_type, schema::ResponseType::CostAnswer);
    assert!(queries[0].header.payment.is_none());
    assert_eq!(queries[1].header.response_type, schema::ResponseType::AnswerOnly);

    let payment = queries[1].header.payment.as_ref().unwrap();
    let signed: schema::SignedTransaction = schema::decode(&payment.signed_transaction_bytes).unwrap();
    let body: schema::TransactionBody = schema::decode(&signed.body_bytes).unwrap();
    assert_eq!(body.node_account_id, schema::AccountId::num(0, 0, 3));
    let schema::TransactionData::CryptoTransfer(transfers) = body.data else {
        panic!("expected a transfer payment");
    };
    let amounts: Vec<(schema::AccountId, i64)> = transfers
        .account_amounts
        .into_iter()
        .map(|a| (a.account_id, a.amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (schema::AccountId::num(0, 0, 2), -25),
            (schema::AccountId::num(0, 0, 3), 25)
        ]
    );
    assert_eq!(
        signed.sig_map.sig_pair[0].pub_key_prefix,
        operator_key.public_key().to_bytes_raw()
    );
}

#[tokio::test]
async fn test_paid_query_refuses_cost_above_max() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    mock.push(NODE_A, MockReply::cost(Hbar::new(2)));

    let mut query = AccountInfoQuery::new();
    query.account_id(AccountId::from_num(1001));
    let err = assert_err!(query.execute(&client).await);

    assert!(matches!(
        err,
        Error::MaxQueryPaymentExceeded { cost, max } if cost == Hbar::new(2) && max == Hbar::new(1)
    ));
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_explicit_payment_skips_cost_query() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    mock.push(NODE_A, account_info_answer());

    let mut query = AccountInfoQuery::new();
    query
        .account_id(AccountId::from_num(1001))
        .payment_amount(Hbar::from_tinybars(100));
    assert_ok!(query.execute(&client).await);

    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn test_free_query_needs_no_operator() {
    let mock = MockTransport::new();
    let client = hiero_sdk::Client::builder()
        .network([(NODE_A, node_id(NODE_A))])
        .unwrap()
        .transport(mock.clone())
        .build()
        .unwrap();

    let mut query = AccountBalanceQuery::new();
    query.account_id(AccountId::from_num(1001));
    let balance = assert_ok!(query.execute(&client).await);
    assert_eq!(balance.account_id, AccountId::from_num(1001));
    assert_eq!(balance.hbars, Hbar::ZERO);

    let mut paid = AccountInfoQuery::new();
    paid.account_id(AccountId::from_num(1001));
    assert!(matches!(paid.execute(&client).await, Err(Error::Config(_))));
}
