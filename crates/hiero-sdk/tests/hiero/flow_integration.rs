//! Reject-then-dissociate flow through a mock network.

use hiero_sdk::schema;
use hiero_sdk::transport::mock::{MockReply, MockTransport};
use hiero_sdk::{AccountId, Error, NftId, PrivateKey, Status, TokenId, TokenRejectFlow};
use tokio_test::{assert_err, assert_ok};

use crate::common::*;

#[tokio::test]
async fn test_reject_then_dissociate() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    let owner_key = PrivateKey::generate_ed25519();

    let response = assert_ok!(
        TokenRejectFlow::new()
            .owner(AccountId::from_num(1001))
            .token_ids([TokenId::from_num(10)])
            .nft_ids([
                NftId::new(TokenId::from_num(20), 1),
                NftId::new(TokenId::from_num(20), 2),
            ])
            .receiver_key(owner_key.clone())
            .execute(&client)
            .await
    );

    let kinds: Vec<&str> = mock.requests().iter().map(|r| r.method.method).collect();
    assert_eq!(
        kinds,
        vec!["rejectToken", "getTransactionReceipts", "dissociateTokens", "getTransactionReceipts"]
    );

    let sent = submissions(&mock);
    let reject = sent[0].transaction_body().unwrap();
    assert_eq!(
        reject.transaction_id.valid_start.seconds,
        response.transaction_id.valid_start.seconds
    );
    let schema::TransactionData::TokenReject(reject) = reject.data else {
        panic!("expected a reject body");
    };
    assert_eq!(reject.rejections.len(), 3);

    let dissociate = sent[1].transaction_body().unwrap();
    let schema::TransactionData::TokenDissociate(dissociate) = dissociate.data else {
        panic!("expected a dissociate body");
    };
    assert_eq!(dissociate.account, Some(schema::AccountId::num(0, 0, 1001)));
    assert_eq!(
        dissociate.tokens,
        vec![
            schema::EntityId { shard: 0, realm: 0, num: 10 },
            schema::EntityId { shard: 0, realm: 0, num: 20 },
        ]
    );

    for request in &sent {
        let signers: Vec<Vec<u8>> = request
            .signed_transaction()
            .unwrap()
            .sig_map
            .sig_pair
            .into_iter()
            .map(|p| p.pub_key_prefix)
            .collect();
        assert!(signers.contains(&owner_key.public_key().to_bytes_raw()));
    }
}

#[tokio::test]
async fn test_reject_failure_skips_dissociate() {
    let mock = MockTransport::new();
    let client = client_with(&mock, &[NODE_A], &PrivateKey::generate_ed25519());
    mock.push_all(
        NODE_A,
        [
            MockReply::precheck(Status::Ok),
            MockReply::receipt(Status::InvalidSignature),
        ],
    );

    let err = assert_err!(
        TokenRejectFlow::new()
            .add_token_id(TokenId::from_num(10))
            .execute(&client)
            .await
    );

    let Error::Flow { step, source } = &err else {
        panic!("expected a flow error, got {err:?}");
    };
    assert_eq!(*step, "token reject");
    assert!(matches!(**source, Error::ReceiptStatus { .. }));
    assert_eq!(submissions(&mock).len(), 1);
}

#[tokio::test]
async fn test_empty_flow_is_illegal() {
    let mock = MockTransport::new();
    let client = client(&mock);
    let err = assert_err!(TokenRejectFlow::new().execute(&client).await);
    assert!(matches!(err, Error::IllegalState(_)));
}
