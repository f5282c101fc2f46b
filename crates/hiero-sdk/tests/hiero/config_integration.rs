//! Client construction from configuration documents.

use std::io::Write;
use std::time::Duration;

use hiero_sdk::transport::mock::MockTransport;
use hiero_sdk::{AccountId, Client, ClientBuilder, ClientConfig, Error, LedgerId, PrivateKey};
use tokio_test::assert_ok;

use crate::common::*;

#[test]
fn test_client_from_config_file() {
    let key = PrivateKey::generate_ed25519();
    let json = format!(
        r#"{{
            "network": {{ "127.0.0.1:50211": "0.0.3", "127.0.0.2:50211": "0.0.4" }},
            "mirrorNetwork": ["127.0.0.1:5551"],
            "operator": {{ "accountId": "0.0.2", "privateKey": "{key}" }},
            "ledgerId": "testnet",
            "requestTimeout": 30000,
            "grpcDeadline": 5000,
            "unknownKey": true
        }}"#
    );
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let client = assert_ok!(Client::from_config_file(file.path()));
    assert_eq!(client.network().len(), 2);
    assert_eq!(client.network()["127.0.0.2:50211"], AccountId::from_num(4));
    assert_eq!(client.mirror_network(), vec!["127.0.0.1:5551".to_string()]);
    assert_eq!(client.operator_account_id(), Some(AccountId::from_num(2)));
    assert_eq!(client.operator_public_key(), Some(key.public_key()));
    assert_eq!(client.ledger_id(), Some(LedgerId::Testnet));
    assert_eq!(client.request_timeout(), Duration::from_secs(30));
    assert_eq!(client.grpc_deadline(), Some(Duration::from_secs(5)));
}

#[test]
fn test_config_rejects_deadline_above_timeout() {
    let json = r#"{ "network": "testnet", "requestTimeout": 1000, "grpcDeadline": 2000 }"#;
    assert!(matches!(Client::from_config(json), Err(Error::Config(_))));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Client::from_config_file(dir.path().join("absent.json")).is_err());
}

#[tokio::test]
async fn test_configured_client_executes_through_transport() {
    let mock = MockTransport::new();
    let key = PrivateKey::generate_ed25519();
    let config: ClientConfig = serde_json::from_str(&format!(
        r#"{{ "network": {{ "{NODE_A}": "0.0.3" }},
              "operator": {{ "accountId": "0.0.2", "privateKey": "{key}" }} }}"#
    ))
    .unwrap();
    let client = ClientBuilder::from_config(config)
        .unwrap()
        .transport(mock.clone())
        .build()
        .unwrap();

    let mut tx = transfer(3);
    let response = assert_ok!(tx.execute(&client).await);
    assert_eq!(response.node_id, node_id(NODE_A));
    assert_eq!(mock.call_count(NODE_A), 1);
}
