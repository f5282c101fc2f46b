//! The attempt loop shared by every request.
//!
//! A request picks a node from the ones it is bound to, sends one attempt,
//! and classifies the outcome:
//!
//! | Outcome | State | Next attempt |
//! |---------|-------|--------------|
//! | Transport failure, attempt deadline | [`RetryRotate`](ExecutionState::RetryRotate) | Another node; this one is marked unhealthy |
//! | `BUSY`, platform not ready, request-specific "not yet" | [`Retry`](ExecutionState::Retry) | Same node after exponential backoff |
//! | `OK` / `SUCCESS` | [`Success`](ExecutionState::Success) | None |
//! | Any other precheck code | [`Error`](ExecutionState::Error) | None |
//! | Answer that cannot be mapped | [`UserError`](ExecutionState::UserError) | None |
//!
//! The whole loop runs under the overall request timeout; expiry cancels the
//! attempt in flight.

use std::collections::HashSet;
use std::time::Duration;

use super::hiero::{Client, DEFAULT_GRPC_DEADLINE};
use super::network::NodeRef;
use crate::error::{Error, TransportError};
use crate::schema::RpcMethod;
use crate::types::{AccountId, Status, TransactionId};

/// Per-request overrides of the client's execution settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestConfig {
    pub node_account_ids: Option<Vec<AccountId>>,
    pub max_attempts: Option<u32>,
    pub min_backoff: Option<Duration>,
    pub max_backoff: Option<Duration>,
    pub grpc_deadline: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

/// A request the attempt loop can drive.
pub(crate) trait Execute: Sync {
    /// Decoded node answer.
    type Response: Send;
    /// What a successful execution yields.
    type Output;

    fn config(&self) -> &RequestConfig;

    /// Node accounts the request is bound to, in preference order.
    fn node_account_ids(&self) -> &[AccountId];

    fn method(&self) -> RpcMethod;

    fn transaction_id(&self) -> Option<TransactionId>;

    /// Request bytes for one node.
    fn make_request(&self, node_account_id: AccountId) -> Result<Vec<u8>, Error>;

    fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error>;

    fn precheck_status(&self, response: &Self::Response) -> Status;

    /// Extra precheck codes that mean "try the same node again".
    fn should_retry_precheck(&self, _status: Status) -> bool {
        false
    }

    /// Retry although the precheck passed.
    fn should_retry(&self, _response: &Self::Response) -> bool {
        false
    }

    fn make_output(
        &self,
        response: Self::Response,
        node_account_id: AccountId,
    ) -> Result<Self::Output, Error>;
}

/// Classification of one attempt.
#[derive(Debug)]
pub(crate) enum ExecutionState<T> {
    Success(T),
    /// Same node, after backoff.
    Retry(Error),
    /// Mark the node unhealthy and move on.
    RetryRotate(Error),
    /// Terminal precheck code.
    Error(Error),
    /// The node answered but the answer could not be turned into an output.
    UserError(Error),
}

fn is_transient_precheck(status: Status) -> bool {
    matches!(
        status,
        Status::Busy | Status::PlatformNotActive | Status::PlatformTransactionNotCreated
    )
}

/// `min(min_backoff * 2^retries, max_backoff)`.
pub(crate) fn retry_delay(min_backoff: Duration, max_backoff: Duration, retries: u32) -> Duration {
    min_backoff
        .saturating_mul(2u32.saturating_pow(retries))
        .min(max_backoff)
}

/// Classify a decoded answer.
pub(crate) fn classify<E: Execute>(
    request: &E,
    response: E::Response,
    node_account_id: AccountId,
) -> ExecutionState<E::Output> {
    let status = request.precheck_status(&response);
    let precheck_error = || Error::PrecheckStatus {
        status,
        transaction_id: request.transaction_id(),
    };

    match status {
        Status::Ok | Status::Success if request.should_retry(&response) => {
            ExecutionState::Retry(precheck_error())
        }
        Status::Ok | Status::Success => match request.make_output(response, node_account_id) {
            Ok(output) => ExecutionState::Success(output),
            Err(e) => ExecutionState::UserError(e),
        },
        // the node does not accept requests paid to it; try another
        Status::InvalidNodeAccount => ExecutionState::RetryRotate(precheck_error()),
        status if is_transient_precheck(status) || request.should_retry_precheck(status) => {
            ExecutionState::Retry(precheck_error())
        }
        _ => ExecutionState::Error(precheck_error()),
    }
}

/// Execute `request` against `client`'s network.
///
/// `timeout` overrides the request's and the client's overall deadline.
pub(crate) async fn execute<E: Execute>(
    client: &Client,
    request: &E,
    timeout: Option<Duration>,
) -> Result<E::Output, Error> {
    client.ensure_open()?;

    let deadline = timeout
        .or(request.config().request_timeout)
        .unwrap_or_else(|| client.request_timeout());

    match tokio::time::timeout(deadline, run_attempts(client, request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                method = %request.method(),
                transaction_id = ?request.transaction_id(),
                timeout_ms = deadline.as_millis() as u64,
                "Request timed out"
            );
            Err(Error::Timeout(deadline))
        }
    }
}

async fn run_attempts<E: Execute>(client: &Client, request: &E) -> Result<E::Output, Error> {
    let config = request.config();
    let node_ids = request.node_account_ids();
    if node_ids.is_empty() {
        return Err(Error::config("request is not bound to any node"));
    }

    let max_attempts = config.max_attempts.unwrap_or_else(|| client.max_attempts());
    let (client_min, client_max) = client.node_backoff();
    let min_backoff = config.min_backoff.unwrap_or(client_min);
    let max_backoff = config.max_backoff.unwrap_or(client_max);
    let attempt_deadline = config
        .grpc_deadline
        .or_else(|| client.grpc_deadline())
        .unwrap_or(DEFAULT_GRPC_DEADLINE);
    let method = request.method();

    let mut excluded: HashSet<AccountId> = HashSet::new();
    let mut sticky: Option<NodeRef> = None;
    let mut last: Option<Error> = None;
    let mut retries: u32 = 0;
    let mut attempts: u32 = 0;

    while attempts < max_attempts {
        client.ensure_open()?;

        let node = match sticky.take() {
            Some(node) => node,
            None => {
                // backoff restarts on a fresh node
                retries = 0;
                match client.select_node(node_ids, &excluded) {
                    Some(node) => node,
                    None => break,
                }
            }
        };
        attempts += 1;

        let rotate = |err: Error, last: &mut Option<Error>, excluded: &mut HashSet<AccountId>| {
            tracing::warn!(
                node = %node.account_id,
                attempt = attempts,
                transaction_id = ?request.transaction_id(),
                error = %err,
                "Attempt failed, rotating to another node"
            );
            client.mark_failure(&node);
            excluded.insert(node.account_id);
            *last = Some(err);
        };

        let channel = match client.channel_for(&node) {
            Ok(channel) => channel,
            Err(e) => {
                rotate(e.into(), &mut last, &mut excluded);
                continue;
            }
        };

        let body = request.make_request(node.account_id)?;

        tracing::debug!(
            node = %node.account_id,
            attempt = attempts,
            method = %method,
            transaction_id = ?request.transaction_id(),
            "Sending request"
        );

        let sent = tokio::time::timeout(
            attempt_deadline,
            channel.unary(method, body, attempt_deadline),
        )
        .await;
        let bytes = match sent {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                rotate(e.into(), &mut last, &mut excluded);
                continue;
            }
            Err(_) => {
                let err = TransportError::DeadlineExceeded {
                    address: node.endpoint.to_string(),
                    deadline: attempt_deadline,
                };
                rotate(err.into(), &mut last, &mut excluded);
                continue;
            }
        };

        let response = match request.decode_response(&bytes) {
            Ok(response) => response,
            Err(e) => {
                rotate(e, &mut last, &mut excluded);
                continue;
            }
        };

        match classify(request, response, node.account_id) {
            ExecutionState::Success(output) => {
                client.mark_success(&node);
                tracing::debug!(
                    node = %node.account_id,
                    attempt = attempts,
                    transaction_id = ?request.transaction_id(),
                    "Request succeeded"
                );
                return Ok(output);
            }
            ExecutionState::Retry(err) => {
                let delay = retry_delay(min_backoff, max_backoff, retries);
                retries += 1;
                tracing::warn!(
                    node = %node.account_id,
                    attempt = attempts,
                    status = ?err.status(),
                    transaction_id = ?request.transaction_id(),
                    backoff_ms = delay.as_millis() as u64,
                    "Node asked to retry, backing off"
                );
                last = Some(err);
                tokio::time::sleep(delay).await;
                sticky = Some(node);
            }
            ExecutionState::RetryRotate(err) => {
                rotate(err, &mut last, &mut excluded);
            }
            ExecutionState::Error(err) => {
                client.mark_success(&node);
                tracing::debug!(
                    node = %node.account_id,
                    attempt = attempts,
                    transaction_id = ?request.transaction_id(),
                    error = %err,
                    "Request failed"
                );
                return Err(err);
            }
            ExecutionState::UserError(err) => {
                client.mark_success(&node);
                return Err(err);
            }
        }
    }

    Err(Error::MaxAttemptsExceeded {
        attempts,
        last: last.map(Box::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{self, methods};
    use crate::transport::mock::{MockReply, MockTransport};
    use tokio::time::Instant;

    /// Minimal transaction-shaped request: empty body, precheck answer.
    struct Probe {
        config: RequestConfig,
        node_ids: Vec<AccountId>,
        unmappable: bool,
    }

    impl Probe {
        fn new(nodes: &[u64]) -> Self {
            Self {
                config: RequestConfig::default(),
                node_ids: nodes.iter().map(|n| AccountId::from_num(*n)).collect(),
                unmappable: false,
            }
        }
    }

    impl Execute for Probe {
        type Response = schema::TransactionResponse;
        type Output = AccountId;

        fn config(&self) -> &RequestConfig {
            &self.config
        }

        fn node_account_ids(&self) -> &[AccountId] {
            &self.node_ids
        }

        fn method(&self) -> RpcMethod {
            methods::CRYPTO_TRANSFER
        }

        fn transaction_id(&self) -> Option<TransactionId> {
            None
        }

        fn make_request(&self, _node_account_id: AccountId) -> Result<Vec<u8>, Error> {
            Ok(Vec::new())
        }

        fn decode_response(&self, bytes: &[u8]) -> Result<Self::Response, Error> {
            schema::decode(bytes)
        }

        fn precheck_status(&self, response: &Self::Response) -> Status {
            Status::from_code(response.node_transaction_precheck_code)
        }

        fn make_output(
            &self,
            _response: Self::Response,
            node_account_id: AccountId,
        ) -> Result<Self::Output, Error> {
            if self.unmappable {
                return Err(Error::codec("unexpected answer"));
            }
            Ok(node_account_id)
        }
    }

    fn client(mock: &MockTransport, nodes: u64) -> Client {
        Client::builder()
            .network((0..nodes).map(|i| (format!("127.0.0.{}:50211", i + 1), AccountId::from_num(3 + i))))
            .unwrap()
            .transport(mock.clone())
            .build()
            .unwrap()
    }

    // ========================================================================
    // Backoff
    // ========================================================================

    #[test]
    fn test_retry_delay() {
        let min = Duration::from_millis(250);
        let max = Duration::from_secs(8);
        assert_eq!(retry_delay(min, max, 0), min);
        assert_eq!(retry_delay(min, max, 1), Duration::from_millis(500));
        assert_eq!(retry_delay(min, max, 5), max);
        assert_eq!(retry_delay(min, max, 40), max);
    }

    // ========================================================================
    // Loop
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_busy_retries_same_node() {
        let mock = MockTransport::new();
        let client = client(&mock, 1);
        mock.push_all(
            "127.0.0.1:50211",
            [
                MockReply::precheck(Status::Busy),
                MockReply::precheck(Status::Busy),
                MockReply::precheck(Status::Ok),
            ],
        );

        let start = Instant::now();
        let node = execute(&client, &Probe::new(&[3]), None).await.unwrap();
        assert_eq!(node, AccountId::from_num(3));
        assert_eq!(mock.call_count("127.0.0.1:50211"), 3);
        assert!(start.elapsed() >= Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_rotates() {
        let mock = MockTransport::new();
        let client = client(&mock, 2);
        mock.push("127.0.0.1:50211", MockReply::Fail("reset".into()));
        mock.push("127.0.0.2:50211", MockReply::Fail("reset".into()));

        let err = execute(&client, &Probe::new(&[3, 4]), None).await.unwrap_err();
        let Error::MaxAttemptsExceeded { attempts, last } = err else {
            panic!("expected MaxAttemptsExceeded, got {err:?}");
        };
        assert_eq!(attempts, 2);
        assert!(matches!(last.as_deref(), Some(Error::Transport(_))));
        assert_eq!(mock.total_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_precheck_surfaces_once() {
        let mock = MockTransport::new();
        let client = client(&mock, 1);
        mock.push("127.0.0.1:50211", MockReply::precheck(Status::InvalidSignature));

        let err = execute(&client, &Probe::new(&[3]), None).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidSignature));
        assert_eq!(mock.total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_deadline_rotates() {
        let mock = MockTransport::new();
        let client = client(&mock, 2);
        client.set_grpc_deadline(Some(Duration::from_secs(1))).unwrap();
        mock.push("127.0.0.1:50211", MockReply::Hang);
        mock.push("127.0.0.2:50211", MockReply::Hang);

        let err = execute(&client, &Probe::new(&[3, 4]), None).await.unwrap_err();
        let Error::MaxAttemptsExceeded { last, .. } = err else {
            panic!("expected MaxAttemptsExceeded, got {err:?}");
        };
        assert!(matches!(
            last.as_deref(),
            Some(Error::Transport(TransportError::DeadlineExceeded { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_timeout_cancels_attempt() {
        let mock = MockTransport::new();
        let client = client(&mock, 1);
        mock.push("127.0.0.1:50211", MockReply::Hang);

        let err = execute(&client, &Probe::new(&[3]), Some(Duration::from_millis(500)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_unmappable_answer_is_terminal() {
        let mock = MockTransport::new();
        let client = client(&mock, 2);
        mock.push("127.0.0.1:50211", MockReply::precheck(Status::Ok));
        mock.push("127.0.0.2:50211", MockReply::precheck(Status::Ok));

        let mut probe = Probe::new(&[3, 4]);
        probe.unmappable = true;
        let err = execute(&client, &probe, None).await.unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
        assert_eq!(mock.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_closed_client_is_uninitialized() {
        let mock = MockTransport::new();
        let client = client(&mock, 1);
        client.close();
        let err = execute(&client, &Probe::new(&[3]), None).await.unwrap_err();
        assert!(matches!(err, Error::Uninitialized));
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unbound_request_is_config_error() {
        let mock = MockTransport::new();
        let client = client(&mock, 1);
        let err = execute(&client, &Probe::new(&[]), None).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
