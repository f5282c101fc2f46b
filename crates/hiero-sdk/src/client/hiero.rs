//! The main client.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::config::{ClientConfig, MirrorNetworkConfig, NetworkConfig, NetworkName};
use super::mirror::{self, MirrorNetwork};
use super::network::{DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF, Network, NodeRef};
use super::signer::{Operator, Signer};
use crate::error::{Error, TransportError};
use crate::query::AccountBalanceQuery;
use crate::transport::{Channel, GrpcWebTransport, Transport};
use crate::types::{AccountId, Endpoint, EndpointAddress, Hbar, LedgerId, PrivateKey, PublicKey};

/// Default overall deadline of one execution.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Per-attempt deadline when none is configured.
pub const DEFAULT_GRPC_DEADLINE: Duration = Duration::from_secs(10);
/// Default attempts per execution.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Default cap on what a query may pay.
pub const DEFAULT_MAX_QUERY_PAYMENT: Hbar = Hbar::new(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Presets
// ============================================================================

enum Host {
    Ip([u8; 4]),
    Name(&'static str),
}

const MAINNET_NODES: &[(Host, u64)] = &[
    (Host::Ip([35, 237, 200, 180]), 3),
    (Host::Ip([35, 186, 191, 247]), 4),
    (Host::Ip([35, 192, 2, 25]), 5),
    (Host::Ip([35, 199, 161, 108]), 6),
    (Host::Ip([35, 203, 82, 240]), 7),
    (Host::Ip([35, 236, 5, 219]), 8),
    (Host::Ip([35, 197, 192, 225]), 9),
];

const TESTNET_NODES: &[(Host, u64)] = &[
    (Host::Name("0.testnet.hedera.com"), 3),
    (Host::Name("1.testnet.hedera.com"), 4),
    (Host::Name("2.testnet.hedera.com"), 5),
    (Host::Name("3.testnet.hedera.com"), 6),
];

const PREVIEWNET_NODES: &[(Host, u64)] = &[
    (Host::Name("0.previewnet.hedera.com"), 3),
    (Host::Name("1.previewnet.hedera.com"), 4),
    (Host::Name("2.previewnet.hedera.com"), 5),
    (Host::Name("3.previewnet.hedera.com"), 6),
];

const LOCAL_NODES: &[(Host, u64)] = &[(Host::Ip([127, 0, 0, 1]), 3)];

fn preset_nodes(name: NetworkName) -> Vec<(Endpoint, AccountId)> {
    let table = match name {
        NetworkName::Mainnet => MAINNET_NODES,
        NetworkName::Testnet => TESTNET_NODES,
        NetworkName::Previewnet => PREVIEWNET_NODES,
        NetworkName::LocalNode => LOCAL_NODES,
    };
    table
        .iter()
        .map(|(host, num)| {
            let address = match host {
                Host::Ip(octets) => EndpointAddress::Ipv4(*octets),
                Host::Name(name) => EndpointAddress::Domain((*name).to_string()),
            };
            (
                Endpoint::new(address, crate::types::PORT_NODE_PLAIN),
                AccountId::from_num(*num),
            )
        })
        .collect()
}

fn preset_mirror(name: NetworkName) -> MirrorNetwork {
    match name {
        NetworkName::Mainnet => MirrorNetwork::mainnet(),
        NetworkName::Testnet => MirrorNetwork::testnet(),
        NetworkName::Previewnet => MirrorNetwork::previewnet(),
        NetworkName::LocalNode => MirrorNetwork::local_node(),
    }
}

fn preset_ledger(name: NetworkName) -> Option<LedgerId> {
    match name {
        NetworkName::Mainnet => Some(LedgerId::Mainnet),
        NetworkName::Testnet => Some(LedgerId::Testnet),
        NetworkName::Previewnet => Some(LedgerId::Previewnet),
        NetworkName::LocalNode => None,
    }
}

fn parse_nodes<I, S>(nodes: I) -> Result<Vec<(Endpoint, AccountId)>, Error>
where
    I: IntoIterator<Item = (S, AccountId)>,
    S: AsRef<str>,
{
    nodes
        .into_iter()
        .map(|(address, account_id)| Ok((address.as_ref().parse::<Endpoint>()?, account_id)))
        .collect()
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
struct Settings {
    operator: Option<Operator>,
    ledger_id: Option<LedgerId>,
    default_max_transaction_fee: Option<Hbar>,
    default_max_query_payment: Option<Hbar>,
    request_timeout: Duration,
    grpc_deadline: Option<Duration>,
    max_attempts: u32,
    max_nodes_per_request: Option<usize>,
    auto_validate_checksums: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operator: None,
            ledger_id: None,
            default_max_transaction_fee: None,
            default_max_query_payment: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            grpc_deadline: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_nodes_per_request: None,
            auto_validate_checksums: false,
        }
    }
}

fn check_deadlines(request_timeout: Duration, grpc_deadline: Option<Duration>) -> Result<(), Error> {
    match grpc_deadline {
        Some(deadline) if deadline > request_timeout => Err(Error::config(format!(
            "gRPC deadline {:?} exceeds request timeout {:?}",
            deadline, request_timeout
        ))),
        _ => Ok(()),
    }
}

struct ClientInner {
    network: Mutex<Network>,
    mirror_network: Mutex<MirrorNetwork>,
    settings: Mutex<Settings>,
    transport: Arc<dyn Transport>,
    http: reqwest::Client,
    closed: AtomicBool,
}

/// Long-lived handle to a consensus network.
///
/// Cloning is cheap; all clones share the network, its node health and
/// channels, and the settings. Every setter takes `&self`.
///
/// # Example
///
/// ```rust,no_run
/// use hiero_sdk::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), hiero_sdk::Error> {
///     let client = Client::for_testnet();
///     client.set_operator(AccountId::from_num(1001), "302e0201...".parse::<PrivateKey>()?);
///
///     let mut tx = TransferTransaction::new();
///     tx.hbar_transfer(AccountId::from_num(1001), Hbar::new(-1))?
///         .hbar_transfer(AccountId::from_num(1002), Hbar::new(1))?;
///     let receipt = tx.execute(&client).await?.get_receipt(&client).await?;
///     println!("{}", receipt.status);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn for_mainnet() -> Self {
        ClientBuilder::for_name(NetworkName::Mainnet).into_client()
    }

    pub fn for_testnet() -> Self {
        ClientBuilder::for_name(NetworkName::Testnet).into_client()
    }

    pub fn for_previewnet() -> Self {
        ClientBuilder::for_name(NetworkName::Previewnet).into_client()
    }

    /// A client for a development network on this machine.
    pub fn for_local_node() -> Self {
        ClientBuilder::for_name(NetworkName::LocalNode).into_client()
    }

    /// A client for a preset given by name (`mainnet`, `testnet`,
    /// `previewnet`, `local-node`).
    pub fn for_name(name: &str) -> Result<Self, Error> {
        Ok(ClientBuilder::for_name(name.parse()?).into_client())
    }

    /// A client for an explicit `host:port` → node account map.
    pub fn for_network<I, S>(nodes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, AccountId)>,
        S: AsRef<str>,
    {
        Client::builder().network(nodes)?.build()
    }

    /// A client whose consensus network is read from a mirror node's
    /// address book.
    pub async fn for_mirror_network<I, S>(mirrors: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let client = Client::builder()
            .mirror_network(MirrorNetwork::from_addresses(mirrors)?)
            .build()?;
        client.update_network_from_mirror().await?;
        Ok(client)
    }

    /// Create a client from a JSON configuration document.
    ///
    /// See [`ClientConfig`] for the format.
    pub fn from_config(json: &str) -> Result<Self, Error> {
        ClientBuilder::from_config(ClientConfig::from_json(json)?)?.build()
    }

    /// Create a client from a JSON configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_config(&json)
    }

    /// Create a client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `HIERO_NETWORK` (optional): a preset name. Defaults to `testnet`.
    /// - `OPERATOR_ID` (optional): operator account id.
    /// - `OPERATOR_KEY` (optional): operator private key, hex (raw or DER).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `OPERATOR_ID` is set without `OPERATOR_KEY` (or vice versa)
    /// - any value is malformed
    pub fn from_env() -> Result<Self, Error> {
        let network = std::env::var("HIERO_NETWORK").ok();
        let operator_id = std::env::var("OPERATOR_ID").ok();
        let operator_key = std::env::var("OPERATOR_KEY").ok();

        let name = match network.as_deref() {
            Some(name) => name.parse()?,
            None => NetworkName::Testnet,
        };
        let mut builder = ClientBuilder::for_name(name);

        match (operator_id, operator_key) {
            (Some(id), Some(key)) => {
                let account_id: AccountId = id.parse()?;
                let key: PrivateKey = key.parse()?;
                builder = builder.operator(account_id, key);
            }
            (Some(_), None) => {
                return Err(Error::config("OPERATOR_ID is set but OPERATOR_KEY is missing"));
            }
            (None, Some(_)) => {
                return Err(Error::config("OPERATOR_KEY is set but OPERATOR_ID is missing"));
            }
            (None, None) => {}
        }

        builder.build()
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        lock(&self.inner.settings)
    }

    // ─── Operator ───

    /// Set the account that pays for requests, and its signer.
    pub fn set_operator(&self, account_id: AccountId, signer: impl Signer + 'static) {
        self.settings().operator = Some(Operator::new(account_id, signer));
    }

    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.settings().operator.as_ref().map(|o| o.account_id)
    }

    pub fn operator_public_key(&self) -> Option<PublicKey> {
        self.settings().operator.as_ref().map(Operator::public_key)
    }

    pub(crate) fn operator(&self) -> Option<Operator> {
        self.settings().operator.clone()
    }

    // ─── Ledger ───

    pub fn ledger_id(&self) -> Option<LedgerId> {
        self.settings().ledger_id.clone()
    }

    pub fn set_ledger_id(&self, ledger_id: Option<LedgerId>) {
        self.settings().ledger_id = ledger_id;
    }

    /// Whether entity ids are checked against the ledger id when freezing.
    pub fn auto_validate_checksums(&self) -> bool {
        self.settings().auto_validate_checksums
    }

    pub fn set_auto_validate_checksums(&self, value: bool) {
        self.settings().auto_validate_checksums = value;
    }

    // ─── Networks ───

    /// The consensus network as `host:port` → node account.
    pub fn network(&self) -> HashMap<String, AccountId> {
        lock(&self.inner.network)
            .nodes()
            .map(|n| (n.endpoint().to_string(), n.account_id()))
            .collect()
    }

    /// Replace the consensus network. Nodes kept across the change keep
    /// their health and channels.
    pub fn set_network<I, S>(&self, nodes: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (S, AccountId)>,
        S: AsRef<str>,
    {
        let nodes = parse_nodes(nodes)?;
        lock(&self.inner.network).set_nodes(nodes);
        Ok(())
    }

    pub fn mirror_network(&self) -> Vec<String> {
        lock(&self.inner.mirror_network).addresses()
    }

    pub fn set_mirror_network<I, S>(&self, addresses: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mirror = MirrorNetwork::from_addresses(addresses)?;
        *lock(&self.inner.mirror_network) = mirror;
        Ok(())
    }

    /// Replace the consensus network with the address book served by a
    /// mirror node.
    pub async fn update_network_from_mirror(&self) -> Result<(), Error> {
        self.ensure_open()?;
        let mirror = lock(&self.inner.mirror_network)
            .next()
            .cloned()
            .ok_or_else(|| Error::config("client has no mirror network"))?;
        let nodes = mirror::fetch_address_book(&self.inner.http, &mirror).await?;
        if nodes.is_empty() {
            return Err(Error::config(format!(
                "mirror node {} returned an empty address book",
                mirror
            )));
        }
        lock(&self.inner.network).set_nodes(nodes);
        Ok(())
    }

    // ─── Deadlines and retries ───

    pub fn request_timeout(&self) -> Duration {
        self.settings().request_timeout
    }

    /// Set the overall deadline of an execution.
    ///
    /// Fails without changing anything if it is shorter than the gRPC
    /// deadline.
    pub fn set_request_timeout(&self, timeout: Duration) -> Result<(), Error> {
        let mut settings = self.settings();
        check_deadlines(timeout, settings.grpc_deadline)?;
        settings.request_timeout = timeout;
        Ok(())
    }

    pub fn grpc_deadline(&self) -> Option<Duration> {
        self.settings().grpc_deadline
    }

    /// Set the per-attempt deadline.
    ///
    /// Fails without changing anything if it exceeds the request timeout.
    pub fn set_grpc_deadline(&self, deadline: Option<Duration>) -> Result<(), Error> {
        let mut settings = self.settings();
        check_deadlines(settings.request_timeout, deadline)?;
        settings.grpc_deadline = deadline;
        Ok(())
    }

    pub fn max_attempts(&self) -> u32 {
        self.settings().max_attempts
    }

    pub fn set_max_attempts(&self, attempts: u32) -> Result<(), Error> {
        if attempts == 0 {
            return Err(Error::config("max attempts must be at least 1"));
        }
        self.settings().max_attempts = attempts;
        Ok(())
    }

    /// Minimum and maximum node backoff.
    pub fn node_backoff(&self) -> (Duration, Duration) {
        lock(&self.inner.network).backoff()
    }

    pub fn set_node_backoff(&self, min: Duration, max: Duration) -> Result<(), Error> {
        if min > max {
            return Err(Error::config(format!(
                "min backoff {:?} exceeds max backoff {:?}",
                min, max
            )));
        }
        lock(&self.inner.network).set_backoff(min, max);
        Ok(())
    }

    pub fn max_nodes_per_request(&self) -> Option<usize> {
        self.settings().max_nodes_per_request
    }

    pub fn set_max_nodes_per_request(&self, max: Option<usize>) {
        self.settings().max_nodes_per_request = max;
    }

    // ─── Fees ───

    pub fn default_max_transaction_fee(&self) -> Option<Hbar> {
        self.settings().default_max_transaction_fee
    }

    pub fn set_default_max_transaction_fee(&self, fee: Hbar) -> Result<(), Error> {
        if fee.is_negative() {
            return Err(Error::config("default max transaction fee must be non-negative"));
        }
        self.settings().default_max_transaction_fee = Some(fee);
        Ok(())
    }

    /// The cap on query payments; 1 ℏ unless set.
    pub fn default_max_query_payment(&self) -> Hbar {
        self.settings()
            .default_max_query_payment
            .unwrap_or(DEFAULT_MAX_QUERY_PAYMENT)
    }

    pub fn set_default_max_query_payment(&self, payment: Hbar) -> Result<(), Error> {
        if payment.is_negative() {
            return Err(Error::config("default max query payment must be non-negative"));
        }
        self.settings().default_max_query_payment = Some(payment);
        Ok(())
    }

    // ─── Lifecycle ───

    /// Check that `node_account_id` answers a free balance query.
    pub async fn ping(&self, node_account_id: AccountId) -> Result<(), Error> {
        AccountBalanceQuery::new()
            .account_id(node_account_id)
            .node_account_ids([node_account_id])
            .execute(self)
            .await?;
        Ok(())
    }

    /// Ping every node in the network, one after the other.
    pub async fn ping_all(&self) -> Result<(), Error> {
        let ids = lock(&self.inner.network).node_account_ids();
        for id in ids {
            self.ping(id).await?;
        }
        Ok(())
    }

    /// Release every channel. Later executions fail with
    /// [`Error::Uninitialized`].
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        lock(&self.inner.network).close();
        tracing::debug!("Client closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    // ─── Execution plumbing ───

    pub(crate) fn ensure_open(&self) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::Uninitialized);
        }
        Ok(())
    }

    pub(crate) fn node_ids_for_request(&self) -> Vec<AccountId> {
        let max_nodes = self.max_nodes_per_request();
        lock(&self.inner.network).node_ids_for_request(max_nodes, Instant::now())
    }

    pub(crate) fn select_node(
        &self,
        node_ids: &[AccountId],
        excluded: &std::collections::HashSet<AccountId>,
    ) -> Option<NodeRef> {
        lock(&self.inner.network).select(node_ids, excluded, Instant::now())
    }

    pub(crate) fn channel_for(&self, node: &NodeRef) -> Result<Arc<dyn Channel>, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed(node.endpoint.to_string()));
        }
        lock(&self.inner.network).channel_for(node, self.inner.transport.as_ref())
    }

    pub(crate) fn mark_success(&self, node: &NodeRef) {
        lock(&self.inner.network).mark_success(node);
    }

    pub(crate) fn mark_failure(&self, node: &NodeRef) {
        lock(&self.inner.network).mark_failure(node, Instant::now());
    }

    /// Run `f` against the network state. Test and diagnostic hook.
    pub fn with_network<R>(&self, f: impl FnOnce(&Network) -> R) -> R {
        f(&lock(&self.inner.network))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("nodes", &lock(&self.inner.network).len())
            .field("operator", &self.operator_account_id())
            .field("ledger_id", &self.ledger_id())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for creating a [`Client`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use hiero_sdk::*;
///
/// # fn example() -> Result<(), hiero_sdk::Error> {
/// let client = Client::builder()
///     .network([("127.0.0.1:50211", AccountId::from_num(3))])?
///     .ledger_id(LedgerId::Testnet)
///     .request_timeout(Duration::from_secs(30))
///     .grpc_deadline(Duration::from_secs(5))
///     .max_attempts(5)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    nodes: Vec<(Endpoint, AccountId)>,
    mirror_network: MirrorNetwork,
    transport: Option<Arc<dyn Transport>>,
    settings: Settings,
    min_backoff: Duration,
    max_backoff: Duration,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            mirror_network: MirrorNetwork::default(),
            transport: None,
            settings: Settings::default(),
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    /// A builder preloaded with a preset network.
    pub fn for_name(name: NetworkName) -> Self {
        let mut builder = Self::new();
        builder.nodes = preset_nodes(name);
        builder.mirror_network = preset_mirror(name);
        builder.settings.ledger_id = preset_ledger(name);
        builder
    }

    /// A builder from a parsed configuration document.
    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        let mut builder = match &config.network {
            Some(NetworkConfig::Name(name)) => Self::for_name(name.parse()?),
            Some(NetworkConfig::Nodes(nodes)) => {
                Self::new().network(nodes.iter().map(|(a, id)| (a.as_str(), *id)))?
            }
            None if config.mirror_network.is_some() => Self::new(),
            None => return Err(Error::config("configuration has no network")),
        };

        match config.mirror_network {
            Some(MirrorNetworkConfig::Name(name)) => {
                builder.mirror_network = preset_mirror(name.parse()?);
            }
            Some(MirrorNetworkConfig::Addresses(addresses)) => {
                builder.mirror_network = MirrorNetwork::from_addresses(addresses)?;
            }
            None => {}
        }

        if let Some(operator) = config.operator {
            let key: PrivateKey = operator.private_key.parse()?;
            builder = builder.operator(operator.account_id, key);
        }
        if let Some(ledger) = config.ledger_id {
            builder = builder.ledger_id(ledger.parse()?);
        }
        if let Some(ms) = config.request_timeout {
            builder = builder.request_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.grpc_deadline {
            builder = builder.grpc_deadline(Duration::from_millis(ms));
        }
        if let Some(attempts) = config.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(max) = config.max_nodes_per_request {
            builder = builder.max_nodes_per_request(max);
        }
        Ok(builder)
    }

    /// Set the consensus network from `host:port` → node account pairs.
    pub fn network<I, S>(mut self, nodes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, AccountId)>,
        S: AsRef<str>,
    {
        self.nodes = parse_nodes(nodes)?;
        Ok(self)
    }

    /// Set the consensus network from parsed endpoints.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = (Endpoint, AccountId)>) -> Self {
        self.nodes = nodes.into_iter().collect();
        self
    }

    pub fn mirror_network(mut self, mirror_network: MirrorNetwork) -> Self {
        self.mirror_network = mirror_network;
        self
    }

    /// Use a custom transport instead of gRPC-web over HTTP.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn operator(mut self, account_id: AccountId, signer: impl Signer + 'static) -> Self {
        self.settings.operator = Some(Operator::new(account_id, signer));
        self
    }

    pub fn ledger_id(mut self, ledger_id: LedgerId) -> Self {
        self.settings.ledger_id = Some(ledger_id);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    pub fn grpc_deadline(mut self, deadline: Duration) -> Self {
        self.settings.grpc_deadline = Some(deadline);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.settings.max_attempts = attempts;
        self
    }

    pub fn node_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = min;
        self.max_backoff = max;
        self
    }

    pub fn max_nodes_per_request(mut self, max: usize) -> Self {
        self.settings.max_nodes_per_request = Some(max);
        self
    }

    pub fn default_max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.settings.default_max_transaction_fee = Some(fee);
        self
    }

    pub fn default_max_query_payment(mut self, payment: Hbar) -> Self {
        self.settings.default_max_query_payment = Some(payment);
        self
    }

    pub fn auto_validate_checksums(mut self, value: bool) -> Self {
        self.settings.auto_validate_checksums = value;
        self
    }

    /// Build the client, validating the settings.
    pub fn build(self) -> Result<Client, Error> {
        check_deadlines(self.settings.request_timeout, self.settings.grpc_deadline)?;
        if self.settings.max_attempts == 0 {
            return Err(Error::config("max attempts must be at least 1"));
        }
        if self.min_backoff > self.max_backoff {
            return Err(Error::config(format!(
                "min backoff {:?} exceeds max backoff {:?}",
                self.min_backoff, self.max_backoff
            )));
        }
        Ok(self.into_client())
    }

    fn into_client(self) -> Client {
        let network = Network::new(self.nodes, self.min_backoff, self.max_backoff);
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(GrpcWebTransport::new()));
        Client {
            inner: Arc::new(ClientInner {
                network: Mutex::new(network),
                mirror_network: Mutex::new(self.mirror_network),
                settings: Mutex::new(self.settings),
                transport,
                http: reqwest::Client::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("nodes", &self.nodes)
            .field("mirror_network", &self.mirror_network)
            .finish()
    }
}
