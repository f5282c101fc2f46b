//! Consensus network: the node registry and candidate selection.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::time::Instant;

use super::node::Node;
use crate::error::TransportError;
use crate::transport::{Channel, Transport};
use crate::types::{AccountId, Endpoint};

/// Default minimum node backoff.
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
/// Default maximum node backoff.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Identifies one selected node for the rest of an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeRef {
    pub account_id: AccountId,
    pub endpoint: Endpoint,
}

/// The consensus nodes a client talks to.
#[derive(Debug)]
pub struct Network {
    nodes: Vec<Node>,
    min_backoff: Duration,
    max_backoff: Duration,
}

impl Network {
    pub(crate) fn new(
        entries: impl IntoIterator<Item = (Endpoint, AccountId)>,
        min_backoff: Duration,
        max_backoff: Duration,
    ) -> Self {
        let mut network = Self {
            nodes: Vec::new(),
            min_backoff,
            max_backoff,
        };
        network.set_nodes(entries);
        network
    }

    /// Replace the node set. Nodes present before and after keep their
    /// health and channel.
    pub(crate) fn set_nodes(&mut self, entries: impl IntoIterator<Item = (Endpoint, AccountId)>) {
        let mut old = std::mem::take(&mut self.nodes);
        let mut seen = HashSet::new();
        for (endpoint, account_id) in entries {
            if !seen.insert(endpoint.clone()) {
                continue;
            }
            let existing = old
                .iter()
                .position(|n| n.endpoint() == &endpoint && n.account_id() == account_id);
            let node = match existing {
                Some(index) => old.swap_remove(index),
                None => Node::new(account_id, endpoint, self.min_backoff),
            };
            self.nodes.push(node);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct node account ids, ascending.
    pub fn node_account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.nodes.iter().map(Node::account_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub(crate) fn backoff(&self) -> (Duration, Duration) {
        (self.min_backoff, self.max_backoff)
    }

    pub(crate) fn set_backoff(&mut self, min_backoff: Duration, max_backoff: Duration) {
        self.min_backoff = min_backoff;
        self.max_backoff = max_backoff;
        for node in &mut self.nodes {
            node.rebound_backoff(min_backoff, max_backoff);
        }
    }

    fn is_account_healthy(&self, account_id: AccountId, now: Instant) -> bool {
        self.nodes
            .iter()
            .any(|n| n.account_id() == account_id && n.is_healthy(now))
    }

    /// Node account ids to bind a request to.
    ///
    /// `max_nodes` nodes if given, otherwise a third of the network (rounded
    /// up), never fewer than one. Healthy nodes come first, then ascending
    /// account id, so the choice only depends on network state.
    pub(crate) fn node_ids_for_request(&self, max_nodes: Option<usize>, now: Instant) -> Vec<AccountId> {
        let mut ids = self.node_account_ids();
        if ids.is_empty() {
            return ids;
        }
        let count = max_nodes
            .unwrap_or_else(|| ids.len().div_ceil(3))
            .clamp(1, ids.len());
        ids.sort_by_key(|id| (!self.is_account_healthy(*id, now), *id));
        ids.truncate(count);
        ids
    }

    /// Pick a node for the next attempt.
    ///
    /// Candidates are the nodes bound to the request minus `excluded`.
    /// Among them a healthy node is chosen at random; if none is healthy,
    /// the one readmitted soonest is returned.
    pub(crate) fn select(
        &self,
        node_ids: &[AccountId],
        excluded: &HashSet<AccountId>,
        now: Instant,
    ) -> Option<NodeRef> {
        let candidates: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| node_ids.contains(&n.account_id()) && !excluded.contains(&n.account_id()))
            .collect();

        let healthy: Vec<&Node> = candidates
            .iter()
            .copied()
            .filter(|n| n.is_healthy(now))
            .collect();

        let chosen = match healthy.choose(&mut rand::thread_rng()) {
            Some(node) => *node,
            None => candidates.into_iter().min_by_key(|n| n.readmit_at())?,
        };

        Some(NodeRef {
            account_id: chosen.account_id(),
            endpoint: chosen.endpoint().clone(),
        })
    }

    fn find_mut(&mut self, node: &NodeRef) -> Option<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.account_id() == node.account_id && n.endpoint() == &node.endpoint)
    }

    pub(crate) fn mark_success(&mut self, node: &NodeRef) {
        let min_backoff = self.min_backoff;
        if let Some(n) = self.find_mut(node) {
            n.record_success(min_backoff);
        }
    }

    pub(crate) fn mark_failure(&mut self, node: &NodeRef, now: Instant) {
        let max_backoff = self.max_backoff;
        if let Some(n) = self.find_mut(node) {
            n.record_failure(now, max_backoff);
        }
    }

    /// The channel of `node`, opening it if needed.
    pub(crate) fn channel_for(
        &mut self,
        node: &NodeRef,
        transport: &dyn Transport,
    ) -> Result<Arc<dyn Channel>, TransportError> {
        match self.find_mut(node) {
            Some(n) => n.channel(transport),
            None => Err(TransportError::Closed(node.endpoint.to_string())),
        }
    }

    /// Drop every channel.
    pub(crate) fn close(&mut self) {
        for node in &mut self.nodes {
            node.close();
        }
    }
}
