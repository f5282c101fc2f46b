//! Consensus node registry entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::TransportError;
use crate::transport::{Channel, Transport};
use crate::types::{AccountId, Endpoint};

/// Health of a node as seen by this client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeHealth {
    Healthy,
    /// The node failed recently and should be avoided until the instant.
    UnhealthyUntil(Instant),
}

/// A consensus node: endpoint, fee-paying account, health and channel.
///
/// Nodes compare equal by account id.
#[derive(Debug)]
pub struct Node {
    account_id: AccountId,
    endpoint: Endpoint,
    health: NodeHealth,
    /// Backoff applied on the next failure.
    backoff: Duration,
    channel: Option<Arc<dyn Channel>>,
}

impl Node {
    pub(crate) fn new(account_id: AccountId, endpoint: Endpoint, min_backoff: Duration) -> Self {
        Self {
            account_id,
            endpoint,
            health: NodeHealth::Healthy,
            backoff: min_backoff,
            channel: None,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn health(&self) -> NodeHealth {
        self.health
    }

    /// Whether the node may be used at `now`.
    pub fn is_healthy(&self, now: Instant) -> bool {
        match self.health {
            NodeHealth::Healthy => true,
            NodeHealth::UnhealthyUntil(until) => until <= now,
        }
    }

    /// When the node becomes usable again; `None` if it already is.
    pub(crate) fn readmit_at(&self) -> Option<Instant> {
        match self.health {
            NodeHealth::Healthy => None,
            NodeHealth::UnhealthyUntil(until) => Some(until),
        }
    }

    /// Mark the node unhealthy for the current backoff, then double the
    /// backoff up to `max_backoff`.
    pub(crate) fn record_failure(&mut self, now: Instant, max_backoff: Duration) {
        self.health = NodeHealth::UnhealthyUntil(now + self.backoff);
        self.backoff = (self.backoff * 2).min(max_backoff);
    }

    pub(crate) fn record_success(&mut self, min_backoff: Duration) {
        self.health = NodeHealth::Healthy;
        self.backoff = min_backoff;
    }

    /// Fit the stored backoff into new bounds. A healthy node starts over
    /// at `min_backoff`.
    pub(crate) fn rebound_backoff(&mut self, min_backoff: Duration, max_backoff: Duration) {
        self.backoff = match self.health {
            NodeHealth::Healthy => min_backoff,
            NodeHealth::UnhealthyUntil(_) => self.backoff.clamp(min_backoff, max_backoff),
        };
    }

    pub(crate) fn current_backoff(&self) -> Duration {
        self.backoff
    }

    /// The node's channel, opened on first use.
    pub(crate) fn channel(
        &mut self,
        transport: &dyn Transport,
    ) -> Result<Arc<dyn Channel>, TransportError> {
        if let Some(channel) = &self.channel {
            return Ok(channel.clone());
        }
        let channel = transport.connect(&self.endpoint)?;
        self.channel = Some(channel.clone());
        Ok(channel)
    }

    pub(crate) fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    pub(crate) fn close(&mut self) {
        self.channel = None;
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
    }
}

impl Eq for Node {}
