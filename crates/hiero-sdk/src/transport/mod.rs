//! Unary RPC transport.
//!
//! A [`Transport`] opens [`Channel`]s to node endpoints; a channel carries
//! one request and one response per call. The default transport is
//! [`GrpcWebTransport`], which frames borsh messages gRPC-web style over
//! HTTP with `reqwest`. Tests swap in [`mock::MockTransport`].

mod grpc_web;
pub mod mock;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::TransportError;
use crate::schema::RpcMethod;
use crate::types::Endpoint;

pub use grpc_web::GrpcWebTransport;

/// Opens channels to node endpoints.
pub trait Transport: Send + Sync + Debug {
    /// Open a channel to `endpoint`. Called at most once per node until the
    /// channel is dropped.
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Channel>, TransportError>;
}

/// An open channel to one node.
pub trait Channel: Send + Sync + Debug {
    /// Send one request and wait for its response.
    ///
    /// `deadline` is advisory for the server; callers enforce it locally too.
    fn unary(
        &self,
        method: RpcMethod,
        request: Vec<u8>,
        deadline: Duration,
    ) -> BoxFuture<'_, Result<Vec<u8>, TransportError>>;
}
