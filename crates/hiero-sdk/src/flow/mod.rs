//! Multi-transaction flows.
//!
//! A flow runs several transactions in order, waiting for each receipt
//! before starting the next. The first failure stops the flow and is
//! reported as [`Error::Flow`](crate::Error::Flow) naming the failed step.

mod token_reject;

pub use token_reject::TokenRejectFlow;
