//! The node channel boundary.
//!
//! A [`Network`] sends a signed message to a node's method and answers
//! receipt queries. Real transports (gRPC, HTTP gateways) live outside
//! this crate; [`super::mock::MockNetwork`] is the in-memory one.

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::{AccountId, TransactionId};
use crate::proto::{SignedTransaction, TransactionReceipt, TransactionResponse};

use super::registry::Method;

/// Failures of the channel itself, as opposed to answers from the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The node could not be reached.
    #[error("node unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// Anything else. Not retried.
    #[error("internal channel error: {0}")]
    Internal(String),
}

impl ChannelError {
    /// Whether trying another node might help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout)
    }
}

/// Submission and receipt channels to the network's nodes.
#[async_trait]
pub trait Network: Send + Sync {
    /// Sends `transaction` to `method` on `node`.
    async fn submit(
        &self,
        node: AccountId,
        method: Method,
        transaction: SignedTransaction,
    ) -> Result<TransactionResponse, ChannelError>;

    /// Asks `node` for the receipt of `transaction_id`.
    async fn query_receipt(
        &self,
        node: AccountId,
        transaction_id: TransactionId,
    ) -> Result<TransactionReceipt, ChannelError>;
}
