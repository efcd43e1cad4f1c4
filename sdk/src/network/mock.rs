//! Scripted in-memory network.
//!
//! Each node gets a queue of canned submit responses and a queue of receipt
//! statuses. When a queue runs dry the node accepts and reports `Success`.
//! Every call is recorded, so tests can assert exactly which nodes were
//! tried, in which order, and with which bytes.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::ids::{AccountId, TransactionId};
use crate::proto::{SignedTransaction, Status, TransactionReceipt, TransactionResponse};

use super::channel::{ChannelError, Network};
use super::registry::Method;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Submit {
        node: AccountId,
        method: Method,
        transaction: SignedTransaction,
    },
    Receipt {
        node: AccountId,
        transaction_id: TransactionId,
    },
}

#[derive(Debug, Default)]
pub struct MockNetwork {
    submit_scripts: DashMap<AccountId, VecDeque<Result<TransactionResponse, ChannelError>>>,
    receipt_scripts: DashMap<AccountId, VecDeque<Result<Status, ChannelError>>>,
    calls: Mutex<Vec<Call>>,
    submit_latency: Option<Duration>,
    receipt_latency: Option<Duration>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call by `latency` (on tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = Some(latency);
        self.receipt_latency = Some(latency);
        self
    }

    /// Delays only receipt queries.
    pub fn with_receipt_latency(mut self, latency: Duration) -> Self {
        self.receipt_latency = Some(latency);
        self
    }

    /// Queues submit outcomes for `node`.
    pub fn script_submit(
        &self,
        node: AccountId,
        outcomes: impl IntoIterator<Item = Result<TransactionResponse, ChannelError>>,
    ) {
        self.submit_scripts.entry(node).or_default().extend(outcomes);
    }

    /// Queues one precheck status for `node`.
    pub fn respond(&self, node: AccountId, precheck: Status) {
        self.script_submit(node, [Ok(TransactionResponse::new(precheck))]);
    }

    /// Queues receipt answers for `node`.
    pub fn script_receipts(
        &self,
        node: AccountId,
        outcomes: impl IntoIterator<Item = Result<Status, ChannelError>>,
    ) {
        self.receipt_scripts.entry(node).or_default().extend(outcomes);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Nodes that received a submission, in order.
    pub fn submitted_nodes(&self) -> Vec<AccountId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Submit { node, .. } => Some(*node),
                Call::Receipt { .. } => None,
            })
            .collect()
    }

    /// Messages that were submitted, in order.
    pub fn submitted_transactions(&self) -> Vec<SignedTransaction> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Submit { transaction, .. } => Some(transaction.clone()),
                Call::Receipt { .. } => None,
            })
            .collect()
    }

    pub fn receipt_queries(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::Receipt { .. }))
            .count()
    }

    async fn simulate_latency(latency: Option<Duration>) {
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn submit(
        &self,
        node: AccountId,
        method: Method,
        transaction: SignedTransaction,
    ) -> Result<TransactionResponse, ChannelError> {
        self.calls.lock().push(Call::Submit {
            node,
            method,
            transaction,
        });
        Self::simulate_latency(self.submit_latency).await;
        let scripted = self
            .submit_scripts
            .get_mut(&node)
            .and_then(|mut queue| queue.pop_front());
        scripted.unwrap_or_else(|| Ok(TransactionResponse::accepted()))
    }

    async fn query_receipt(
        &self,
        node: AccountId,
        transaction_id: TransactionId,
    ) -> Result<TransactionReceipt, ChannelError> {
        self.calls.lock().push(Call::Receipt {
            node,
            transaction_id,
        });
        Self::simulate_latency(self.receipt_latency).await;
        let scripted = self
            .receipt_scripts
            .get_mut(&node)
            .and_then(|mut queue| queue.pop_front());
        scripted
            .unwrap_or(Ok(Status::Success))
            .map(|status| TransactionReceipt::new(transaction_id, status))
    }
}
