//! Body assembly.
//!
//! [`BodyAssembler`] merges the shared envelope with a kind's payload into
//! one [`TransactionBody`] per candidate node. It is a pure function of its
//! inputs: calling it twice for the same node yields the same bytes.
//!
//! The envelope merge in [`BodyAssembler::build_message`] is the single
//! place where the node id and fee are written into a body.

use std::time::Duration;

use crate::error::Result;
use crate::ids::{AccountId, TransactionId};
use crate::proto::{SchedulableTransactionBody, TransactionBody};

use super::kind::TransactionKind;

/// Fields shared by every per-node body, with all defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub transaction_id: TransactionId,
    pub max_transaction_fee: u64,
    pub valid_duration: Duration,
    pub memo: String,
}

/// Builds bodies for one transaction.
pub struct BodyAssembler<'a, K> {
    envelope: &'a Envelope,
    kind: &'a K,
}

impl<'a, K: TransactionKind> BodyAssembler<'a, K> {
    pub fn new(envelope: &'a Envelope, kind: &'a K) -> Self {
        Self { envelope, kind }
    }

    /// Builds the body bound to `node_account_id`.
    ///
    /// Fails with a validation error if the payload is incomplete.
    pub fn build_message(&self, node_account_id: AccountId) -> Result<TransactionBody> {
        self.kind.validate()?;
        Ok(self.merge(node_account_id))
    }

    /// Builds and encodes one body per node, in the given order.
    ///
    /// The payload is validated once up front; either every node gets a
    /// body or none does.
    pub fn build_messages(&self, nodes: &[AccountId]) -> Result<Vec<(AccountId, Vec<u8>)>> {
        self.kind.validate()?;
        nodes
            .iter()
            .map(|&node| Ok((node, self.merge(node).to_bytes()?)))
            .collect()
    }

    fn merge(&self, node_account_id: AccountId) -> TransactionBody {
        TransactionBody {
            transaction_id: self.envelope.transaction_id,
            node_account_id,
            transaction_fee: self.envelope.max_transaction_fee,
            valid_duration_secs: self.envelope.valid_duration.as_secs(),
            memo: self.envelope.memo.clone(),
            data: self.kind.build_data(),
        }
    }
}

/// Builds the schedulable encoding of `kind`.
///
/// Needs no envelope beyond the memo: node id and fee are decided when the
/// schedule executes.
pub fn build_scheduled_message<K: TransactionKind>(
    kind: &K,
    memo: &str,
) -> Result<SchedulableTransactionBody> {
    let data = kind.build_scheduled_data()?;
    kind.validate()?;
    Ok(SchedulableTransactionBody {
        memo: memo.to_string(),
        data,
    })
}
