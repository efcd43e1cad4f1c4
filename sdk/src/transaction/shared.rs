//! A draft shared between threads.
//!
//! [`Transaction<K>`] gets its Draft/Frozen guarantee from ownership: once
//! `freeze` consumes it, there is nothing left to mutate. When several
//! tasks configure the same draft, [`SharedTransaction<K>`] provides the
//! same guarantee at runtime. Setters and `freeze` take one write lock, so
//! a setter racing with `freeze` either lands before the bodies are built
//! or fails with [`Error::FrozenState`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::ids::{AccountId, TransactionId};

use super::builder::{Phase, Transaction};
use super::frozen::FrozenTransaction;
use super::kind::TransactionKind;

#[derive(Debug)]
enum State<K> {
    Draft(Transaction<K>),
    Frozen(Arc<FrozenTransaction<K>>),
}

/// A lock-guarded transaction handle. Clones share the same state.
#[derive(Debug)]
pub struct SharedTransaction<K> {
    state: Arc<RwLock<State<K>>>,
}

impl<K> Clone for SharedTransaction<K> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K: TransactionKind> SharedTransaction<K> {
    pub fn new(draft: Transaction<K>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::Draft(draft))),
        }
    }

    /// Applies `f` to the draft under the write lock.
    fn modify(
        &self,
        field: &'static str,
        f: impl FnOnce(Transaction<K>) -> Transaction<K>,
    ) -> Result<&Self> {
        let mut state = self.state.write();
        match &mut *state {
            State::Draft(draft) => {
                *draft = f(draft.clone());
                Ok(self)
            }
            State::Frozen(_) => Err(Error::FrozenState { field }),
        }
    }

    pub fn set_transaction_id(&self, transaction_id: TransactionId) -> Result<&Self> {
        self.modify("transaction_id", |d| d.transaction_id(transaction_id))
    }

    pub fn set_node_account_ids(
        &self,
        nodes: impl IntoIterator<Item = AccountId>,
    ) -> Result<&Self> {
        let nodes: Vec<AccountId> = nodes.into_iter().collect();
        self.modify("node_account_ids", |d| d.node_account_ids(nodes))
    }

    pub fn set_max_transaction_fee(&self, fee: u64) -> Result<&Self> {
        self.modify("max_transaction_fee", |d| d.max_transaction_fee(fee))
    }

    pub fn set_valid_duration(&self, duration: Duration) -> Result<&Self> {
        self.modify("valid_duration", |d| d.valid_duration(duration))
    }

    pub fn set_memo(&self, memo: impl Into<String>) -> Result<&Self> {
        let memo = memo.into();
        self.modify("memo", |d| d.memo(memo))
    }

    /// Changes the payload.
    pub fn update_kind(&self, f: impl FnOnce(K) -> K) -> Result<&Self> {
        self.modify("payload", |d| d.map_kind(f))
    }

    pub fn phase(&self) -> Phase {
        match &*self.state.read() {
            State::Draft(_) => Phase::Draft,
            State::Frozen(frozen) => frozen.phase(),
        }
    }

    /// A copy of the draft, or `None` once frozen.
    pub fn draft(&self) -> Option<Transaction<K>> {
        match &*self.state.read() {
            State::Draft(draft) => Some(draft.clone()),
            State::Frozen(_) => None,
        }
    }

    /// The frozen transaction, if `freeze` has succeeded.
    pub fn frozen(&self) -> Option<Arc<FrozenTransaction<K>>> {
        match &*self.state.read() {
            State::Draft(_) => None,
            State::Frozen(frozen) => Some(Arc::clone(frozen)),
        }
    }

    /// Freezes the draft. Calling it again returns the same frozen
    /// transaction. If validation fails the draft is left as it was.
    pub fn freeze(&self) -> Result<Arc<FrozenTransaction<K>>> {
        let mut state = self.state.write();
        let frozen = match &*state {
            State::Frozen(frozen) => return Ok(Arc::clone(frozen)),
            State::Draft(draft) => Arc::new(draft.clone().freeze()?),
        };
        *state = State::Frozen(Arc::clone(&frozen));
        Ok(frozen)
    }
}
