//! The Frozen and Signed phases.
//!
//! A [`FrozenTransaction<K>`] owns one fixed body per candidate node. It
//! exposes no way to change a body or an envelope field; the only thing
//! that grows is each node's signature map.

use std::time::Duration;

use crate::crypto::hash::TRANSACTION_HASH_LENGTH;
use crate::crypto::{PublicKey, Signature, Signer};
use crate::error::{Error, Result};
use crate::ids::{AccountId, TransactionId};
use crate::proto::{SchedulableTransactionBody, SignatureMap, SignedTransaction, TransactionList};

use super::body::Envelope;
use super::builder::Phase;
use super::kind::{KindTag, TransactionKind};
use super::schedule::ScheduleAdapter;
use super::signing::{NodeMessage, SignatureManager};

/// A transaction whose bodies are fixed.
#[derive(Debug)]
pub struct FrozenTransaction<K> {
    kind: K,
    envelope: Envelope,
    signatures: SignatureManager,
}

impl<K: TransactionKind> FrozenTransaction<K> {
    pub(crate) fn from_parts(kind: K, envelope: Envelope, signatures: SignatureManager) -> Self {
        Self {
            kind,
            envelope,
            signatures,
        }
    }

    /// Freezing again changes nothing.
    pub fn freeze(self) -> Result<Self> {
        Ok(self)
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn kind_tag(&self) -> KindTag {
        K::TAG
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.envelope.transaction_id
    }

    /// Candidate nodes, in the order the bodies were built.
    pub fn node_account_ids(&self) -> Vec<AccountId> {
        self.signatures
            .messages()
            .iter()
            .map(NodeMessage::node_account_id)
            .collect()
    }

    pub fn max_transaction_fee(&self) -> u64 {
        self.envelope.max_transaction_fee
    }

    pub fn valid_duration(&self) -> Duration {
        self.envelope.valid_duration
    }

    pub fn memo(&self) -> &str {
        &self.envelope.memo
    }

    /// `Signed` once every node's message has at least one signature.
    pub fn phase(&self) -> Phase {
        if self.signatures.is_fully_signed() {
            Phase::Signed
        } else {
            Phase::Frozen
        }
    }

    pub fn messages(&self) -> &[NodeMessage] {
        self.signatures.messages()
    }

    pub fn message(&self, node_account_id: AccountId) -> Option<&NodeMessage> {
        self.signatures.message(node_account_id)
    }

    /// The encoded body for one node.
    pub fn body_bytes(&self, node_account_id: AccountId) -> Option<&[u8]> {
        self.message(node_account_id).map(NodeMessage::body_bytes)
    }

    // -- signing -----------------------------------------------------------

    /// Adds `signer`'s signature to every node's message.
    pub fn sign<S: Signer + ?Sized>(&self, signer: &S) -> Result<&Self> {
        self.signatures.sign(signer)?;
        Ok(self)
    }

    /// Applies each signer in turn. Stops at the first failure; signatures
    /// from the signers before it are kept.
    pub fn sign_with_all(&self, signers: &[&dyn Signer]) -> Result<&Self> {
        for signer in signers {
            self.signatures.sign(*signer)?;
        }
        Ok(self)
    }

    /// Signs a single node's message.
    pub fn sign_node<S: Signer + ?Sized>(
        &self,
        node_account_id: AccountId,
        signer: &S,
    ) -> Result<&Self> {
        self.signatures.sign_node(node_account_id, signer)?;
        Ok(self)
    }

    /// Attaches a signature made elsewhere over `node_account_id`'s body.
    pub fn add_signature(
        &self,
        node_account_id: AccountId,
        public_key: &PublicKey,
        signature: Signature,
    ) -> Result<&Self> {
        self.signatures
            .add_signature(node_account_id, public_key, signature)?;
        Ok(self)
    }

    /// Each node's current signature map.
    pub fn signatures(&self) -> Vec<(AccountId, SignatureMap)> {
        self.messages()
            .iter()
            .map(|m| (m.node_account_id(), m.signature_map()))
            .collect()
    }

    // -- output ------------------------------------------------------------

    pub fn signed_transactions(&self) -> Vec<SignedTransaction> {
        self.signatures.signed_transactions()
    }

    /// Every node's signed message, encoded as one list.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        TransactionList {
            transactions: self.signed_transactions(),
        }
        .encode()
    }

    /// The hash the network will know `node_account_id`'s copy by.
    pub fn transaction_hash(
        &self,
        node_account_id: AccountId,
    ) -> Result<[u8; TRANSACTION_HASH_LENGTH]> {
        self.message(node_account_id)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "node {} is not a candidate for this transaction",
                    node_account_id
                ))
            })?
            .transaction_hash()
    }

    pub fn transaction_hashes(&self) -> Result<Vec<(AccountId, [u8; TRANSACTION_HASH_LENGTH])>> {
        self.messages()
            .iter()
            .map(|m| Ok((m.node_account_id(), m.transaction_hash()?)))
            .collect()
    }

    // -- scheduling --------------------------------------------------------

    /// The schedulable encoding of the payload. Available in any phase.
    pub fn build_scheduled_message(&self) -> Result<SchedulableTransactionBody> {
        Ok(self.schedule()?.build()?.body)
    }

    pub fn schedule(&self) -> Result<ScheduleAdapter<K>> {
        Ok(ScheduleAdapter::new(self.kind.clone())?.memo(self.envelope.memo.clone()))
    }
}
