//! Per-node signing.
//!
//! Every candidate node receives its own body bytes, so every node has its
//! own [`SignatureMap`]. A signature made for one node never verifies for
//! another and is never copied across.
//!
//! Each map sits behind its own lock: callers may sign different nodes'
//! messages from different threads, and a reader never sees a half-applied
//! signer. Body bytes are fixed when the message is created and have no
//! setter.

use parking_lot::Mutex;
use tracing::debug;

use crate::crypto::hash::{sha384, TRANSACTION_HASH_LENGTH};
use crate::crypto::{PublicKey, Signature, Signer};
use crate::error::{Error, Result};
use crate::ids::AccountId;
use crate::proto::{SignatureMap, SignedTransaction};

fn signing_error(public_key: &PublicKey, reason: impl ToString) -> Error {
    Error::Signing {
        public_key: public_key.to_hex(),
        reason: reason.to_string(),
    }
}

/// Produces a signature over `bytes` and checks it against the signer's
/// own key before anything is stored.
fn produce<S: Signer + ?Sized>(
    signer: &S,
    public_key: &PublicKey,
    bytes: &[u8],
) -> Result<Signature> {
    let signature = signer
        .sign(bytes)
        .map_err(|e| signing_error(public_key, e))?;
    if !public_key.verify(bytes, &signature) {
        return Err(signing_error(
            public_key,
            "signer returned a signature that does not verify",
        ));
    }
    Ok(signature)
}

// ---------------------------------------------------------------------------
// NodeMessage
// ---------------------------------------------------------------------------

/// The body bound to one node, plus the signatures collected for it.
#[derive(Debug)]
pub struct NodeMessage {
    node_account_id: AccountId,
    body_bytes: Vec<u8>,
    sig_map: Mutex<SignatureMap>,
}

impl NodeMessage {
    pub fn new(node_account_id: AccountId, body_bytes: Vec<u8>) -> Self {
        Self {
            node_account_id,
            body_bytes,
            sig_map: Mutex::new(SignatureMap::new()),
        }
    }

    pub fn node_account_id(&self) -> AccountId {
        self.node_account_id
    }

    /// The canonical body encoding. Signatures cover exactly these bytes.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    /// A snapshot of the current signatures.
    pub fn signature_map(&self) -> SignatureMap {
        self.sig_map.lock().clone()
    }

    pub fn is_signed(&self) -> bool {
        !self.sig_map.lock().is_empty()
    }

    /// Signs this node's body with `signer`.
    pub fn sign<S: Signer + ?Sized>(&self, signer: &S) -> Result<()> {
        let public_key = signer.public_key();
        let signature = produce(signer, &public_key, &self.body_bytes)?;
        self.insert(&public_key, signature);
        Ok(())
    }

    /// Attaches a signature produced elsewhere, after checking that it
    /// covers this node's body.
    pub fn add_signature(&self, public_key: &PublicKey, signature: Signature) -> Result<()> {
        if !public_key.verify(&self.body_bytes, &signature) {
            return Err(Error::Validation(format!(
                "signature from {} does not match the body for node {}",
                public_key, self.node_account_id
            )));
        }
        self.insert(public_key, signature);
        Ok(())
    }

    fn insert(&self, public_key: &PublicKey, signature: Signature) {
        self.sig_map
            .lock()
            .insert(public_key.as_bytes().to_vec(), signature.into_bytes());
    }

    /// Body and signatures as sent on the wire.
    pub fn to_signed_transaction(&self) -> SignedTransaction {
        SignedTransaction {
            body_bytes: self.body_bytes.clone(),
            sig_map: self.signature_map(),
        }
    }

    /// SHA-384 of the signed-transaction bytes, which is how the network
    /// names this copy.
    pub fn transaction_hash(&self) -> Result<[u8; TRANSACTION_HASH_LENGTH]> {
        Ok(sha384(&self.to_signed_transaction().to_bytes()?))
    }
}

// ---------------------------------------------------------------------------
// SignatureManager
// ---------------------------------------------------------------------------

/// Owns every node's message for one frozen transaction.
#[derive(Debug)]
pub struct SignatureManager {
    messages: Vec<NodeMessage>,
}

impl SignatureManager {
    /// Takes ownership of the encoded bodies, in candidate order.
    pub fn new(bodies: Vec<(AccountId, Vec<u8>)>) -> Self {
        Self {
            messages: bodies
                .into_iter()
                .map(|(node, bytes)| NodeMessage::new(node, bytes))
                .collect(),
        }
    }

    pub fn messages(&self) -> &[NodeMessage] {
        &self.messages
    }

    pub fn message(&self, node_account_id: AccountId) -> Option<&NodeMessage> {
        self.messages
            .iter()
            .find(|m| m.node_account_id == node_account_id)
    }

    fn require(&self, node_account_id: AccountId) -> Result<&NodeMessage> {
        self.message(node_account_id).ok_or_else(|| {
            Error::Validation(format!(
                "node {} is not a candidate for this transaction",
                node_account_id
            ))
        })
    }

    /// Signs every node's message with `signer`.
    ///
    /// All signatures are produced before any is stored. If the signer
    /// fails for one node, no map gains this signer's entry; signatures
    /// from earlier signers stay in place.
    pub fn sign<S: Signer + ?Sized>(&self, signer: &S) -> Result<()> {
        let public_key = signer.public_key();
        let signatures = self
            .messages
            .iter()
            .map(|m| produce(signer, &public_key, m.body_bytes()))
            .collect::<Result<Vec<_>>>()?;

        for (message, signature) in self.messages.iter().zip(signatures) {
            message.insert(&public_key, signature);
        }

        debug!(
            public_key = %public_key,
            nodes = self.messages.len(),
            "signed all node messages"
        );
        Ok(())
    }

    /// Signs only `node_account_id`'s message.
    pub fn sign_node<S: Signer + ?Sized>(&self, node_account_id: AccountId, signer: &S) -> Result<()> {
        self.require(node_account_id)?.sign(signer)?;
        debug!(node = %node_account_id, "signed node message");
        Ok(())
    }

    pub fn add_signature(
        &self,
        node_account_id: AccountId,
        public_key: &PublicKey,
        signature: Signature,
    ) -> Result<()> {
        self.require(node_account_id)?
            .add_signature(public_key, signature)
    }

    /// True once every node's message carries at least one signature.
    pub fn is_fully_signed(&self) -> bool {
        self.messages.iter().all(NodeMessage::is_signed)
    }

    /// Snapshots of every node's wire message, in candidate order.
    pub fn signed_transactions(&self) -> Vec<SignedTransaction> {
        self.messages
            .iter()
            .map(NodeMessage::to_signed_transaction)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{FnSigner, PrivateKey, SignerError};

    fn manager() -> SignatureManager {
        SignatureManager::new(vec![
            (AccountId::new(0, 0, 3), b"body for 3".to_vec()),
            (AccountId::new(0, 0, 4), b"body for 4".to_vec()),
        ])
    }

    #[test]
    fn sign_covers_each_node_separately() {
        let m = manager();
        let key = PrivateKey::generate();
        m.sign(&key).unwrap();
        assert!(m.is_fully_signed());

        let a = m.messages()[0].signature_map();
        let b = m.messages()[1].signature_map();
        let prefix = key.public_key().as_bytes().to_vec();
        assert_ne!(a.get(&prefix), b.get(&prefix));
    }

    #[test]
    fn failed_signer_leaves_no_partial_entries() {
        let m = manager();
        let good = PrivateKey::generate();
        m.sign(&good).unwrap();

        // Signs the first node, then fails on the second.
        let bad_key = PrivateKey::generate();
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let flaky = FnSigner::new(bad_key.public_key(), |bytes| {
            if calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                Ok(bad_key.sign(bytes))
            } else {
                Err(SignerError::Unavailable("token removed".to_string()))
            }
        });

        let err = m.sign(&flaky).unwrap_err();
        assert!(matches!(err, Error::Signing { .. }));
        for message in m.messages() {
            let map = message.signature_map();
            assert_eq!(map.len(), 1);
            assert!(map.contains(good.public_key().as_bytes()));
        }
    }

    #[test]
    fn non_verifying_signature_is_refused() {
        let m = manager();
        let key = PrivateKey::generate();
        let liar = FnSigner::new(key.public_key(), |_| {
            Signature::from_slice(&[0u8; 64]).map_err(|e| SignerError::Refused(e.to_string()))
        });
        assert!(m.sign(&liar).is_err());
        assert!(!m.messages()[0].is_signed());
    }

    #[test]
    fn external_signature_must_match_node_body() {
        let m = manager();
        let key = PrivateKey::generate();
        let for_node_3 = key.sign(b"body for 3");

        assert!(m
            .add_signature(AccountId::new(0, 0, 4), &key.public_key(), for_node_3.clone())
            .is_err());
        m.add_signature(AccountId::new(0, 0, 3), &key.public_key(), for_node_3)
            .unwrap();
        assert!(m.messages()[0].is_signed());
        assert!(!m.messages()[1].is_signed());
    }

    #[test]
    fn unknown_node_is_rejected() {
        let m = manager();
        let key = PrivateKey::generate();
        assert!(matches!(
            m.sign_node(AccountId::new(0, 0, 99), &key),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn hash_changes_when_signatures_are_added() {
        let m = manager();
        let before = m.messages()[0].transaction_hash().unwrap();
        m.sign_node(AccountId::new(0, 0, 3), &PrivateKey::generate())
            .unwrap();
        assert_ne!(before, m.messages()[0].transaction_hash().unwrap());
    }
}
