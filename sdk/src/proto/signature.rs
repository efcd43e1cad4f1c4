//! Signature maps and signed transactions.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One signature, filed under the signer's public-key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub pub_key_prefix: Vec<u8>,
    pub signature: Vec<u8>,
}

/// The signatures attached to one node's body.
///
/// Pairs are kept sorted by prefix, so the same set of signers always
/// encodes to the same bytes regardless of signing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMap {
    pairs: Vec<SignaturePair>,
}

impl SignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a signature, replacing any existing one under the same prefix.
    pub fn insert(&mut self, pub_key_prefix: Vec<u8>, signature: Vec<u8>) {
        match self
            .pairs
            .binary_search_by(|p| p.pub_key_prefix.as_slice().cmp(&pub_key_prefix))
        {
            Ok(idx) => self.pairs[idx].signature = signature,
            Err(idx) => self.pairs.insert(
                idx,
                SignaturePair {
                    pub_key_prefix,
                    signature,
                },
            ),
        }
    }

    pub fn get(&self, pub_key_prefix: &[u8]) -> Option<&[u8]> {
        self.pairs
            .binary_search_by(|p| p.pub_key_prefix.as_slice().cmp(pub_key_prefix))
            .ok()
            .map(|idx| self.pairs[idx].signature.as_slice())
    }

    pub fn contains(&self, pub_key_prefix: &[u8]) -> bool {
        self.get(pub_key_prefix).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in canonical (prefix) order.
    pub fn pairs(&self) -> &[SignaturePair] {
        &self.pairs
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

/// A body plus the signatures over it. This is what a node receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
}

impl SignedTransaction {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Every per-node copy of one transaction, in candidate order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<SignedTransaction>,
}

impl TransactionList {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_matter() {
        let mut a = SignatureMap::new();
        a.insert(vec![9, 9], vec![1]);
        a.insert(vec![1, 2], vec![2]);
        a.insert(vec![5], vec![3]);

        let mut b = SignatureMap::new();
        b.insert(vec![5], vec![3]);
        b.insert(vec![1, 2], vec![2]);
        b.insert(vec![9, 9], vec![1]);

        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
        let prefixes: Vec<_> = a.pairs().iter().map(|p| p.pub_key_prefix.clone()).collect();
        assert_eq!(prefixes, vec![vec![1, 2], vec![5], vec![9, 9]]);
    }

    #[test]
    fn same_prefix_replaces() {
        let mut map = SignatureMap::new();
        map.insert(vec![1], vec![10]);
        map.insert(vec![1], vec![11]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&[1]), Some(&[11u8][..]));
        assert!(!map.contains(&[2]));
    }

    #[test]
    fn list_decodes_back() {
        let mut sig_map = SignatureMap::new();
        sig_map.insert(vec![7; 32], vec![8; 64]);
        let list = TransactionList {
            transactions: vec![SignedTransaction {
                body_bytes: vec![1, 2, 3],
                sig_map,
            }],
        };
        assert_eq!(TransactionList::decode(&list.encode().unwrap()).unwrap(), list);
    }
}
