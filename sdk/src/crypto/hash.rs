//! # Hashing Utilities
//!
//! The network identifies a submitted message by the SHA-384 digest of its
//! signed-transaction bytes. Since every node receives different bytes,
//! every node's copy of a transaction has its own hash.

use sha2::{Digest, Sha384};

/// Length of a transaction hash in bytes.
pub const TRANSACTION_HASH_LENGTH: usize = 48;

/// Compute the SHA-384 hash of the input data.
///
/// ```
/// use helix_sdk::crypto::sha384;
///
/// assert_eq!(sha384(b"helix").len(), 48);
/// ```
pub fn sha384(data: &[u8]) -> [u8; TRANSACTION_HASH_LENGTH] {
    let mut hasher = Sha384::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; TRANSACTION_HASH_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// SHA-384, hex-encoded. Handy for logs and receipts.
pub fn sha384_hex(data: &[u8]) -> String {
    hex::encode(sha384(data))
}
