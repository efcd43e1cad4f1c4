//! # Cryptographic Primitives
//!
//! Ed25519 keys, the signer capability, and transaction hashing.
//!
//! Everything here is a thin wrapper around audited implementations
//! (`ed25519-dalek`, `sha2`). The transaction engine only talks to the
//! [`Signer`] trait; concrete keys are one way to satisfy it.

pub mod hash;
pub mod keys;
pub mod signer;

pub use hash::{sha384, sha384_hex};
pub use keys::{KeyError, PrivateKey, PublicKey, Signature};
pub use signer::{FnSigner, Signer, SignerError};
