//! # Key Management
//!
//! Ed25519 keys and signatures for transaction signing.
//!
//! A [`PrivateKey`] is one possible implementation of the signer capability
//! (see [`super::signer`]). The engine itself never needs to see key
//! material: it asks a signer for a public key and a signature and files
//! the result under that key in the signature map.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this).
//! - Key generation uses `OsRng`.
//! - Key bytes are never logged, and `Debug` only shows the public half.

use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ed25519 secret key length.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Errors that can occur while parsing key material.
///
/// Intentionally vague about *why* something failed.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid private key bytes")]
    InvalidPrivateKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// An Ed25519 signing key.
///
/// `PrivateKey` intentionally does NOT implement `Serialize`. Exporting a
/// key should be a deliberate act: use [`PrivateKey::to_bytes`].
///
/// ```
/// use helix_sdk::crypto::PrivateKey;
///
/// let key = PrivateKey::generate();
/// let sig = key.sign(b"associate 0.0.5005");
/// assert!(key.public_key().verify(b"associate 0.0.5005", &sig));
/// ```
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh key using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Constructs a key deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a key from a byte slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Parse a hex-encoded key. Convenient for devnet configs, not for
    /// anything that holds real value.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_slice(&bytes)
    }

    /// Returns the public key for this private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message. Ed25519 is deterministic: same key + same message
    /// always yields the same 64 bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            bytes: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }

    /// Exports the raw secret key bytes. Handle with care.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material.
        write!(f, "PrivateKey(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of a signing key. Its bytes are the prefix under which
/// signatures are filed in a signature map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Parse a public key, checking that the bytes are a valid curve point.
    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_slice(&bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded key, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify a signature over `message`. A boolean is all callers need.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature.as_bytes()) else {
            return false;
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An Ed25519 signature. Always 64 bytes when produced by this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    /// Wrap raw signature bytes, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(KeyError::InvalidSignature);
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the signature, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Hex-encoded signature, 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...)", &hex_str[..hex_str.len().min(16)])
    }
}
