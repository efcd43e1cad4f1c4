//! The signer capability boundary.
//!
//! The engine never owns keys. It asks a [`Signer`] for its public key and
//! for a signature over some bytes. That keeps hardware wallets, remote
//! signing services, and threshold schemes outside the core: anything that
//! can produce an Ed25519 signature for a known key plugs in here.

use thiserror::Error;

use super::keys::{PrivateKey, PublicKey, Signature};

/// Why a signer could not produce a signature.
#[derive(Debug, Clone, Error)]
pub enum SignerError {
    /// The key is not reachable right now (device unplugged, service down).
    #[error("signing key unavailable: {0}")]
    Unavailable(String),

    /// The signer refused to sign (policy, user declined).
    #[error("signing refused: {0}")]
    Refused(String),
}

/// Something that can sign bytes on behalf of one public key.
pub trait Signer: Send + Sync {
    /// The key signatures will verify against.
    fn public_key(&self) -> PublicKey;

    /// Produce a signature over `message`.
    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

impl Signer for PrivateKey {
    fn public_key(&self) -> PublicKey {
        PrivateKey::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(PrivateKey::sign(self, message))
    }
}

/// Adapts a closure into a [`Signer`].
///
/// Useful for remote signers where the signing call is a request to some
/// other system:
///
/// ```
/// use helix_sdk::crypto::{FnSigner, PrivateKey, Signer};
///
/// let key = PrivateKey::generate();
/// let public_key = key.public_key();
/// let remote = FnSigner::new(public_key, move |bytes| Ok(key.sign(bytes)));
/// assert_eq!(remote.public_key(), public_key);
/// ```
pub struct FnSigner<F> {
    public_key: PublicKey,
    sign_fn: F,
}

impl<F> FnSigner<F>
where
    F: Fn(&[u8]) -> Result<Signature, SignerError> + Send + Sync,
{
    /// Wrap `sign_fn` as the signer for `public_key`.
    pub fn new(public_key: PublicKey, sign_fn: F) -> Self {
        Self {
            public_key,
            sign_fn,
        }
    }
}

impl<F> Signer for FnSigner<F>
where
    F: Fn(&[u8]) -> Result<Signature, SignerError> + Send + Sync,
{
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        (self.sign_fn)(message)
    }
}
