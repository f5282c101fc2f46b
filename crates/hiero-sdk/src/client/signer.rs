//! Signer trait and implementations.
//!
//! A [`Signer`] produces signatures for one public key. [`PrivateKey`]
//! implements it directly; [`FnSigner`] wraps a closure so signing can be
//! delegated to an HSM, a remote service, or a hardware wallet.
//!
//! # Example
//!
//! ```rust,no_run
//! use hiero_sdk::{AccountId, Client, PrivateKey};
//!
//! # fn example() -> Result<(), hiero_sdk::Error> {
//! let key: PrivateKey = "302e020100300506032b6570042204209d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60".parse()?;
//!
//! let client = Client::for_testnet();
//! client.set_operator(AccountId::from_num(1001), key);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::SignerError;
use crate::types::{AccountId, PrivateKey, PublicKey};

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for anything that can sign transaction bodies.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use hiero_sdk::{PublicKey, Signer, SignerError};
///
/// struct KmsSigner {
///     public_key: PublicKey,
///     key_name: String,
/// }
///
/// impl Signer for KmsSigner {
///     fn public_key(&self) -> PublicKey {
///         self.public_key.clone()
///     }
///
///     fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
///         kms::sign(&self.key_name, message)
///             .map_err(|e| SignerError::SigningFailed(e.to_string()))
///     }
/// }
/// ```
pub trait Signer: Send + Sync {
    /// The public key signatures verify against.
    fn public_key(&self) -> PublicKey;

    /// Sign a message, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

impl Signer for PrivateKey {
    fn public_key(&self) -> PublicKey {
        PrivateKey::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        PrivateKey::sign(self, message)
    }
}

/// Implement `Signer` for `Arc<dyn Signer>` for convenience.
impl Signer for Arc<dyn Signer> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        (**self).sign(message)
    }
}

// ============================================================================
// FnSigner
// ============================================================================

type SignFn = dyn Fn(&[u8]) -> Result<Vec<u8>, SignerError> + Send + Sync;

/// A signer backed by a closure.
///
/// ```rust
/// use hiero_sdk::{FnSigner, PrivateKey, Signer};
///
/// let key = PrivateKey::generate_ed25519();
/// let public_key = key.public_key();
/// let signer = FnSigner::new(public_key.clone(), move |message| key.sign(message));
///
/// let signature = signer.sign(b"body").unwrap();
/// assert!(public_key.verify(b"body", &signature));
/// ```
#[derive(Clone)]
pub struct FnSigner {
    public_key: PublicKey,
    sign: Arc<SignFn>,
}

impl FnSigner {
    pub fn new(
        public_key: PublicKey,
        sign: impl Fn(&[u8]) -> Result<Vec<u8>, SignerError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            public_key,
            sign: Arc::new(sign),
        }
    }
}

impl Signer for FnSigner {
    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        (self.sign)(message)
    }
}

impl fmt::Debug for FnSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSigner")
            .field("public_key", &self.public_key)
            .finish()
    }
}

// ============================================================================
// Operator
// ============================================================================

/// The account that pays for transactions and queries, with its signer.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub(crate) signer: Arc<dyn Signer>,
}

impl Operator {
    pub fn new(account_id: AccountId, signer: impl Signer + 'static) -> Self {
        Self {
            account_id,
            signer: Arc::new(signer),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn signer(&self) -> &Arc<dyn Signer> {
        &self.signer
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("public_key", &self.signer.public_key())
            .finish()
    }
}
