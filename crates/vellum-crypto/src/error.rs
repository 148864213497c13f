//! Error types for the crypto module.

use thiserror::Error;

use crate::crypto::X25519PublicKey;

/// Errors from sealing, opening and key handling.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption error: {0}")]
    EncryptionError(String),

    #[error("decryption error: {0}")]
    DecryptionError(String),

    /// The object was not sealed for this reader.
    #[error("no key share for {0:?}")]
    NoKeyShare(X25519PublicKey),

    #[error("cannot seal an object for an empty audience")]
    EmptyAudience,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
