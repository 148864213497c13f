//! Error types for the store module.

use std::time::Duration;

use thiserror::Error;
use vellum_core::{ContentDigest, CoreError};
use vellum_crypto::CryptoError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing is stored at the hash.
    #[error("object not found: {type_name} at {hash}")]
    NotFound { type_name: String, hash: ContentDigest },

    /// Stored or decrypted bytes failed a checksum or digest check.
    #[error("integrity check failed for {hash}: {source}")]
    Integrity {
        hash: ContentDigest,
        #[source]
        source: CoreError,
    },

    /// Envelope could not be opened.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Chunked read or encoding failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The channel no longer accepts fetches.
    #[error("storage channel is closed")]
    Closed,

    /// `close` gave up waiting for in-flight fetches.
    #[error("storage channel did not drain within {timeout:?}: {in_flight} fetches still in flight")]
    DrainTimeout { timeout: Duration, in_flight: usize },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
