//! Error types for Vellum Core.

use thiserror::Error;

/// Errors from the core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("incomplete read: expected {expected} bytes, stream ended after {read}")]
    IncompleteRead { expected: usize, read: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("invalid digest length: expected 64 bytes, got {0}")]
    InvalidDigestLength(usize),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("checksum mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("failed to encode {type_name}: {reason}")]
    EncodingError { type_name: String, reason: String },

    #[error("failed to decode {type_name}: {reason}")]
    DecodingError { type_name: String, reason: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
