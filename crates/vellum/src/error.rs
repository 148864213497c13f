//! Error types for Vellum.
//!
//! Every variant names the type identifier involved, and the scope or record
//! where one applies. Nothing here is retried internally.

use thiserror::Error;
use vellum_core::{BundleId, ContentDigest, CoreError, ScopeId};
use vellum_crypto::{CryptoError, PartyType, X25519PublicKey};
use vellum_store::StoreError;

/// Why a hash lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No entry lists the type.
    NoCandidate,
    /// Several entries list the type: a packaging defect.
    Ambiguous(usize),
}

impl std::fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionFailure::NoCandidate => f.write_str("no registered entry"),
            ResolutionFailure::Ambiguous(n) => write!(f, "{n} registered entries"),
        }
    }
}

/// Errors that can occur during Vellum operations.
#[derive(Debug, Error)]
pub enum VellumError {
    #[error("unable to resolve code hash for {type_name} (bundle {bundle_id:?}): {failure}")]
    HashResolution {
        type_name: String,
        bundle_id: Option<BundleId>,
        failure: ResolutionFailure,
    },

    /// The declared shape of a contract or hydratable type is unusable.
    #[error("invalid definition of {type_name}: {reason}")]
    ContractDefinition { type_name: String, reason: String },

    #[error("no matching record for {type_name} in scope {scope_id} (missing: [{}])", .missing.join(", "))]
    NoMatchingRecord {
        type_name: String,
        scope_id: ScopeId,
        missing: Vec<String>,
    },

    /// More than one wrapper is bound to the same `(name, type)`.
    #[error("scope {scope_id} holds {count} records named {record:?} of type {type_name}")]
    AmbiguousRecord {
        type_name: String,
        scope_id: ScopeId,
        record: String,
        count: usize,
    },

    #[error("record {record:?} of type {type_name} in scope {scope_id} not found at {hash}")]
    NotFound {
        type_name: String,
        record: String,
        scope_id: ScopeId,
        hash: ContentDigest,
    },

    #[error("affiliate {party_type} {public_key:?} is already bound to this client")]
    DuplicateAffiliate {
        party_type: PartyType,
        public_key: X25519PublicKey,
    },

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Decoding and incomplete-read failures.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl VellumError {
    pub(crate) fn definition(type_name: &str, reason: impl Into<String>) -> Self {
        VellumError::ContractDefinition {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for Vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;
