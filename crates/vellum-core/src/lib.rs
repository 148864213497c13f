//! # Vellum Core
//!
//! Pure primitives for Vellum: content digests, checksums, chunked reads,
//! and the scope data model.
//!
//! This crate contains no storage and no networking. Apart from consuming
//! readers in [`io`], everything here is pure computation.
//!
//! ## Key Types
//!
//! - [`ContentDigest`] - SHA-512 content address of a stored object
//! - [`Checksum`] - CRC-32C transport checksum
//! - [`Scope`] / [`RecordWrapper`] - stored record references
//! - [`ProvenanceReference`] - hash-only pointer to code or message bundles
//! - [`Message`] - a structured, type-identified record payload

pub mod digest;
pub mod encoding;
pub mod error;
pub mod io;
pub mod message;
pub mod scope;
pub mod types;

pub use digest::{Checksum, ContentDigest, DIGEST_LEN};
pub use encoding::{base64_decode, base64_encode, to_hex};
pub use error::{CoreError, Result};
pub use io::{read_exact, read_exact_chunked, CHUNK_SIZE};
pub use message::Message;
pub use scope::{Record, RecordWrapper, Scope};
pub use types::{object_path, BundleId, ProvenanceReference, ScopeId, SessionId, SpecificationId};
