//! # Vellum Store
//!
//! Client-side storage abstraction for Vellum. Everything that touches the
//! encrypted object store goes through the [`StorageClient`] trait.
//!
//! ## Key Types
//!
//! - [`StorageClient`] - fetch decrypted bytes by `(type, digest, affiliate)`
//! - [`MemoryObjectStore`] - in-memory encrypted object store
//! - [`CachingStorageClient`] - per-reader cache, one in-flight fetch per digest
//! - [`StorageChannel`] - explicit lifecycle with a bounded drain on close
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use vellum_crypto::{Affiliate, PartyType};
//! use vellum_store::{CachingStorageClient, MemoryObjectStore, StorageChannel, StorageClient};
//!
//! let owner = Affiliate::generate(PartyType::Owner);
//! let store = MemoryObjectStore::new();
//! let hash = store.put(b"record", &[owner.encryption_public_key()]).unwrap();
//!
//! let channel = StorageChannel::open(CachingStorageClient::new(store, 64));
//! assert_eq!(&channel.fetch("example.Record", &hash, &owner).unwrap()[..], b"record");
//! channel.close(Duration::from_secs(1)).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Integrity**: the memory store checks CRC-32C over the stored blob and
//!   the SHA-512 content digest over the decrypted payload.
//! - **No retries**: errors surface as-is; retry policy belongs to remote
//!   implementations.
//! - **Single flight**: the caching client never issues two concurrent inner
//!   fetches for the same digest.

pub mod cached;
pub mod channel;
pub mod error;
pub mod memory;
pub mod traits;

pub use cached::CachingStorageClient;
pub use channel::StorageChannel;
pub use error::{Result, StoreError};
pub use memory::MemoryObjectStore;
pub use traits::StorageClient;
