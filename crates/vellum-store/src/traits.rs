//! StorageClient trait: the abstract interface to the encrypted object store.
//!
//! The hydration engine only ever talks to this trait. Transport, caching and
//! channel lifetime are all implementation concerns.

use std::sync::Arc;

use bytes::Bytes;
use vellum_core::ContentDigest;
use vellum_crypto::Affiliate;

use crate::error::Result;

/// Fetches decrypted object bytes by content digest.
///
/// # Contract
///
/// - `type_name` is the fully-qualified type of the stored content. It is
///   used for diagnostics, never for addressing.
/// - The returned bytes are decrypted for `affiliate` and have already been
///   verified against `hash`.
/// - Missing objects fail with [`StoreError::NotFound`](crate::StoreError::NotFound).
/// - Implementations decide their own retry policy; callers never retry.
pub trait StorageClient: Send + Sync {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes>;
}

impl<S: StorageClient + ?Sized> StorageClient for Arc<S> {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes> {
        (**self).fetch(type_name, hash, affiliate)
    }
}

impl<S: StorageClient + ?Sized> StorageClient for &S {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes> {
        (**self).fetch(type_name, hash, affiliate)
    }
}
