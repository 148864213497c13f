//! Caching storage client with single-flight fetches.
//!
//! Wraps any [`StorageClient`]. Decrypted bytes are cached per
//! `(content digest, reader key)`, and concurrent misses on the same digest
//! collapse into one inner fetch.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tracing::debug;

use vellum_core::ContentDigest;
use vellum_crypto::{Affiliate, X25519PublicKey};

use crate::error::Result;
use crate::traits::StorageClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    hash: ContentDigest,
    reader: X25519PublicKey,
}

#[derive(Default)]
struct Cache {
    entries: HashMap<CacheKey, Bytes>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
}

/// A [`StorageClient`] that caches another.
pub struct CachingStorageClient<S> {
    inner: S,
    capacity: usize,
    cache: Mutex<Cache>,
    gates: Mutex<HashMap<ContentDigest, Arc<Mutex<()>>>>,
}

impl<S: StorageClient> CachingStorageClient<S> {
    /// Cache at most `capacity` objects. Oldest entries are evicted first.
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: Mutex::new(Cache::default()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Entries currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    fn lookup(&self, key: &CacheKey) -> Option<Bytes> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(key)
            .cloned()
    }

    fn remember(&self, key: CacheKey, bytes: Bytes) {
        if self.capacity == 0 {
            return;
        }
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.entries.insert(key, bytes).is_none() {
            cache.order.push_back(key);
        }
        while cache.order.len() > self.capacity {
            if let Some(oldest) = cache.order.pop_front() {
                cache.entries.remove(&oldest);
            }
        }
    }

    fn gate(&self, hash: &ContentDigest) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(*hash)
            .or_default()
            .clone()
    }

    fn release_gate(&self, hash: &ContentDigest, gate: Arc<Mutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this caller hold it: nobody else is waiting.
        if Arc::strong_count(&gate) == 2 {
            gates.remove(hash);
        }
    }

    fn fetch_once(&self, key: CacheKey, type_name: &str, affiliate: &Affiliate) -> Result<Bytes> {
        if let Some(bytes) = self.lookup(&key) {
            debug!(hash = %key.hash, "cache hit after waiting on in-flight fetch");
            return Ok(bytes);
        }
        let bytes = self.inner.fetch(type_name, &key.hash, affiliate)?;
        self.remember(key, bytes.clone());
        Ok(bytes)
    }
}

impl<S: StorageClient> StorageClient for CachingStorageClient<S> {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes> {
        let key = CacheKey {
            hash: *hash,
            reader: affiliate.encryption_public_key(),
        };
        if let Some(bytes) = self.lookup(&key) {
            debug!(type_name, %hash, "cache hit");
            return Ok(bytes);
        }

        let gate = self.gate(hash);
        let result = {
            let _flight = gate.lock().unwrap_or_else(PoisonError::into_inner);
            self.fetch_once(key, type_name, affiliate)
        };
        self.release_gate(hash, gate);
        result
    }
}
