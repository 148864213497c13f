//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use vellum::{Client, ClientConfig, IdentityRegistry, SharedClient};
use vellum_core::{BundleId, ContentDigest, Message, RecordWrapper, Scope, ScopeId};
use vellum_crypto::{Affiliate, EncryptionKeyRef, PartyType, SigningKeypair, X25519StaticSecret};
use vellum_store::{MemoryObjectStore, StorageClient};

use crate::samples::sample_provider;

/// Storage client that logs every fetch before delegating.
pub struct RecordingStorage<S> {
    inner: S,
    fetches: Mutex<Vec<ContentDigest>>,
}

impl<S> RecordingStorage<S> {
    /// Wrap `inner`, recording nothing yet.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Hashes fetched so far, in call order.
    pub fn fetches(&self) -> Vec<ContentDigest> {
        self.fetches.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of fetches so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<S: StorageClient> StorageClient for RecordingStorage<S> {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> vellum_store::Result<Bytes> {
        self.fetches.lock().unwrap_or_else(PoisonError::into_inner).push(*hash);
        self.inner.fetch(type_name, hash, affiliate)
    }
}

/// An affiliate with deterministic keys derived from `seed`.
///
/// The encryption secret is a blake3 derivation of the seed, so seeds that
/// differ only in bits cleared by X25519 clamping still give distinct keys.
pub fn affiliate_from_seed(party_type: PartyType, seed: [u8; 32]) -> Affiliate {
    let encryption_seed = blake3::derive_key("vellum-testkit affiliate encryption key", &seed);
    Affiliate::new(
        party_type,
        SigningKeypair::from_seed(&seed),
        EncryptionKeyRef::new(X25519StaticSecret::from_bytes(encryption_seed)),
    )
}

/// A test fixture: one affiliate, an object store, and a client over both.
///
/// The client's cache is disabled so every hydration reaches the recorder.
pub struct TestFixture {
    pub affiliate: Affiliate,
    pub bundle_id: BundleId,
    pub store: Arc<MemoryObjectStore>,
    pub storage: Arc<RecordingStorage<Arc<MemoryObjectStore>>>,
    pub shared: Arc<SharedClient>,
    pub client: Client,
}

impl TestFixture {
    /// Create a new test fixture with a random affiliate.
    pub fn new() -> Self {
        Self::with_affiliate(Affiliate::generate(PartyType::Originator))
    }

    /// Create a fixture for `affiliate`, with caching disabled.
    pub fn with_affiliate(affiliate: Affiliate) -> Self {
        let config = ClientConfig {
            cache_capacity: 0,
            ..ClientConfig::default()
        };
        Self::with_config(affiliate, config)
    }

    /// Create a fixture for `affiliate` using `config` as given.
    pub fn with_config(affiliate: Affiliate, config: ClientConfig) -> Self {
        let bundle_id = BundleId::random();
        let registry = Arc::new(IdentityRegistry::init([sample_provider(bundle_id)]));
        let store = Arc::new(config.memory_store());
        let storage = Arc::new(RecordingStorage::new(store.clone()));
        let shared = Arc::new(SharedClient::new(config, registry, storage.clone()));
        let client = match Client::new(shared.clone(), affiliate.clone()) {
            Ok(client) => client,
            Err(err) => panic!("fresh shared client rejected affiliate: {err}"),
        };

        Self {
            affiliate,
            bundle_id,
            store,
            storage,
            shared,
            client,
        }
    }

    /// Store `message` for this fixture's affiliate and return a wrapper for it.
    pub fn put<M: Message>(&self, name: &str, message: &M) -> RecordWrapper {
        let hash = match self.store.put_message(message, &[self.affiliate.encryption_public_key()]) {
            Ok(hash) => hash,
            Err(err) => panic!("storing {} failed: {err}", M::TYPE_NAME),
        };
        RecordWrapper::new(name, M::TYPE_NAME, hash)
    }

    /// A scope with a fresh id over `records`.
    pub fn scope(&self, records: Vec<RecordWrapper>) -> Scope {
        Scope::new(ScopeId::random(), records)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic affiliates of distinct party types.
pub fn multi_party_affiliates(count: usize) -> Vec<Affiliate> {
    const PARTIES: [PartyType; 4] = [
        PartyType::Originator,
        PartyType::Servicer,
        PartyType::Investor,
        PartyType::Custodian,
    ];
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            affiliate_from_seed(PARTIES[i % PARTIES.len()], seed)
        })
        .collect()
}
