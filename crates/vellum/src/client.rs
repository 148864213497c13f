//! Client entry points.
//!
//! A [`SharedClient`] owns the storage channel, the configuration and a
//! handle on the identity registry. Each affiliate gets its own [`Client`]
//! bound to a shared one.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};
use vellum_core::{Scope, ScopeId};
use vellum_crypto::{Affiliate, X25519PublicKey};
use vellum_store::{CachingStorageClient, StorageChannel, StorageClient};

use crate::config::ClientConfig;
use crate::contract::{dehydrate_spec, Contract};
use crate::error::{Result, VellumError};
use crate::hydrate::{hydrate, Hydrate};
use crate::registry::IdentityRegistry;
use crate::session::{Participant, ScopeSpecification, SessionBuilder, SessionRecord};

/// Process-wide client state shared by every [`Client`].
pub struct SharedClient {
    config: ClientConfig,
    channel: StorageChannel,
    registry: Arc<IdentityRegistry>,
    affiliates: Mutex<HashSet<X25519PublicKey>>,
}

impl SharedClient {
    /// Open a channel over `storage`, behind a cache unless
    /// `config.cache_capacity` is zero.
    pub fn new(config: ClientConfig, registry: Arc<IdentityRegistry>, storage: impl StorageClient + 'static) -> Self {
        let channel = if config.cache_capacity > 0 {
            StorageChannel::open(CachingStorageClient::new(storage, config.cache_capacity))
        } else {
            StorageChannel::open(storage)
        };
        info!(cache_capacity = config.cache_capacity, "shared client opened");
        Self {
            config,
            channel,
            registry,
            affiliates: Mutex::new(HashSet::new()),
        }
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Bundle registry used for hash resolution.
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Channel all fetches go through.
    pub fn storage(&self) -> &StorageChannel {
        &self.channel
    }

    /// False once `close` has run.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Close the storage channel, draining in-flight fetches for up to
    /// `config.drain_timeout`.
    pub fn close(&self) -> Result<()> {
        self.channel.close(self.config.drain_timeout)?;
        Ok(())
    }

    /// Affiliates registered with this client.
    pub fn affiliate_count(&self) -> usize {
        self.affiliates.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn bind(&self, affiliate: &Affiliate) -> Result<()> {
        let key = affiliate.encryption_public_key();
        let mut affiliates = self.affiliates.lock().unwrap_or_else(PoisonError::into_inner);
        if !affiliates.insert(key) {
            return Err(VellumError::DuplicateAffiliate {
                party_type: affiliate.party_type,
                public_key: key,
            });
        }
        debug!(party = %affiliate.party_type, "affiliate bound");
        Ok(())
    }

    fn unbind(&self, key: &X25519PublicKey) {
        self.affiliates.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

/// A [`SharedClient`] acting as one affiliate.
///
/// Dropping the client releases the affiliate so it can be bound again.
pub struct Client {
    inner: Arc<SharedClient>,
    affiliate: Affiliate,
}

impl Client {
    /// Bind `affiliate` to `inner`. Each encryption key may be bound once.
    pub fn new(inner: Arc<SharedClient>, affiliate: Affiliate) -> Result<Self> {
        inner.bind(&affiliate)?;
        Ok(Self { inner, affiliate })
    }

    /// Affiliate this client acts as.
    pub fn affiliate(&self) -> &Affiliate {
        &self.affiliate
    }

    pub fn shared(&self) -> &Arc<SharedClient> {
        &self.inner
    }

    /// Draft a session running contract `C` against an existing scope.
    pub fn new_session<C: Contract>(&self, scope: &Scope, session: Option<&SessionRecord>) -> Result<SessionBuilder> {
        let mut builder = self.contract_session::<C>(session)?;
        builder.set_scope(scope.clone());
        Ok(builder)
    }

    /// Draft a session running contract `C` that creates a scope from
    /// `specification`. The scope id is freshly allocated.
    pub fn new_session_for_spec<C: Contract>(
        &self,
        specification: &ScopeSpecification,
        session: Option<&SessionRecord>,
    ) -> Result<SessionBuilder> {
        let mut builder = self.contract_session::<C>(session)?;
        builder.set_scope_specification(ScopeId::random(), specification.clone());
        Ok(builder)
    }

    fn contract_session<C: Contract>(&self, session: Option<&SessionRecord>) -> Result<SessionBuilder> {
        let output = C::shape().first_message_output().ok_or_else(|| {
            VellumError::definition(C::TYPE_NAME, "contract declares no function returning a message")
        })?;

        let registry = self.inner.registry();
        let contract = registry.resolve_contract_hash(C::TYPE_NAME)?;
        let proto = registry.resolve_proto_hash(contract.bundle_id, output)?;
        let contract_ref = contract.reference();
        let proto_ref = proto.reference();
        let spec = dehydrate_spec::<C>(contract_ref, proto_ref)?;

        debug!(
            contract = C::TYPE_NAME,
            bundle = %contract.bundle_id,
            functions = spec.function_specs.len(),
            "session drafted"
        );

        let mut builder = SessionBuilder::new();
        if let Some(session) = session {
            builder.set_existing_session(session.clone());
        }
        builder
            .add_contract_spec(spec)
            .add_provenance_reference(contract_ref)
            .add_provenance_reference(proto_ref)
            .add_participant(Participant::from_affiliate(&self.affiliate));
        Ok(builder)
    }

    /// Rebuild a `T` from the records of `scope`.
    pub fn hydrate<T: Hydrate>(&self, scope: &Scope) -> Result<T> {
        hydrate(self.inner.storage(), &self.affiliate, scope)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.inner.unbind(&self.affiliate.encryption_public_key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_crypto::PartyType;
    use vellum_store::MemoryObjectStore;

    fn shared() -> Arc<SharedClient> {
        Arc::new(SharedClient::new(
            ClientConfig::default(),
            Arc::new(IdentityRegistry::default()),
            MemoryObjectStore::new(),
        ))
    }

    #[test]
    fn test_affiliate_binds_once() {
        let shared = shared();
        let affiliate = Affiliate::generate(PartyType::Owner);

        let client = Client::new(shared.clone(), affiliate.clone()).unwrap();
        assert!(matches!(
            Client::new(shared.clone(), affiliate.clone()),
            Err(VellumError::DuplicateAffiliate {
                party_type: PartyType::Owner,
                ..
            })
        ));
        assert_eq!(shared.affiliate_count(), 1);

        drop(client);
        assert_eq!(shared.affiliate_count(), 0);
        assert!(Client::new(shared, affiliate).is_ok());
    }

    #[test]
    fn test_close_is_idempotent() {
        let shared = shared();
        shared.close().unwrap();
        shared.close().unwrap();
        assert!(!shared.is_open());
    }
}
