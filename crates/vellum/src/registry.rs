//! Identity registry: code hashes for deployed contract and message bundles.
//!
//! Every bundle ships a [`HashProvider`] alongside its compiled artifacts.
//! [`IdentityRegistry::init`] loads all providers once, at startup, into a
//! read-only table. After that every lookup is an in-memory index probe.

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use tracing::{debug, info};
use vellum_core::{BundleId, ContentDigest, ProvenanceReference};

use crate::error::{ResolutionFailure, Result, VellumError};

/// A deployed bundle's hash and the fully-qualified types it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeHashEntry {
    pub bundle_id: BundleId,
    pub hash: ContentDigest,
    classes: BTreeMap<String, bool>,
}

impl CodeHashEntry {
    /// Entry for a bundle containing every type in `classes`.
    pub fn new<I, S>(bundle_id: BundleId, hash: ContentDigest, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bundle_id,
            hash,
            classes: classes.into_iter().map(|c| (c.into(), true)).collect(),
        }
    }

    /// Entry whose hash is the digest of the bundle's bytes.
    pub fn from_bundle<I, S>(bundle_id: BundleId, bundle: &[u8], classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(bundle_id, ContentDigest::of(bundle), classes)
    }

    /// Record an explicit membership flag. `false` hides a type that is
    /// present in the bundle but not addressable through it.
    pub fn with_class(mut self, type_name: impl Into<String>, member: bool) -> Self {
        self.classes.insert(type_name.into(), member);
        self
    }

    /// True if `type_name` is addressable through this bundle.
    pub fn contains(&self, type_name: &str) -> bool {
        self.classes.get(type_name).copied().unwrap_or(false)
    }

    /// Addressable type names.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes
            .iter()
            .filter(|(_, member)| **member)
            .map(|(name, _)| name.as_str())
    }

    /// Provenance reference for the bundle hash.
    pub fn reference(&self) -> ProvenanceReference {
        ProvenanceReference::new(self.hash)
    }
}

/// Hash of a contract bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHash(pub CodeHashEntry);

/// Hash of a message-type bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoHash(pub CodeHashEntry);

impl Deref for ContractHash {
    type Target = CodeHashEntry;

    fn deref(&self) -> &CodeHashEntry {
        &self.0
    }
}

impl Deref for ProtoHash {
    type Target = CodeHashEntry;

    fn deref(&self) -> &CodeHashEntry {
        &self.0
    }
}

/// Source of code hash entries, implemented once per shipped bundle.
pub trait HashProvider {
    fn contract_hashes(&self) -> Vec<ContractHash> {
        Vec::new()
    }

    fn proto_hashes(&self) -> Vec<ProtoHash> {
        Vec::new()
    }
}

impl<P: HashProvider + ?Sized> HashProvider for &P {
    fn contract_hashes(&self) -> Vec<ContractHash> {
        (**self).contract_hashes()
    }

    fn proto_hashes(&self) -> Vec<ProtoHash> {
        (**self).proto_hashes()
    }
}

impl<P: HashProvider + ?Sized> HashProvider for Box<P> {
    fn contract_hashes(&self) -> Vec<ContractHash> {
        (**self).contract_hashes()
    }

    fn proto_hashes(&self) -> Vec<ProtoHash> {
        (**self).proto_hashes()
    }
}

/// A provider assembled from literal entries.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    contracts: Vec<ContractHash>,
    protos: Vec<ProtoHash>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contract bundle.
    pub fn contract(mut self, entry: CodeHashEntry) -> Self {
        self.contracts.push(ContractHash(entry));
        self
    }

    /// Add a proto bundle.
    pub fn proto(mut self, entry: CodeHashEntry) -> Self {
        self.protos.push(ProtoHash(entry));
        self
    }
}

impl HashProvider for StaticProvider {
    fn contract_hashes(&self) -> Vec<ContractHash> {
        self.contracts.clone()
    }

    fn proto_hashes(&self) -> Vec<ProtoHash> {
        self.protos.clone()
    }
}

/// Read-only catalog of every registered code hash.
///
/// Build one with [`init`](Self::init) and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    contracts: Vec<ContractHash>,
    protos: Vec<ProtoHash>,
    /// type -> indices into `contracts`
    contract_index: HashMap<String, Vec<usize>>,
    /// (bundle, type) -> indices into `protos`
    proto_index: HashMap<(BundleId, String), Vec<usize>>,
}

impl IdentityRegistry {
    /// Load every provider's entries.
    pub fn init<I>(providers: I) -> Self
    where
        I: IntoIterator,
        I::Item: HashProvider,
    {
        let mut registry = Self::default();
        for provider in providers {
            for entry in provider.contract_hashes() {
                let idx = registry.contracts.len();
                for class in entry.classes() {
                    registry.contract_index.entry(class.to_string()).or_default().push(idx);
                }
                registry.contracts.push(entry);
            }
            for entry in provider.proto_hashes() {
                let idx = registry.protos.len();
                for class in entry.classes() {
                    registry
                        .proto_index
                        .entry((entry.bundle_id, class.to_string()))
                        .or_default()
                        .push(idx);
                }
                registry.protos.push(entry);
            }
        }

        info!(
            contracts = registry.contracts.len(),
            protos = registry.protos.len(),
            "identity registry initialised"
        );
        registry
    }

    /// The unique contract hash listing `type_name`.
    pub fn resolve_contract_hash(&self, type_name: &str) -> Result<&ContractHash> {
        let candidates = self.contract_index.get(type_name).map(Vec::as_slice).unwrap_or(&[]);
        let idx = unique(candidates, type_name, None)?;
        let entry = &self.contracts[idx];
        debug!(type_name, bundle = %entry.bundle_id, hash = %entry.hash, "resolved contract hash");
        Ok(entry)
    }

    /// The unique proto hash in `bundle_id` listing `type_name`.
    pub fn resolve_proto_hash(&self, bundle_id: BundleId, type_name: &str) -> Result<&ProtoHash> {
        let candidates = self
            .proto_index
            .get(&(bundle_id, type_name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let idx = unique(candidates, type_name, Some(bundle_id))?;
        let entry = &self.protos[idx];
        debug!(type_name, bundle = %bundle_id, hash = %entry.hash, "resolved proto hash");
        Ok(entry)
    }

    /// Contract bundles across all providers.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    /// Proto bundles across all providers.
    pub fn proto_count(&self) -> usize {
        self.protos.len()
    }
}

fn unique(candidates: &[usize], type_name: &str, bundle_id: Option<BundleId>) -> Result<usize> {
    match candidates {
        [idx] => Ok(*idx),
        [] => Err(resolution_error(type_name, bundle_id, ResolutionFailure::NoCandidate)),
        many => Err(resolution_error(
            type_name,
            bundle_id,
            ResolutionFailure::Ambiguous(many.len()),
        )),
    }
}

fn resolution_error(type_name: &str, bundle_id: Option<BundleId>, failure: ResolutionFailure) -> VellumError {
    VellumError::HashResolution {
        type_name: type_name.to_string(),
        bundle_id,
        failure,
    }
}
