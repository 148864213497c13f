//! Session drafts.
//!
//! A [`SessionBuilder`] collects contract specifications, provenance
//! references and participants for one scope. [`SessionBuilder::build`]
//! freezes it into a [`Session`]. Submitting a session is not handled here.

use serde::{Deserialize, Serialize};
use vellum_core::{ProvenanceReference, Scope, ScopeId, SessionId, SpecificationId};
use vellum_crypto::{Affiliate, EncodedPublicKey, PartyType};

use crate::contract::ContractSpec;
use crate::error::{Result, VellumError};

/// A session participant as embedded in the submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub party_type: PartyType,
    pub encryption_key: EncodedPublicKey,
    pub signing_key: EncodedPublicKey,
}

impl Participant {
    /// Participant entry carrying the affiliate's public keys.
    pub fn from_affiliate(affiliate: &Affiliate) -> Self {
        Self {
            party_type: affiliate.party_type,
            encryption_key: EncodedPublicKey::encode(&affiliate.encryption_public_key()),
            signing_key: EncodedPublicKey::encode(&affiliate.signing_public_key()),
        }
    }
}

/// Template for a scope that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSpecification {
    pub specification_id: SpecificationId,
    pub name: String,
    pub description: String,
    pub parties_involved: Vec<PartyType>,
}

impl ScopeSpecification {
    /// A specification with no description.
    pub fn new(name: impl Into<String>, parties_involved: Vec<PartyType>) -> Self {
        Self {
            specification_id: SpecificationId::random(),
            name: name.into(),
            description: String::new(),
            parties_involved,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An existing session the draft continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub name: String,
}

/// What the session operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionTarget {
    /// A scope that already holds records.
    Scope(Scope),
    /// A scope created by this session.
    Specification {
        scope_id: ScopeId,
        specification: ScopeSpecification,
    },
}

impl SessionTarget {
    pub fn scope_id(&self) -> ScopeId {
        match self {
            SessionTarget::Scope(scope) => scope.scope_id,
            SessionTarget::Specification { scope_id, .. } => *scope_id,
        }
    }
}

/// A finalised session draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    target: SessionTarget,
    existing: Option<SessionRecord>,
    contract_specs: Vec<ContractSpec>,
    provenance: Vec<ProvenanceReference>,
    participants: Vec<Participant>,
}

impl Session {
    /// Scope or specification the session runs against.
    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    pub fn scope_id(&self) -> ScopeId {
        self.target.scope_id()
    }

    /// Session being continued, if any.
    pub fn existing_session(&self) -> Option<&SessionRecord> {
        self.existing.as_ref()
    }

    pub fn contract_specs(&self) -> &[ContractSpec] {
        &self.contract_specs
    }

    pub fn provenance(&self) -> &[ProvenanceReference] {
        &self.provenance
    }

    /// Parties that sign the session.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }
}

/// Mutable draft of a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    target: Option<SessionTarget>,
    existing: Option<SessionRecord>,
    contract_specs: Vec<ContractSpec>,
    provenance: Vec<ProvenanceReference>,
    participants: Vec<Participant>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an existing scope.
    pub fn set_scope(&mut self, scope: Scope) -> &mut Self {
        self.target = Some(SessionTarget::Scope(scope));
        self
    }

    /// Target a scope to be created from `specification`.
    pub fn set_scope_specification(&mut self, scope_id: ScopeId, specification: ScopeSpecification) -> &mut Self {
        self.target = Some(SessionTarget::Specification {
            scope_id,
            specification,
        });
        self
    }

    /// Continue `session` instead of starting a new one.
    pub fn set_existing_session(&mut self, session: SessionRecord) -> &mut Self {
        self.existing = Some(session);
        self
    }

    /// Append a contract to run.
    pub fn add_contract_spec(&mut self, spec: ContractSpec) -> &mut Self {
        self.contract_specs.push(spec);
        self
    }

    /// Duplicate references are kept once.
    pub fn add_provenance_reference(&mut self, reference: ProvenanceReference) -> &mut Self {
        if !self.provenance.contains(&reference) {
            self.provenance.push(reference);
        }
        self
    }

    /// Append a participant.
    pub fn add_participant(&mut self, participant: Participant) -> &mut Self {
        self.participants.push(participant);
        self
    }

    pub fn target(&self) -> Option<&SessionTarget> {
        self.target.as_ref()
    }

    pub fn contract_specs(&self) -> &[ContractSpec] {
        &self.contract_specs
    }

    pub fn provenance(&self) -> &[ProvenanceReference] {
        &self.provenance
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Finish the draft. Fails if no target was set.
    pub fn build(self) -> Result<Session> {
        let target = self
            .target
            .ok_or_else(|| VellumError::InvalidSession("no scope or scope specification".into()))?;
        if self.contract_specs.is_empty() {
            return Err(VellumError::InvalidSession("no contract specification".into()));
        }
        Ok(Session {
            target,
            existing: self.existing,
            contract_specs: self.contract_specs,
            provenance: self.provenance,
            participants: self.participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::ContentDigest;

    fn spec() -> ContractSpec {
        ContractSpec {
            name: "test.Contract".into(),
            contract_ref: ContentDigest::of(b"c").into(),
            proto_ref: ContentDigest::of(b"p").into(),
            parties_involved: vec![PartyType::Owner],
            input_specs: Vec::new(),
            function_specs: Vec::new(),
        }
    }

    #[test]
    fn test_build_requires_target() {
        let mut builder = SessionBuilder::new();
        builder.add_contract_spec(spec());
        assert!(matches!(builder.build(), Err(VellumError::InvalidSession(_))));
    }

    #[test]
    fn test_build_requires_contract_spec() {
        let mut builder = SessionBuilder::new();
        builder.set_scope(Scope::new(ScopeId::random(), Vec::new()));
        assert!(matches!(builder.build(), Err(VellumError::InvalidSession(_))));
    }

    #[test]
    fn test_provenance_is_deduplicated() {
        let reference: ProvenanceReference = ContentDigest::of(b"p").into();
        let mut builder = SessionBuilder::new();
        builder
            .add_provenance_reference(reference)
            .add_provenance_reference(reference);
        assert_eq!(builder.provenance(), &[reference]);
    }

    #[test]
    fn test_participant_encodes_both_keys() {
        let affiliate = Affiliate::generate(PartyType::Servicer);
        let participant = Participant::from_affiliate(&affiliate);

        assert_eq!(participant.party_type, PartyType::Servicer);
        assert_eq!(
            participant.encryption_key.to_x25519().unwrap(),
            affiliate.encryption_public_key()
        );
        assert_ne!(participant.encryption_key, participant.signing_key);
    }

    #[test]
    fn test_specification_target_reports_scope_id() {
        let scope_id = ScopeId::random();
        let mut builder = SessionBuilder::new();
        builder
            .set_scope_specification(scope_id, ScopeSpecification::new("loan", vec![PartyType::Owner]))
            .add_contract_spec(spec());

        let session = builder.build().unwrap();
        assert_eq!(session.scope_id(), scope_id);
        assert!(session.existing_session().is_none());
    }
}
