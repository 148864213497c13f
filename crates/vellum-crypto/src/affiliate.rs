//! Participant identities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{X25519PublicKey, X25519StaticSecret};
use crate::envelope::EncryptedObject;
use crate::error::Result;
use crate::keys::{SigningKeypair, SigningPublicKey};

/// The role a participant plays in a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartyType {
    Originator,
    Servicer,
    Investor,
    Custodian,
    Owner,
    Affiliate,
    Omnibus,
    Provenance,
    Controller,
    Validator,
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartyType::Originator => "ORIGINATOR",
            PartyType::Servicer => "SERVICER",
            PartyType::Investor => "INVESTOR",
            PartyType::Custodian => "CUSTODIAN",
            PartyType::Owner => "OWNER",
            PartyType::Affiliate => "AFFILIATE",
            PartyType::Omnibus => "OMNIBUS",
            PartyType::Provenance => "PROVENANCE",
            PartyType::Controller => "CONTROLLER",
            PartyType::Validator => "VALIDATOR",
        };
        f.write_str(name)
    }
}

/// Reference to an affiliate's encryption key.
///
/// The secret never leaves this type; callers open objects through it.
#[derive(Clone)]
pub struct EncryptionKeyRef {
    secret: X25519StaticSecret,
}

impl EncryptionKeyRef {
    /// Wrap an existing secret.
    pub fn new(secret: X25519StaticSecret) -> Self {
        Self { secret }
    }

    pub fn generate() -> Self {
        Self::new(X25519StaticSecret::generate())
    }

    /// Public half of the encryption key.
    pub fn public_key(&self) -> X25519PublicKey {
        self.secret.public_key()
    }

    /// Decrypt an object sealed for this key.
    pub fn open(&self, object: &EncryptedObject, context: &[u8]) -> Result<Vec<u8>> {
        object.open(context, &self.secret)
    }
}

impl fmt::Debug for EncryptionKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKeyRef({:?})", self.public_key())
    }
}

/// A participant: party type plus signing and encryption keys.
#[derive(Debug, Clone)]
pub struct Affiliate {
    pub party_type: PartyType,
    pub signing_key: SigningKeypair,
    pub encryption_key: EncryptionKeyRef,
}

impl Affiliate {
    /// Create an affiliate from existing keys.
    pub fn new(party_type: PartyType, signing_key: SigningKeypair, encryption_key: EncryptionKeyRef) -> Self {
        Self {
            party_type,
            signing_key,
            encryption_key,
        }
    }

    /// Fresh random keys for `party_type`.
    pub fn generate(party_type: PartyType) -> Self {
        Self::new(party_type, SigningKeypair::generate(), EncryptionKeyRef::generate())
    }

    /// Key other parties encrypt records to.
    pub fn encryption_public_key(&self) -> X25519PublicKey {
        self.encryption_key.public_key()
    }

    /// Key that verifies this affiliate's signatures.
    pub fn signing_public_key(&self) -> SigningPublicKey {
        self.signing_key.public_key()
    }
}
