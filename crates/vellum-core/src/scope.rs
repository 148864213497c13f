//! Scopes and the record references they carry.
//!
//! A scope is handed to the client by the metadata service and is never
//! mutated afterwards. Records point at encrypted objects by content digest;
//! they never carry the bytes themselves.

use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;
use crate::types::{ScopeId, SpecificationId};

/// A stored record reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Binding name, matched against a constructor's record parameter.
    pub name: String,
    /// Fully-qualified type identifier of the stored content.
    pub result_type: String,
    /// Digest of the decrypted payload.
    pub result_hash: ContentDigest,
}

/// Envelope around a [`Record`], one per entry in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWrapper {
    pub record: Record,
}

impl RecordWrapper {
    /// Wrap a record bound to `name`.
    pub fn new(name: impl Into<String>, result_type: impl Into<String>, result_hash: ContentDigest) -> Self {
        Self {
            record: Record {
                name: name.into(),
                result_type: result_type.into(),
                result_hash,
            },
        }
    }

    /// True when both the name and the type identifier match.
    pub fn matches(&self, name: &str, result_type: &str) -> bool {
        self.record.name == name && self.record.result_type == result_type
    }
}

/// An ordered collection of record wrappers belonging to one data subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub scope_id: ScopeId,
    pub specification_id: Option<SpecificationId>,
    pub records: Vec<RecordWrapper>,
}

impl Scope {
    /// A scope with no specification.
    pub fn new(scope_id: ScopeId, records: Vec<RecordWrapper>) -> Self {
        Self {
            scope_id,
            specification_id: None,
            records,
        }
    }

    /// All records bound to `(name, result_type)`, in scope order.
    pub fn matching<'a>(&'a self, name: &'a str, result_type: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |w| w.matches(name, result_type))
            .map(|w| &w.record)
    }

    /// True if any record is bound to `(name, result_type)`.
    pub fn contains(&self, name: &str, result_type: &str) -> bool {
        self.matching(name, result_type).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
