//! Strong type definitions for Vellum.
//!
//! Identifiers are newtypes so a bundle id can never be passed where a scope
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::digest::ContentDigest;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Allocate a fresh random id.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Grouping key shared by a contract bundle and its message-type bundle.
    BundleId
);

uuid_id!(
    /// Identifier of a scope.
    ScopeId
);

uuid_id!(
    /// Identifier of a scope specification.
    SpecificationId
);

uuid_id!(
    /// Identifier of a session.
    SessionId
);

/// A pointer to content by hash alone.
///
/// Used to reference contract code and message-type bundles without
/// embedding their bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceReference {
    pub hash: ContentDigest,
}

impl ProvenanceReference {
    pub const fn new(hash: ContentDigest) -> Self {
        Self { hash }
    }
}

impl From<ContentDigest> for ProvenanceReference {
    fn from(hash: ContentDigest) -> Self {
        Self { hash }
    }
}

/// Join a bucket and object name into an object-store path.
pub fn object_path(bucket: &str, name: &str) -> String {
    format!("{bucket}/{name}")
}
