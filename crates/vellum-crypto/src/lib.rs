//! # Vellum Crypto
//!
//! Affiliate keys, canonical public-key encoding, and the encrypted object
//! envelope used by the object store.
//!
//! ## Encryption Model
//!
//! Stored objects use a two-layer key model:
//!
//! 1. **Content Key**: a per-object ChaCha20-Poly1305 key that seals the payload
//! 2. **Key Shares**: the content key wrapped for each reader via X25519 ECDH
//!
//! The wrap key is derived from the agreement output and the object's content
//! digest, so shares are bound to the object they were issued for.
//!
//! ## Usage
//!
//! ```rust
//! use vellum_crypto::{Affiliate, EncryptedObject, PartyType};
//!
//! let owner = Affiliate::generate(PartyType::Owner);
//! let sealed = EncryptedObject::seal(b"payload", b"digest", &[owner.encryption_public_key()]).unwrap();
//! assert_eq!(owner.encryption_key.open(&sealed, b"digest").unwrap(), b"payload");
//! ```

pub mod affiliate;
pub mod crypto;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod keys;

pub use affiliate::{Affiliate, EncryptionKeyRef, PartyType};
pub use crypto::{EncryptionKey, EncryptionNonce, EphemeralKeyPair, SharedKey, X25519PublicKey, X25519StaticSecret};
pub use encoding::{EncodedPublicKey, KeyCurve, PublicKeyEncoding};
pub use envelope::{EncryptedObject, EncryptionFormat, KeyShare};
pub use error::{CryptoError, Result};
pub use keys::{SigningKeypair, SigningPublicKey};
