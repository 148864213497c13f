//! Canonical public-key encoding for session participant records.
//!
//! Layout: one curve tag byte followed by the raw 32-byte key.

use serde::{Deserialize, Serialize};

use crate::crypto::X25519PublicKey;
use crate::error::{CryptoError, Result};
use crate::keys::SigningPublicKey;

/// Curve tag, the first byte of an encoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KeyCurve {
    X25519 = 0x01,
    Ed25519 = 0x02,
}

impl KeyCurve {
    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0x01 => Ok(Self::X25519),
            0x02 => Ok(Self::Ed25519),
            other => Err(CryptoError::InvalidPublicKey(format!("unknown curve tag {other:#04x}"))),
        }
    }
}

/// Elliptic-curve public keys with a canonical encoding.
pub trait PublicKeyEncoding {
    const CURVE: KeyCurve;

    fn key_bytes(&self) -> [u8; 32];
}

impl PublicKeyEncoding for X25519PublicKey {
    const CURVE: KeyCurve = KeyCurve::X25519;

    fn key_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl PublicKeyEncoding for SigningPublicKey {
    const CURVE: KeyCurve = KeyCurve::Ed25519;

    fn key_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// A public key in its canonical, curve-tagged form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedPublicKey {
    pub curve: KeyCurve,
    pub key: [u8; 32],
}

impl EncodedPublicKey {
    /// Encode a public key with its algorithm tag.
    pub fn encode<K: PublicKeyEncoding>(public_key: &K) -> Self {
        Self {
            curve: K::CURVE,
            key: public_key.key_bytes(),
        }
    }

    /// Canonical bytes: tag, then key.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(33);
        out.push(self.curve as u8);
        out.extend_from_slice(&self.key);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, key) = bytes
            .split_first()
            .ok_or_else(|| CryptoError::InvalidPublicKey("empty encoding".into()))?;
        let curve = KeyCurve::from_tag(tag)?;
        let key: [u8; 32] = key.try_into().map_err(|_| {
            CryptoError::InvalidPublicKey(format!("expected 32 key bytes, got {}", key.len()))
        })?;
        Ok(Self { curve, key })
    }

    /// Decode as an X25519 key.
    pub fn to_x25519(&self) -> Result<X25519PublicKey> {
        match self.curve {
            KeyCurve::X25519 => Ok(X25519PublicKey(self.key)),
            other => Err(CryptoError::InvalidPublicKey(format!("expected X25519, got {other:?}"))),
        }
    }
}
