//! Symmetric encryption and X25519 key agreement.
//!
//! Objects are sealed with ChaCha20-Poly1305 under a per-object content key;
//! the content key reaches each reader through an X25519 key share.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use vellum_core::base64_encode;

use crate::error::{CryptoError, Result};

const KEY_WRAP_DOMAIN: &str = "vellum-object-store-v1 key wrap";

/// An X25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519({})", base64_encode(&self.0))
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

/// An X25519 static secret, the long-lived half of an affiliate's
/// encryption key.
#[derive(Clone)]
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(StaticSecret::from(bytes))
    }

    /// Create from raw bytes, clamped per X25519.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Shared secret with `peer_public`.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> SharedKey {
        SharedKey(*self.0.diffie_hellman(&peer_public.to_dalek()).as_bytes())
    }
}

impl fmt::Debug for X25519StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519StaticSecret({:?})", self.public_key())
    }
}

/// One-shot X25519 key pair used by the sealing side of a key share.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: X25519PublicKey,
}

impl EphemeralKeyPair {
    /// Fresh random ephemeral keypair.
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(rand::thread_rng());
        let public = X25519PublicKey::from(PublicKey::from(&secret));
        Self { secret, public }
    }

    pub fn public_key(&self) -> X25519PublicKey {
        self.public
    }

    /// Consumes the secret; an ephemeral key agrees exactly once.
    pub fn diffie_hellman(self, peer_public: &X25519PublicKey) -> SharedKey {
        SharedKey(*self.secret.diffie_hellman(&peer_public.to_dalek()).as_bytes())
    }
}

/// Raw X25519 agreement output. Never used as a key directly.
pub struct SharedKey([u8; 32]);

impl SharedKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the key-wrapping key for one object.
    ///
    /// `context` binds the wrap key to the object it protects.
    pub fn derive_wrap_key(&self, context: &[u8]) -> EncryptionKey {
        let mut hasher = blake3::Hasher::new_derive_key(KEY_WRAP_DOMAIN);
        hasher.update(&self.0);
        hasher.update(context);
        EncryptionKey(*hasher.finalize().as_bytes())
    }
}

/// A 256-bit ChaCha20-Poly1305 key.
#[derive(Clone)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypt `plaintext` under this key and `nonce`.
    pub fn encrypt(&self, plaintext: &[u8], nonce: &EncryptionNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))?;
        cipher
            .encrypt(Nonce::from_slice(&nonce.0), plaintext)
            .map_err(|e| CryptoError::EncryptionError(e.to_string()))
    }

    /// Decrypt and authenticate `ciphertext`.
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &EncryptionNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(&nonce.0), ciphertext)
            .map_err(|e| CryptoError::DecryptionError(e.to_string()))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// A 96-bit ChaCha20-Poly1305 nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionNonce(pub [u8; 12]);

impl EncryptionNonce {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_ephemeral_agree() {
        let reader = X25519StaticSecret::generate();
        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();

        let sealer_side = ephemeral.diffie_hellman(&reader.public_key());
        let reader_side = reader.diffie_hellman(&ephemeral_public);

        assert_eq!(sealer_side.as_bytes(), reader_side.as_bytes());
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = EncryptionKey::generate();
        let nonce = EncryptionNonce::generate();

        let ciphertext = key.encrypt(b"record bytes", &nonce).unwrap();
        assert_ne!(ciphertext, b"record bytes");
        assert_eq!(key.decrypt(&ciphertext, &nonce).unwrap(), b"record bytes");
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let nonce = EncryptionNonce::generate();
        let ciphertext = EncryptionKey::generate().encrypt(b"secret", &nonce).unwrap();

        assert!(matches!(
            EncryptionKey::generate().decrypt(&ciphertext, &nonce),
            Err(CryptoError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_wrap_key_bound_to_context() {
        let shared = SharedKey([0x42; 32]);

        let a1 = shared.derive_wrap_key(b"object-a");
        let a2 = shared.derive_wrap_key(b"object-a");
        let b = shared.derive_wrap_key(b"object-b");

        assert_eq!(a1.as_bytes(), a2.as_bytes());
        assert_ne!(a1.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_secret_from_bytes_is_deterministic() {
        let s1 = X25519StaticSecret::from_bytes([7; 32]);
        let s2 = X25519StaticSecret::from_bytes([7; 32]);
        assert_eq!(s1.public_key(), s2.public_key());
    }
}
