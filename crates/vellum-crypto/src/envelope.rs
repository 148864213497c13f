//! Encrypted object envelope.
//!
//! Each stored object is sealed once under a fresh content key. The content
//! key is then wrapped for every audience member with an X25519 key share,
//! so adding a reader never re-encrypts the payload.

use serde::{Deserialize, Serialize};

use crate::crypto::{EncryptionKey, EncryptionNonce, EphemeralKeyPair, X25519PublicKey, X25519StaticSecret};
use crate::error::{CryptoError, Result};

/// Format identifier for encrypted objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EncryptionFormat {
    /// ChaCha20-Poly1305 payload, X25519 + Blake3-derived key wrap.
    ChaCha20Poly1305 = 1,
}

/// The content key, wrapped for one reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyShare {
    /// Reader's X25519 public key.
    pub recipient: X25519PublicKey,
    /// Sealer's ephemeral public key.
    pub ephemeral_public: X25519PublicKey,
    /// Content key encrypted under the derived wrap key.
    pub wrapped_key: Vec<u8>,
    pub nonce: EncryptionNonce,
}

impl KeyShare {
    fn wrap(content_key: &EncryptionKey, context: &[u8], recipient: &X25519PublicKey) -> Result<Self> {
        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();
        let wrap_key = ephemeral.diffie_hellman(recipient).derive_wrap_key(context);

        let nonce = EncryptionNonce::generate();
        let wrapped_key = wrap_key.encrypt(content_key.as_bytes(), &nonce)?;

        Ok(Self {
            recipient: *recipient,
            ephemeral_public,
            wrapped_key,
            nonce,
        })
    }

    fn unwrap_key(&self, context: &[u8], secret: &X25519StaticSecret) -> Result<EncryptionKey> {
        let wrap_key = secret
            .diffie_hellman(&self.ephemeral_public)
            .derive_wrap_key(context);
        let key_bytes = wrap_key.decrypt(&self.wrapped_key, &self.nonce)?;

        let arr: [u8; 32] = key_bytes.as_slice().try_into().map_err(|_| {
            CryptoError::DecryptionError(format!(
                "invalid key length: expected 32, got {}",
                key_bytes.len()
            ))
        })?;
        Ok(EncryptionKey::from_bytes(arr))
    }
}

/// A sealed object plus the key shares needed to open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedObject {
    pub format: EncryptionFormat,
    pub nonce: EncryptionNonce,
    /// Encrypted payload, authentication tag included.
    pub ciphertext: Vec<u8>,
    pub shares: Vec<KeyShare>,
}

impl EncryptedObject {
    /// Seal `plaintext` for every key in `audience`.
    ///
    /// `context` (normally the object's content digest) is mixed into every
    /// wrap key, so a share cannot be replayed onto a different object.
    pub fn seal(plaintext: &[u8], context: &[u8], audience: &[X25519PublicKey]) -> Result<Self> {
        if audience.is_empty() {
            return Err(CryptoError::EmptyAudience);
        }

        let content_key = EncryptionKey::generate();
        let nonce = EncryptionNonce::generate();
        let ciphertext = content_key.encrypt(plaintext, &nonce)?;
        let shares = audience
            .iter()
            .map(|recipient| KeyShare::wrap(&content_key, context, recipient))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            format: EncryptionFormat::ChaCha20Poly1305,
            nonce,
            ciphertext,
            shares,
        })
    }

    /// Open with a reader's secret. Fails with [`CryptoError::NoKeyShare`]
    /// if the object was not sealed for that reader.
    pub fn open(&self, context: &[u8], secret: &X25519StaticSecret) -> Result<Vec<u8>> {
        let recipient = secret.public_key();
        let share = self
            .shares
            .iter()
            .find(|s| s.recipient == recipient)
            .ok_or(CryptoError::NoKeyShare(recipient))?;

        let content_key = share.unwrap_key(context, secret)?;
        match self.format {
            EncryptionFormat::ChaCha20Poly1305 => content_key.decrypt(&self.ciphertext, &self.nonce),
        }
    }

    /// True if a share exists for `recipient`.
    pub fn is_readable_by(&self, recipient: &X25519PublicKey) -> bool {
        self.shares.iter().any(|s| &s.recipient == recipient)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CryptoError::SerializationError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| CryptoError::SerializationError(e.to_string()))
    }
}
