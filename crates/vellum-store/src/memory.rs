//! In-memory encrypted object store.
//!
//! Same semantics as a remote object store, minus the network: objects are
//! sealed on `put`, addressed by the SHA-512 digest of their plaintext, and
//! checked twice on `fetch` (CRC-32C over the stored blob, then the content
//! digest over the decrypted bytes).

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use tracing::{debug, trace};

use vellum_core::{read_exact_chunked, Checksum, ContentDigest, Message, CHUNK_SIZE};
use vellum_crypto::{Affiliate, EncryptedObject, X25519PublicKey};

use crate::error::{Result, StoreError};
use crate::traits::StorageClient;

struct StoredObject {
    blob: Vec<u8>,
    checksum: Checksum,
}

/// In-memory object store. Thread-safe via RwLock.
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ContentDigest, StoredObject>>,
    chunk_size: usize,
}

impl MemoryObjectStore {
    /// Create an empty store reading back in [`CHUNK_SIZE`] chunks.
    pub fn new() -> Self {
        Self::with_chunk_size(CHUNK_SIZE)
    }

    /// Store that reads blobs back `chunk_size` bytes at a time.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            chunk_size,
        }
    }

    /// Read chunk used when loading blobs.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Seal `plaintext` for `audience` and store it.
    ///
    /// Putting bytes that are already stored widens the audience of the
    /// existing object instead of creating a second copy.
    pub fn put(&self, plaintext: &[u8], audience: &[X25519PublicKey]) -> Result<ContentDigest> {
        let hash = ContentDigest::of(plaintext);
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);

        let mut readers = audience.to_vec();
        if let Some(existing) = objects.get(&hash) {
            let sealed = EncryptedObject::from_bytes(&existing.blob)?;
            for share in &sealed.shares {
                if !readers.contains(&share.recipient) {
                    readers.push(share.recipient);
                }
            }
        }

        let sealed = EncryptedObject::seal(plaintext, hash.as_bytes(), &readers)?;
        let blob = sealed.to_bytes()?;
        let checksum = Checksum::of(&blob);
        debug!(%hash, readers = readers.len(), bytes = blob.len(), "stored object");
        objects.insert(hash, StoredObject { blob, checksum });

        Ok(hash)
    }

    /// Encode and store a message.
    pub fn put_message<M: Message>(&self, message: &M, audience: &[X25519PublicKey]) -> Result<ContentDigest> {
        self.put(&message.encode()?, audience)
    }

    /// True if an object is stored under `hash`.
    pub fn contains(&self, hash: &ContentDigest) -> bool {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, type_name: &str, hash: &ContentDigest) -> Result<(Vec<u8>, Checksum)> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let stored = objects.get(hash).ok_or_else(|| StoreError::NotFound {
            type_name: type_name.to_string(),
            hash: *hash,
        })?;

        // Read through the chunked reader, as a network body would be.
        let blob = read_exact_chunked(Cursor::new(&stored.blob), stored.blob.len(), self.chunk_size)?;
        Ok((blob, stored.checksum))
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageClient for MemoryObjectStore {
    fn fetch(&self, type_name: &str, hash: &ContentDigest, affiliate: &Affiliate) -> Result<Bytes> {
        let (blob, checksum) = self.load(type_name, hash)?;
        checksum
            .verify(&blob)
            .map_err(|source| StoreError::Integrity { hash: *hash, source })?;

        let sealed = EncryptedObject::from_bytes(&blob)?;
        let plaintext = affiliate.encryption_key.open(&sealed, hash.as_bytes())?;
        hash.verify(&plaintext)
            .map_err(|source| StoreError::Integrity { hash: *hash, source })?;

        trace!(type_name, %hash, bytes = plaintext.len(), "fetched object");
        Ok(Bytes::from(plaintext))
    }
}

#[cfg(test)]
impl MemoryObjectStore {
    fn corrupt(&self, hash: &ContentDigest) {
        let mut objects = self.objects.write().unwrap();
        let stored = objects.get_mut(hash).unwrap();
        let last = stored.blob.len() - 1;
        stored.blob[last] ^= 0x01;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_crypto::{CryptoError, PartyType};

    #[test]
    fn test_put_then_fetch() {
        let store = MemoryObjectStore::new();
        let owner = Affiliate::generate(PartyType::Owner);

        let hash = store.put(b"borrower record", &[owner.encryption_public_key()]).unwrap();
        assert_eq!(hash, ContentDigest::of(b"borrower record"));

        let bytes = store.fetch("test.Borrower", &hash, &owner).unwrap();
        assert_eq!(&bytes[..], b"borrower record");
    }

    #[test]
    fn test_missing_object_is_not_found() {
        let store = MemoryObjectStore::new();
        let owner = Affiliate::generate(PartyType::Owner);
        let hash = ContentDigest::of(b"never stored");

        match store.fetch("test.Borrower", &hash, &owner) {
            Err(StoreError::NotFound { type_name, hash: missing }) => {
                assert_eq!(type_name, "test.Borrower");
                assert_eq!(missing, hash);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_outsider_cannot_fetch() {
        let store = MemoryObjectStore::new();
        let owner = Affiliate::generate(PartyType::Owner);
        let outsider = Affiliate::generate(PartyType::Investor);
        let hash = store.put(b"private", &[owner.encryption_public_key()]).unwrap();

        assert!(matches!(
            store.fetch("test.Private", &hash, &outsider),
            Err(StoreError::Crypto(CryptoError::NoKeyShare(_)))
        ));
    }

    #[test]
    fn test_put_widens_audience() {
        let store = MemoryObjectStore::new();
        let owner = Affiliate::generate(PartyType::Owner);
        let servicer = Affiliate::generate(PartyType::Servicer);

        let h1 = store.put(b"shared", &[owner.encryption_public_key()]).unwrap();
        let h2 = store.put(b"shared", &[servicer.encryption_public_key()]).unwrap();

        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
        assert!(store.fetch("test.Shared", &h1, &owner).is_ok());
        assert!(store.fetch("test.Shared", &h1, &servicer).is_ok());
    }

    #[test]
    fn test_corrupted_blob_fails_checksum() {
        let store = MemoryObjectStore::new();
        let owner = Affiliate::generate(PartyType::Owner);
        let hash = store.put(b"fragile", &[owner.encryption_public_key()]).unwrap();

        store.corrupt(&hash);

        assert!(matches!(
            store.fetch("test.Fragile", &hash, &owner),
            Err(StoreError::Integrity { .. })
        ));
    }

    #[test]
    fn test_small_chunk_size_reads_whole_blob() {
        let store = MemoryObjectStore::with_chunk_size(3);
        let owner = Affiliate::generate(PartyType::Owner);
        let payload = vec![0x5a; 4096];
        let hash = store.put(&payload, &[owner.encryption_public_key()]).unwrap();

        assert_eq!(&store.fetch("test.Blob", &hash, &owner).unwrap()[..], &payload[..]);
    }
}
