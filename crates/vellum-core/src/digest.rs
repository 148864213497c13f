//! Content digests and transport checksums.
//!
//! Two distinct primitives live here:
//!
//! - [`ContentDigest`]: SHA-512, the content-addressing key for stored objects.
//! - [`Checksum`]: CRC-32C, a fast transport integrity check. Never used for
//!   addressing.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use std::fmt;

use crate::encoding::{base64_decode, base64_encode, to_hex};
use crate::error::{CoreError, Result};

/// Length of a [`ContentDigest`] in bytes.
pub const DIGEST_LEN: usize = 64;

/// A 64-byte SHA-512 content digest.
///
/// This is the address of a stored object. Two payloads with the same bytes
/// always share a digest. Serialized as a base64 string, which is also the
/// form hashes take inside record wrappers and provenance references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest(pub [u8; DIGEST_LEN]);

impl ContentDigest {
    /// Compute the digest of the given data.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Base64 form, as carried in scopes and references.
    pub fn to_base64(&self) -> String {
        base64_encode(&self.0)
    }

    /// Parse the base64 form.
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = base64_decode(s)?;
        Self::try_from(bytes.as_slice())
    }

    /// Upper-case hex, for logs only.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Check that `data` hashes to this digest.
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        let actual = Self::of(data);
        if &actual == self {
            Ok(())
        } else {
            Err(CoreError::DigestMismatch {
                expected: self.to_base64(),
                actual: actual.to_base64(),
            })
        }
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha512({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl AsRef<[u8]> for ContentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for ContentDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for ContentDigest {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let arr: [u8; DIGEST_LEN] = slice
            .try_into()
            .map_err(|_| CoreError::InvalidDigestLength(slice.len()))?;
        Ok(Self(arr))
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(de::Error::custom)
    }
}

/// A CRC-32C checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(pub u32);

impl Checksum {
    /// Compute the checksum of the given data.
    pub fn of(data: &[u8]) -> Self {
        Self(crc32c::crc32c(data))
    }

    /// Check that `data` produces this checksum.
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        let actual = Self::of(data);
        if actual == *self {
            Ok(())
        } else {
            Err(CoreError::ChecksumMismatch {
                expected: self.0,
                actual: actual.0,
            })
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_digest_deterministic() {
        let h1 = ContentDigest::of(b"test data");
        let h2 = ContentDigest::of(b"test data");
        assert_eq!(h1, h2);
        assert_ne!(h1, ContentDigest::of(b"different data"));
    }

    #[test]
    fn test_digest_known_answer() {
        // SHA-512("abc"), FIPS 180-2 appendix C.1
        let digest = ContentDigest::of(b"abc");
        assert_eq!(
            hex::encode(digest.as_bytes()),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_digest_base64_form() {
        let digest = ContentDigest::of(b"payload");
        let parsed = ContentDigest::from_base64(&digest.to_base64()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn test_digest_rejects_short_input() {
        let err = ContentDigest::from_base64(&base64_encode(&[0u8; 32])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDigestLength(32)));
    }

    #[test]
    fn test_digest_serializes_as_string() {
        let digest = ContentDigest::of(b"x");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_base64()));
    }

    #[test]
    fn test_verify_detects_tampering() {
        let digest = ContentDigest::of(b"original");
        assert!(digest.verify(b"original").is_ok());
        assert!(matches!(
            digest.verify(b"0riginal"),
            Err(CoreError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_crc32c_known_answer() {
        // RFC 3720 B.4 check value for "123456789"
        assert_eq!(Checksum::of(b"123456789").0, 0xE306_9283);
        assert_eq!(Checksum::of(b"123456789").to_string(), "E3069283");
    }

    #[test]
    fn test_checksum_verify() {
        let sum = Checksum::of(b"blob");
        assert!(sum.verify(b"blob").is_ok());
        assert!(sum.verify(b"blub").is_err());
    }

    proptest! {
        #[test]
        fn single_bit_flip_changes_digest(
            data in prop::collection::vec(any::<u8>(), 1..512),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut flipped = data.clone();
            let i = index.index(flipped.len());
            flipped[i] ^= 1 << bit;
            prop_assert_ne!(ContentDigest::of(&data), ContentDigest::of(&flipped));
        }
    }
}
