//! Golden test vectors for content digests and checksums.
//!
//! Objects written by other implementations of the object store are
//! addressed by SHA-512 and checked with CRC-32C. These vectors pin both.

use vellum_core::{base64_encode, Checksum, ContentDigest};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub input: &'static [u8],
    /// Expected SHA-512, upper-case hex.
    pub sha512: &'static str,
    /// Expected CRC-32C.
    pub crc32c: u32,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty input",
            input: b"",
            sha512: "CF83E1357EEFB8BDF1542850D66D8007D620E4050B5715DC83F4A921D36CE9CE\
                     47D0D13C5D85F2B0FF8318D2877EEC2F63B931BD47417A81A538327AF927DA3E",
            crc32c: 0x0000_0000,
        },
        GoldenVector {
            name: "abc",
            input: b"abc",
            sha512: "DDAF35A193617ABACC417349AE20413112E6FA4E89A97EA20A9EEEE64B55D39A\
                     2192992A274FC1A836BA3C23A3FEEBBD454D4423643CE80E2A9AC94FA54CA49F",
            crc32c: 0x364B_3FB7,
        },
        GoldenVector {
            name: "check string",
            input: b"123456789",
            sha512: "D9E6762DD1C8EAF6D61B3C6192FC408D4D6D5F1176D0C29169BC24E71C3F274A\
                     D27FCD5811B313D681F7E55EC02D73D499C95455B6B5BB503ACF574FBA8FFE85",
            crc32c: 0xE306_9283,
        },
        GoldenVector {
            name: "store name",
            input: b"vellum-object-store",
            sha512: "4812BF8D46F4109EE696EE187BAD51EB720F63E2D0F189BCE77F67EC0AA7B348\
                     6DACC7A63EDB67B46DFBEC2E36C33D8C2804F0127DE8965D3B85EE3774905DFE",
            crc32c: 0xF7EA_18F8,
        },
    ]
}

/// Check every vector; returns `(name, matches, digest hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = ContentDigest::of(v.input).to_hex();
            let matches = hex == v.sha512 && Checksum::of(v.input).0 == v.crc32c;
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

/// Base64 of `input`'s digest, as it appears in serialised records.
pub fn digest_base64(input: &[u8]) -> String {
    base64_encode(ContentDigest::of(input).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {hex}");
        }
    }

    #[test]
    fn test_checksum_display_is_upper_hex() {
        assert_eq!(Checksum::of(b"123456789").to_string(), "E3069283");
    }

    #[test]
    fn test_digest_base64_matches_serde_form() {
        let digest = ContentDigest::of(b"abc");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest_base64(b"abc")));
    }
}
