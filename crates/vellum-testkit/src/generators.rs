//! Proptest generators for property-based testing.

use std::io::{self, Read};

use proptest::prelude::*;

use vellum_core::{ContentDigest, RecordWrapper};
use vellum_crypto::PartyType;

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a random ContentDigest.
pub fn content_digest() -> impl Strategy<Value = ContentDigest> {
    payload(64).prop_map(|bytes| ContentDigest::of(&bytes))
}

/// Generate a record name.
pub fn record_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a fully-qualified type identifier.
pub fn type_name() -> impl Strategy<Value = String> {
    "io\\.[a-z]{1,8}\\.[A-Z][a-zA-Z]{0,12}".prop_map(String::from)
}

/// Arbitrary record wrapper.
pub fn record_wrapper() -> impl Strategy<Value = RecordWrapper> {
    (record_name(), type_name(), content_digest())
        .prop_map(|(name, type_name, hash)| RecordWrapper::new(name, type_name, hash))
}

/// Any party type.
pub fn party_type() -> impl Strategy<Value = PartyType> {
    prop_oneof![
        Just(PartyType::Originator),
        Just(PartyType::Servicer),
        Just(PartyType::Investor),
        Just(PartyType::Custodian),
        Just(PartyType::Owner),
        Just(PartyType::Affiliate),
        Just(PartyType::Omnibus),
        Just(PartyType::Provenance),
        Just(PartyType::Controller),
        Just(PartyType::Validator),
    ]
}

/// A reader that hands out its data in caller-chosen fragment sizes.
///
/// Fragment sizes are cycled; a zero-length fragment is reported as
/// `Interrupted`.
#[derive(Debug, Clone)]
pub struct FragmentingReader {
    data: Vec<u8>,
    pos: usize,
    fragments: Vec<usize>,
    next: usize,
}

impl FragmentingReader {
    pub fn new(data: Vec<u8>, fragments: Vec<usize>) -> Self {
        Self {
            data,
            pos: 0,
            fragments,
            next: 0,
        }
    }
}

impl Read for FragmentingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        let fragment = if self.fragments.is_empty() {
            buf.len()
        } else {
            let f = self.fragments[self.next % self.fragments.len()];
            self.next += 1;
            f
        };
        if fragment == 0 {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let n = fragment.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Payload of up to `max_len` bytes behind a reader with arbitrary
/// fragmentation (fragments up to 64 bytes, some interrupted).
pub fn fragmented(max_len: usize) -> impl Strategy<Value = (Vec<u8>, FragmentingReader)> {
    (payload(max_len), prop::collection::vec(0usize..=64, 1..8)).prop_map(|(data, mut fragments)| {
        // Keep at least one non-zero fragment so the reader makes progress.
        if fragments.iter().all(|f| *f == 0) {
            fragments.push(1);
        }
        let reader = FragmentingReader::new(data.clone(), fragments);
        (data, reader)
    })
}
