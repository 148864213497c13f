//! # Vellum Testkit
//!
//! Testing utilities for Vellum.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: SHA-512 and CRC-32C known answers shared with other
//!   object store implementations
//! - **Generators**: Proptest strategies, including a fragmenting reader
//! - **Fixtures**: a client wired to an in-memory object store that records
//!   every fetch
//! - **Samples**: small messages, a hydratable type and two contracts
//!
//! ## Golden Vectors
//!
//! ```rust
//! use vellum_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hex}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use vellum_testkit::fixtures::TestFixture;
//! use vellum_testkit::samples::{Bar, Foo, FooBar};
//!
//! let fixture = TestFixture::new();
//! let scope = fixture.scope(vec![
//!     fixture.put("input", &Foo { label: "a".into() }),
//!     fixture.put("result", &Bar { amount: 1 }),
//! ]);
//! let value: FooBar = fixture.client.hydrate(&scope).unwrap();
//! assert_eq!(value.result.amount, 1);
//! assert_eq!(fixture.storage.fetch_count(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod samples;
pub mod vectors;

pub use fixtures::{affiliate_from_seed, multi_party_affiliates, RecordingStorage, TestFixture};
pub use generators::{fragmented, payload, FragmentingReader};
pub use samples::{sample_provider, AuditContract, Bar, Foo, FooBar, SettleContract};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
