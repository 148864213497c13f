//! # Vellum
//!
//! Client-side core for a contract execution platform: resolve code hashes
//! of deployed contracts, draft sessions that will run them, and rebuild
//! typed objects from encrypted records stored in an object store.
//!
//! ## Overview
//!
//! - **Identity registry**: code hashes of contract and message bundles,
//!   loaded once from explicit [`HashProvider`]s
//! - **Session builder**: contract specification, provenance references and
//!   participants of a session draft
//! - **Hydration**: decrypt and decode the records a type declares, then
//!   construct it
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use serde::{Deserialize, Serialize};
//! use vellum::{ClientConfig, Client, Constructor, Hydrate, IdentityRegistry, Param, SharedClient};
//! use vellum::core::{Message, RecordWrapper, Scope, ScopeId};
//! use vellum::crypto::{Affiliate, PartyType};
//! use vellum::store::MemoryObjectStore;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Title(String);
//!
//! impl Message for Title {
//!     const TYPE_NAME: &'static str = "demo.Title";
//! }
//!
//! struct Document {
//!     title: Title,
//! }
//!
//! impl Hydrate for Document {
//!     const TYPE_NAME: &'static str = "demo.Document";
//!
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(vec![Param::record::<Title>("title")], |args| {
//!             Ok(Document { title: args.next()? })
//!         })]
//!     }
//! }
//!
//! let owner = Affiliate::generate(PartyType::Owner);
//! let store = Arc::new(MemoryObjectStore::new());
//! let hash = store
//!     .put_message(&Title("deed".into()), &[owner.encryption_public_key()])
//!     .unwrap();
//!
//! let registry = Arc::new(IdentityRegistry::init(Vec::<vellum::StaticProvider>::new()));
//! let shared = Arc::new(SharedClient::new(ClientConfig::default(), registry, store));
//! let client = Client::new(shared, owner).unwrap();
//!
//! let scope = Scope::new(ScopeId::random(), vec![RecordWrapper::new("title", Title::TYPE_NAME, hash)]);
//! let document: Document = client.hydrate(&scope).unwrap();
//! assert_eq!(document.title.0, "deed");
//! ```
//!
//! ## Re-exports
//!
//! - `vellum::core` - digests, chunked reads, scopes and messages
//! - `vellum::crypto` - affiliates, key encoding and the object envelope
//! - `vellum::store` - storage client trait, caching and channel lifecycle

pub mod client;
pub mod config;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod hydrate;
pub mod registry;
pub mod session;

pub use vellum_core as core;
pub use vellum_crypto as crypto;
pub use vellum_store as store;

pub use client::{Client, SharedClient};
pub use config::ClientConfig;
pub use contract::{dehydrate_spec, Contract, ContractShape, ContractSpec, Function, FunctionSpec, RecordSpec};
pub use descriptor::{Output, Param};
pub use error::{ResolutionFailure, Result, VellumError};
pub use hydrate::{hydrate, BuildFn, Constructor, Hydrate, RecordArgs};
pub use registry::{CodeHashEntry, ContractHash, HashProvider, IdentityRegistry, ProtoHash, StaticProvider};
pub use session::{Participant, ScopeSpecification, Session, SessionBuilder, SessionRecord, SessionTarget};
