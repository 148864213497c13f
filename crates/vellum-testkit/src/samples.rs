//! Sample messages, hydratable types and contracts.
//!
//! The bundle layout mirrors a real deployment: one contract bundle and one
//! message bundle sharing a bundle id.

use serde::{Deserialize, Serialize};
use vellum::{
    CodeHashEntry, Constructor, Contract, ContractShape, Function, Hydrate, Output, Param, StaticProvider,
};
use vellum_core::{BundleId, Message};
use vellum_crypto::PartyType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foo {
    pub label: String,
}

impl Message for Foo {
    const TYPE_NAME: &'static str = "io.vellum.sample.Foo";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub amount: u64,
}

impl Message for Bar {
    const TYPE_NAME: &'static str = "io.vellum.sample.Bar";
}

/// Hydrated from records `"input"` (Foo) and `"result"` (Bar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooBar {
    pub input: Foo,
    pub result: Bar,
}

impl Hydrate for FooBar {
    const TYPE_NAME: &'static str = "io.vellum.sample.FooBar";

    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![Param::record::<Foo>("input"), Param::record::<Bar>("result")],
            |args| {
                Ok(FooBar {
                    input: args.next()?,
                    result: args.next()?,
                })
            },
        )]
    }
}

/// Takes `"input"`, records `"result"`.
pub struct SettleContract;

impl Contract for SettleContract {
    const TYPE_NAME: &'static str = "io.vellum.sample.SettleContract";

    fn shape() -> ContractShape {
        ContractShape::new()
            .party(PartyType::Originator)
            .party(PartyType::Servicer)
            .input(Param::record::<Foo>("input"))
            .function(Function::new("check", PartyType::Servicer, Output::Value("bool")))
            .function(
                Function::new("settle", PartyType::Originator, Output::record::<Bar>("result"))
                    .input(Param::record::<Foo>("input")),
            )
    }
}

/// Declares no function that returns a message.
pub struct AuditContract;

impl Contract for AuditContract {
    const TYPE_NAME: &'static str = "io.vellum.sample.AuditContract";

    fn shape() -> ContractShape {
        ContractShape::new()
            .party(PartyType::Validator)
            .function(Function::new("audit", PartyType::Validator, Output::Unit))
    }
}

/// Provider for the sample bundle deployed as `bundle_id`.
pub fn sample_provider(bundle_id: BundleId) -> StaticProvider {
    StaticProvider::new()
        .contract(CodeHashEntry::from_bundle(
            bundle_id,
            b"sample contract bundle",
            [SettleContract::TYPE_NAME, AuditContract::TYPE_NAME],
        ))
        .proto(CodeHashEntry::from_bundle(
            bundle_id,
            b"sample proto bundle",
            [Foo::TYPE_NAME, Bar::TYPE_NAME],
        ))
}
