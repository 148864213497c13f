//! Hydration against an encrypted in-memory object store.

use std::collections::HashSet;

use vellum::{ClientConfig, VellumError};
use vellum_core::{ContentDigest, Message, RecordWrapper};
use vellum_crypto::{Affiliate, PartyType};
use vellum_store::StoreError;
use vellum_testkit::{multi_party_affiliates, Bar, Foo, FooBar, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_fetches_exactly_the_bound_records() {
    init_tracing();
    let fixture = TestFixture::new();
    let input = fixture.put("input", &Foo { label: "loan-17".into() });
    let result = fixture.put("result", &Bar { amount: 250_000 });
    let unrelated = fixture.put("notes", &Foo { label: "ignored".into() });

    let scope = fixture.scope(vec![unrelated.clone(), input.clone(), result.clone()]);
    let value: FooBar = fixture.client.hydrate(&scope).unwrap();

    assert_eq!(value.input, Foo { label: "loan-17".into() });
    assert_eq!(value.result, Bar { amount: 250_000 });

    let fetched: HashSet<ContentDigest> = fixture.storage.fetches().into_iter().collect();
    let expected: HashSet<ContentDigest> = [input.record.result_hash, result.record.result_hash].into();
    assert_eq!(fetched, expected);
    assert_eq!(fixture.storage.fetch_count(), 2);
}

#[test]
fn test_missing_result_fails_without_fetching() {
    init_tracing();
    let fixture = TestFixture::new();
    let scope = fixture.scope(vec![fixture.put("input", &Foo { label: "a".into() })]);

    match fixture.client.hydrate::<FooBar>(&scope) {
        Err(VellumError::NoMatchingRecord {
            type_name,
            scope_id,
            missing,
        }) => {
            assert_eq!(type_name, "io.vellum.sample.FooBar");
            assert_eq!(scope_id, scope.scope_id);
            assert_eq!(missing, vec![format!("result: {}", Bar::TYPE_NAME)]);
        }
        other => panic!("expected NoMatchingRecord, got {other:?}"),
    }
    assert_eq!(fixture.storage.fetch_count(), 0);
}

#[test]
fn test_empty_scope_reports_no_partial_match() {
    let fixture = TestFixture::new();
    let scope = fixture.scope(Vec::new());

    match fixture.client.hydrate::<FooBar>(&scope) {
        Err(VellumError::NoMatchingRecord { missing, .. }) => assert!(missing.is_empty()),
        other => panic!("expected NoMatchingRecord, got {other:?}"),
    }
    assert_eq!(fixture.storage.fetch_count(), 0);
}

#[test]
fn test_duplicate_bindings_are_rejected_before_fetching() {
    let fixture = TestFixture::new();
    let scope = fixture.scope(vec![
        fixture.put("input", &Foo { label: "a".into() }),
        fixture.put("input", &Foo { label: "b".into() }),
        fixture.put("result", &Bar { amount: 1 }),
    ]);

    match fixture.client.hydrate::<FooBar>(&scope) {
        Err(VellumError::AmbiguousRecord { record, count, .. }) => {
            assert_eq!(record, "input");
            assert_eq!(count, 2);
        }
        other => panic!("expected AmbiguousRecord, got {other:?}"),
    }
    assert_eq!(fixture.storage.fetch_count(), 0);
}

#[test]
fn test_unstored_record_is_not_found() {
    let fixture = TestFixture::new();
    let missing = ContentDigest::of(b"never written");
    let scope = fixture.scope(vec![
        fixture.put("input", &Foo { label: "a".into() }),
        RecordWrapper::new("result", Bar::TYPE_NAME, missing),
    ]);

    match fixture.client.hydrate::<FooBar>(&scope) {
        Err(VellumError::NotFound {
            type_name,
            record,
            hash,
            ..
        }) => {
            assert_eq!(type_name, Bar::TYPE_NAME);
            assert_eq!(record, "result");
            assert_eq!(hash, missing);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_other_affiliate_cannot_read() {
    let owner = TestFixture::new();
    let scope = owner.scope(vec![
        owner.put("input", &Foo { label: "a".into() }),
        owner.put("result", &Bar { amount: 1 }),
    ]);

    // A second client on the same store, outside the audience.
    let stranger = vellum::Client::new(owner.shared.clone(), Affiliate::generate(PartyType::Investor)).unwrap();
    assert!(matches!(
        stranger.hydrate::<FooBar>(&scope),
        Err(VellumError::Storage(StoreError::Crypto(_)))
    ));
}

#[test]
fn test_shared_audience_reads_same_records() {
    let parties = multi_party_affiliates(2);
    let fixture = TestFixture::with_affiliate(parties[0].clone());
    let audience = [parties[0].encryption_public_key(), parties[1].encryption_public_key()];
    let input = fixture.store.put_message(&Foo { label: "co".into() }, &audience).unwrap();
    let result = fixture.store.put_message(&Bar { amount: 9 }, &audience).unwrap();
    let scope = fixture.scope(vec![
        RecordWrapper::new("input", Foo::TYPE_NAME, input),
        RecordWrapper::new("result", Bar::TYPE_NAME, result),
    ]);

    let servicer = vellum::Client::new(fixture.shared.clone(), parties[1].clone()).unwrap();
    let a: FooBar = fixture.client.hydrate(&scope).unwrap();
    let b: FooBar = servicer.hydrate(&scope).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cached_client_fetches_each_object_once() {
    let fixture = TestFixture::with_config(Affiliate::generate(PartyType::Owner), ClientConfig::default());
    let scope = fixture.scope(vec![
        fixture.put("input", &Foo { label: "a".into() }),
        fixture.put("result", &Bar { amount: 1 }),
    ]);

    for _ in 0..3 {
        let _: FooBar = fixture.client.hydrate(&scope).unwrap();
    }
    assert_eq!(fixture.storage.fetch_count(), 2);
}

#[test]
fn test_closed_client_refuses_hydration() {
    let fixture = TestFixture::new();
    let scope = fixture.scope(vec![
        fixture.put("input", &Foo { label: "a".into() }),
        fixture.put("result", &Bar { amount: 1 }),
    ]);

    fixture.shared.close().unwrap();
    assert!(matches!(
        fixture.client.hydrate::<FooBar>(&scope),
        Err(VellumError::Storage(StoreError::Closed))
    ));
    assert_eq!(fixture.storage.fetch_count(), 0);
}
