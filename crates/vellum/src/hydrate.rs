//! Record hydration: rebuild a typed object from the records of a scope.
//!
//! A hydratable type lists its constructors as [`Constructor`] descriptors.
//! Hydration picks the first constructor whose parameters all resolve to
//! exactly one record wrapper, fetches each record through the storage
//! client, then calls the constructor with the decoded values.
//!
//! Every parameter is resolved before the first fetch, so a scope that
//! cannot satisfy the type costs no storage round trips.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};
use vellum_core::{Message, Record, Scope};
use vellum_crypto::Affiliate;
use vellum_store::{StorageClient, StoreError};

use crate::descriptor::Param;
use crate::error::{Result, VellumError};

/// A type that can be rebuilt from stored records.
pub trait Hydrate: Sized {
    /// Fully-qualified type identifier, used in errors.
    const TYPE_NAME: &'static str;

    /// Constructors in preference order.
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Builds a `T` from positional record arguments.
pub type BuildFn<T> = fn(&mut RecordArgs) -> Result<T>;

/// One declared constructor: its parameters and the function that consumes them.
pub struct Constructor<T> {
    pub params: Vec<Param>,
    build: BuildFn<T>,
}

impl<T> Constructor<T> {
    /// Pair parameters with the function that builds from them.
    pub fn new(params: Vec<Param>, build: BuildFn<T>) -> Self {
        Self { params, build }
    }

    /// Every parameter is a message bound to a record name.
    pub fn qualifies(&self) -> bool {
        !self.params.is_empty() && self.params.iter().all(|p| p.binding().is_some())
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").field("params", &self.params).finish()
    }
}

/// Fetched record bytes handed to a constructor, in parameter order.
pub struct RecordArgs {
    type_name: &'static str,
    position: usize,
    values: std::vec::IntoIter<(Param, Bytes)>,
}

impl RecordArgs {
    fn new(type_name: &'static str, values: Vec<(Param, Bytes)>) -> Self {
        Self {
            type_name,
            position: 0,
            values: values.into_iter(),
        }
    }

    /// Decode the next argument as `M`.
    pub fn next<M: Message>(&mut self) -> Result<M> {
        let position = self.position;
        let (param, bytes) = self.values.next().ok_or_else(|| {
            VellumError::definition(
                self.type_name,
                format!("constructor reads more than its {position} declared arguments"),
            )
        })?;
        self.position += 1;
        if param.type_name != M::TYPE_NAME {
            return Err(VellumError::definition(
                self.type_name,
                format!(
                    "argument {position} is declared as {} but read as {}",
                    param.type_name,
                    M::TYPE_NAME
                ),
            ));
        }
        Ok(M::decode(&bytes)?)
    }

    /// Values not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

enum Plan<'a> {
    /// Every parameter resolved; records in parameter order.
    Ready(Vec<&'a Record>),
    /// Some resolved, these did not.
    Partial(Vec<String>),
    Unmatched,
}

fn plan<'a, T: Hydrate>(constructor: &Constructor<T>, scope: &'a Scope) -> Result<Plan<'a>> {
    let mut found = Vec::with_capacity(constructor.params.len());
    let mut missing = Vec::new();

    for param in &constructor.params {
        let Some(name) = param.binding() else {
            continue;
        };
        let matches: Vec<&Record> = scope.matching(name, param.type_name).collect();
        match matches.as_slice() {
            [record] => found.push(*record),
            [] => missing.push(format!("{name}: {}", param.type_name)),
            many => {
                return Err(VellumError::AmbiguousRecord {
                    type_name: param.type_name.to_string(),
                    scope_id: scope.scope_id,
                    record: name.to_string(),
                    count: many.len(),
                })
            }
        }
    }

    Ok(match (found.is_empty(), missing.is_empty()) {
        (_, true) => Plan::Ready(found),
        (false, false) => Plan::Partial(missing),
        (true, false) => Plan::Unmatched,
    })
}

/// Rebuild a `T` from `scope`, reading each record as `affiliate`.
pub fn hydrate<T: Hydrate>(storage: &dyn StorageClient, affiliate: &Affiliate, scope: &Scope) -> Result<T> {
    let constructors = T::constructors();
    let qualifying: Vec<&Constructor<T>> = constructors.iter().filter(|c| c.qualifies()).collect();
    if qualifying.is_empty() {
        return Err(VellumError::definition(
            T::TYPE_NAME,
            "no constructor takes only record-bound messages",
        ));
    }

    let mut first_partial = None;
    for (idx, constructor) in qualifying.into_iter().enumerate() {
        match plan(constructor, scope)? {
            Plan::Ready(records) => {
                debug!(
                    type_name = T::TYPE_NAME,
                    scope = %scope.scope_id,
                    constructor = idx,
                    records = records.len(),
                    "hydrating"
                );
                return construct(constructor, storage, affiliate, scope, records);
            }
            Plan::Partial(missing) => {
                trace!(type_name = T::TYPE_NAME, constructor = idx, ?missing, "constructor partially matched");
                first_partial.get_or_insert(missing);
            }
            Plan::Unmatched => {}
        }
    }

    Err(VellumError::NoMatchingRecord {
        type_name: T::TYPE_NAME.to_string(),
        scope_id: scope.scope_id,
        missing: first_partial.unwrap_or_default(),
    })
}

fn construct<T: Hydrate>(
    constructor: &Constructor<T>,
    storage: &dyn StorageClient,
    affiliate: &Affiliate,
    scope: &Scope,
    records: Vec<&Record>,
) -> Result<T> {
    let mut values = Vec::with_capacity(records.len());
    for (param, record) in constructor.params.iter().zip(records) {
        trace!(record = %record.name, hash = %record.result_hash, "fetching record");
        let bytes = storage
            .fetch(&record.result_type, &record.result_hash, affiliate)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => VellumError::NotFound {
                    type_name: record.result_type.clone(),
                    record: record.name.clone(),
                    scope_id: scope.scope_id,
                    hash: record.result_hash,
                },
                other => other.into(),
            })?;
        values.push((*param, bytes));
    }

    let mut args = RecordArgs::new(T::TYPE_NAME, values);
    let value = (constructor.build)(&mut args)?;
    if args.remaining() > 0 {
        return Err(VellumError::definition(
            T::TYPE_NAME,
            format!("constructor left {} declared arguments unread", args.remaining()),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use vellum_core::{RecordWrapper, ScopeId};
    use vellum_crypto::PartyType;
    use vellum_store::MemoryObjectStore;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Name(String);

    impl Message for Name {
        const TYPE_NAME: &'static str = "test.Name";
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Age(u32);

    impl Message for Age {
        const TYPE_NAME: &'static str = "test.Age";
    }

    #[derive(Debug, PartialEq)]
    struct Person {
        name: Name,
        age: Option<Age>,
    }

    impl Hydrate for Person {
        const TYPE_NAME: &'static str = "test.Person";

        fn constructors() -> Vec<Constructor<Self>> {
            vec![
                Constructor::new(
                    vec![Param::record::<Name>("name"), Param::record::<Age>("age")],
                    |args| {
                        Ok(Person {
                            name: args.next()?,
                            age: Some(args.next()?),
                        })
                    },
                ),
                Constructor::new(vec![Param::record::<Name>("name")], |args| {
                    Ok(Person {
                        name: args.next()?,
                        age: None,
                    })
                }),
            ]
        }
    }

    fn setup() -> (MemoryObjectStore, Affiliate) {
        (MemoryObjectStore::new(), Affiliate::generate(PartyType::Owner))
    }

    #[test]
    fn test_first_fully_resolving_constructor_wins() {
        let (store, owner) = setup();
        let audience = [owner.encryption_public_key()];
        let name = store.put_message(&Name("ada".into()), &audience).unwrap();
        let age = store.put_message(&Age(36), &audience).unwrap();

        let scope = Scope::new(
            ScopeId::random(),
            vec![
                RecordWrapper::new("name", Name::TYPE_NAME, name),
                RecordWrapper::new("age", Age::TYPE_NAME, age),
            ],
        );
        let person: Person = hydrate(&store, &owner, &scope).unwrap();
        assert_eq!(person.age, Some(Age(36)));

        // Without "age" the second constructor is used.
        let scope = Scope::new(ScopeId::random(), vec![RecordWrapper::new("name", Name::TYPE_NAME, name)]);
        let person: Person = hydrate(&store, &owner, &scope).unwrap();
        assert_eq!(person.name, Name("ada".into()));
        assert_eq!(person.age, None);
    }

    #[test]
    fn test_name_and_type_must_both_match() {
        let (store, owner) = setup();
        let hash = store.put_message(&Name("ada".into()), &[owner.encryption_public_key()]).unwrap();
        let scope = Scope::new(ScopeId::random(), vec![RecordWrapper::new("name", "test.Other", hash)]);

        match hydrate::<Person>(&store, &owner, &scope) {
            Err(VellumError::NoMatchingRecord { type_name, missing, .. }) => {
                assert_eq!(type_name, "test.Person");
                assert!(missing.is_empty());
            }
            other => panic!("expected no matching record, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_wrappers_are_rejected() {
        let (store, owner) = setup();
        let hash = store.put_message(&Name("ada".into()), &[owner.encryption_public_key()]).unwrap();
        let scope = Scope::new(
            ScopeId::random(),
            vec![
                RecordWrapper::new("name", Name::TYPE_NAME, hash),
                RecordWrapper::new("name", Name::TYPE_NAME, hash),
            ],
        );

        assert!(matches!(
            hydrate::<Person>(&store, &owner, &scope),
            Err(VellumError::AmbiguousRecord { count: 2, .. })
        ));
    }

    #[test]
    fn test_missing_object_names_record_and_scope() {
        let (store, owner) = setup();
        let scope_id = ScopeId::random();
        let hash = vellum_core::ContentDigest::of(b"never stored");
        let scope = Scope::new(scope_id, vec![RecordWrapper::new("name", Name::TYPE_NAME, hash)]);

        match hydrate::<Person>(&store, &owner, &scope) {
            Err(VellumError::NotFound {
                record,
                scope_id: id,
                hash: h,
                ..
            }) => {
                assert_eq!(record, "name");
                assert_eq!(id, scope_id);
                assert_eq!(h, hash);
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_type_without_qualifying_constructor() {
        struct Loose;
        impl Hydrate for Loose {
            const TYPE_NAME: &'static str = "test.Loose";
            fn constructors() -> Vec<Constructor<Self>> {
                vec![Constructor::new(
                    vec![Param::record::<Name>("name"), Param::value("u64")],
                    |_| Ok(Loose),
                )]
            }
        }

        let (store, owner) = setup();
        let scope = Scope::new(ScopeId::random(), Vec::new());
        assert!(matches!(
            hydrate::<Loose>(&store, &owner, &scope),
            Err(VellumError::ContractDefinition { .. })
        ));
    }

    #[test]
    fn test_constructor_reading_wrong_type() {
        struct Confused;
        impl Hydrate for Confused {
            const TYPE_NAME: &'static str = "test.Confused";
            fn constructors() -> Vec<Constructor<Self>> {
                vec![Constructor::new(vec![Param::record::<Name>("name")], |args| {
                    args.next::<Age>()?;
                    Ok(Confused)
                })]
            }
        }

        let (store, owner) = setup();
        let hash = store.put_message(&Name("ada".into()), &[owner.encryption_public_key()]).unwrap();
        let scope = Scope::new(ScopeId::random(), vec![RecordWrapper::new("name", Name::TYPE_NAME, hash)]);

        assert!(matches!(
            hydrate::<Confused>(&store, &owner, &scope),
            Err(VellumError::ContractDefinition { .. })
        ));
    }
}
