//! Contract declarations and the specification derived from them.

use serde::{Deserialize, Serialize};
use tracing::trace;
use vellum_core::ProvenanceReference;
use vellum_crypto::PartyType;

use crate::descriptor::{Output, Param};
use crate::error::{Result, VellumError};

/// An executable contract.
///
/// The contract type itself is never instantiated here; only its declared
/// [`ContractShape`] and type identifier are used.
pub trait Contract {
    /// Fully-qualified type identifier, as listed in the contract bundle.
    const TYPE_NAME: &'static str;

    fn shape() -> ContractShape;
}

/// One declared contract function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: &'static str,
    pub invoked_by: PartyType,
    pub inputs: Vec<Param>,
    pub output: Output,
}

impl Function {
    /// A function with no inputs yet.
    pub fn new(name: &'static str, invoked_by: PartyType, output: Output) -> Self {
        Self {
            name,
            invoked_by,
            inputs: Vec::new(),
            output,
        }
    }

    /// Append an input parameter.
    pub fn input(mut self, param: Param) -> Self {
        self.inputs.push(param);
        self
    }
}

/// The declared shape of a contract: parties, inputs, functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractShape {
    pub parties: Vec<PartyType>,
    pub inputs: Vec<Param>,
    pub functions: Vec<Function>,
}

impl ContractShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participating party.
    pub fn party(mut self, party: PartyType) -> Self {
        self.parties.push(party);
        self
    }

    /// Append a contract-level input.
    pub fn input(mut self, param: Param) -> Self {
        self.inputs.push(param);
        self
    }

    /// Append a function.
    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Result type of the first function that produces a message.
    pub fn first_message_output(&self) -> Option<&'static str> {
        self.functions.iter().find_map(|f| f.output.message_type())
    }
}

/// A named, typed record in a contract specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    pub type_name: String,
    /// Bundle that defines `type_name`.
    pub reference: ProvenanceReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub invoker: PartyType,
    pub inputs: Vec<RecordSpec>,
    pub output: RecordSpec,
}

/// Specification of a contract, referencing its code and message bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub name: String,
    pub contract_ref: ProvenanceReference,
    pub proto_ref: ProvenanceReference,
    pub parties_involved: Vec<PartyType>,
    pub input_specs: Vec<RecordSpec>,
    pub function_specs: Vec<FunctionSpec>,
}

/// Build the specification of `C` from its shape and bundle references.
///
/// Functions that return no message are helpers and are left out.
pub fn dehydrate_spec<C: Contract>(
    contract_ref: ProvenanceReference,
    proto_ref: ProvenanceReference,
) -> Result<ContractSpec> {
    let shape = C::shape();
    let record = |param: &Param, position: String| -> Result<RecordSpec> {
        let name = param.binding().ok_or_else(|| {
            VellumError::definition(
                C::TYPE_NAME,
                format!("{position} ({}) is not a record-bound message", param.type_name),
            )
        })?;
        Ok(RecordSpec {
            name: name.to_string(),
            type_name: param.type_name.to_string(),
            reference: proto_ref,
        })
    };

    let input_specs = shape
        .inputs
        .iter()
        .enumerate()
        .map(|(i, p)| record(p, format!("input {i}")))
        .collect::<Result<Vec<_>>>()?;

    let mut function_specs = Vec::new();
    for function in &shape.functions {
        let Output::Message { type_name, record: output_name } = function.output else {
            trace!(contract = C::TYPE_NAME, function = function.name, "skipping non-message function");
            continue;
        };
        let output_name = output_name.ok_or_else(|| {
            VellumError::definition(
                C::TYPE_NAME,
                format!("function {} returns {type_name} without a record name", function.name),
            )
        })?;
        let inputs = function
            .inputs
            .iter()
            .enumerate()
            .map(|(i, p)| record(p, format!("parameter {i} of {}", function.name)))
            .collect::<Result<Vec<_>>>()?;

        function_specs.push(FunctionSpec {
            name: function.name.to_string(),
            invoker: function.invoked_by,
            inputs,
            output: RecordSpec {
                name: output_name.to_string(),
                type_name: type_name.to_string(),
                reference: proto_ref,
            },
        });
    }

    Ok(ContractSpec {
        name: C::TYPE_NAME.to_string(),
        contract_ref,
        proto_ref,
        parties_involved: shape.parties,
        input_specs,
        function_specs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use vellum_core::{ContentDigest, Message};

    #[derive(Serialize, Deserialize)]
    struct Asset {
        id: String,
    }

    impl Message for Asset {
        const TYPE_NAME: &'static str = "test.Asset";
    }

    struct Onboard;

    impl Contract for Onboard {
        const TYPE_NAME: &'static str = "test.Onboard";

        fn shape() -> ContractShape {
            ContractShape::new()
                .party(PartyType::Originator)
                .input(Param::record::<Asset>("asset"))
                .function(Function::new("validate", PartyType::Originator, Output::Value("bool")))
                .function(
                    Function::new("record", PartyType::Originator, Output::record::<Asset>("asset"))
                        .input(Param::record::<Asset>("asset")),
                )
        }
    }

    fn refs() -> (ProvenanceReference, ProvenanceReference) {
        (
            ContentDigest::of(b"contract").into(),
            ContentDigest::of(b"proto").into(),
        )
    }

    #[test]
    fn test_spec_carries_both_references() {
        let (contract_ref, proto_ref) = refs();
        let spec = dehydrate_spec::<Onboard>(contract_ref, proto_ref).unwrap();

        assert_eq!(spec.name, "test.Onboard");
        assert_eq!(spec.contract_ref, contract_ref);
        assert_eq!(spec.proto_ref, proto_ref);
        assert_eq!(spec.parties_involved, vec![PartyType::Originator]);
        assert_eq!(spec.input_specs[0].name, "asset");
        assert_eq!(spec.input_specs[0].reference, proto_ref);
    }

    #[test]
    fn test_non_message_functions_are_skipped() {
        let (contract_ref, proto_ref) = refs();
        let spec = dehydrate_spec::<Onboard>(contract_ref, proto_ref).unwrap();

        assert_eq!(spec.function_specs.len(), 1);
        assert_eq!(spec.function_specs[0].name, "record");
        assert_eq!(spec.function_specs[0].output.type_name, "test.Asset");
    }

    #[test]
    fn test_first_message_output() {
        assert_eq!(Onboard::shape().first_message_output(), Some("test.Asset"));
        assert_eq!(ContractShape::new().first_message_output(), None);
    }

    #[test]
    fn test_unnamed_output_is_a_definition_error() {
        struct Unnamed;
        impl Contract for Unnamed {
            const TYPE_NAME: &'static str = "test.Unnamed";
            fn shape() -> ContractShape {
                ContractShape::new().function(Function::new(
                    "emit",
                    PartyType::Owner,
                    Output::message::<Asset>(),
                ))
            }
        }

        let (contract_ref, proto_ref) = refs();
        match dehydrate_spec::<Unnamed>(contract_ref, proto_ref) {
            Err(VellumError::ContractDefinition { type_name, reason }) => {
                assert_eq!(type_name, "test.Unnamed");
                assert!(reason.contains("emit"));
            }
            other => panic!("expected definition error, got {other:?}"),
        }
    }

    #[test]
    fn test_unbound_input_is_a_definition_error() {
        struct Unbound;
        impl Contract for Unbound {
            const TYPE_NAME: &'static str = "test.Unbound";
            fn shape() -> ContractShape {
                ContractShape::new().input(Param::message::<Asset>())
            }
        }

        let (contract_ref, proto_ref) = refs();
        assert!(matches!(
            dehydrate_spec::<Unbound>(contract_ref, proto_ref),
            Err(VellumError::ContractDefinition { .. })
        ));
    }
}
