//! Static parameter descriptors.
//!
//! Contracts and hydratable types describe their inputs and outputs with
//! these literals instead of being inspected at runtime.

use vellum_core::Message;

/// One declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Fully-qualified type identifier.
    pub type_name: &'static str,
    /// Whether the type is a structured [`Message`].
    pub is_message: bool,
    /// Storage record binding, if any.
    pub record: Option<&'static str>,
}

impl Param {
    /// A message bound to the stored record `name`.
    pub fn record<M: Message>(name: &'static str) -> Self {
        Self {
            type_name: M::TYPE_NAME,
            is_message: true,
            record: Some(name),
        }
    }

    /// A message with no record binding.
    pub fn message<M: Message>() -> Self {
        Self {
            type_name: M::TYPE_NAME,
            is_message: true,
            record: None,
        }
    }

    /// A plain value that is not a message.
    pub const fn value(type_name: &'static str) -> Self {
        Self {
            type_name,
            is_message: false,
            record: None,
        }
    }

    /// The record name, when this parameter is a record-bound message.
    pub fn binding(&self) -> Option<&'static str> {
        if self.is_message {
            self.record
        } else {
            None
        }
    }
}

/// What a contract function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// A message stored under `record` once the function runs.
    Message {
        type_name: &'static str,
        record: Option<&'static str>,
    },
    /// A non-message value.
    Value(&'static str),
    Unit,
}

impl Output {
    /// A message output stored under record `name`.
    pub fn record<M: Message>(name: &'static str) -> Self {
        Output::Message {
            type_name: M::TYPE_NAME,
            record: Some(name),
        }
    }

    /// A message output with no record binding.
    pub fn message<M: Message>() -> Self {
        Output::Message {
            type_name: M::TYPE_NAME,
            record: None,
        }
    }

    /// Type identifier when the output is a message.
    pub fn message_type(&self) -> Option<&'static str> {
        match self {
            Output::Message { type_name, .. } => Some(*type_name),
            _ => None,
        }
    }
}
