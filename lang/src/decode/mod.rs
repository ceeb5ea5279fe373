//! Type-directed decoding of parsed documents.
//!
//! The target type describes its own shape through its `serde::Deserialize`
//! implementation: records name their fields, sequences their element type,
//! and scalars their kind and width. The decoder walks the tree alongside
//! that description.
//!
//! Records are matched by name against sub-lists, so
//! `(a (IntA 1) (StructA (IntB 2)))` fills `IntA` and `StructA.IntB`.
//! Fields missing from the source keep their zero value. That zero comes
//! from the decoder, so `#[serde(default)]` and `#[serde(default = "...")]`
//! on a field have no effect.

mod de;
mod fields;
#[cfg(test)]
mod tests;

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::lexer::Span;
use crate::parser::ast::{List, Node, NodeKind};
use de::NodeDeserializer;
pub use fields::FieldMap;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("type mismatch, want {want} but have {have}")]
    TypeMismatch {
        want: &'static str,
        have: NodeKind,
        span: Span,
    },

    /// A scalar was read from a list that does not hold exactly one element.
    #[error("list length mismatch, want {expected} elements but have {found}")]
    ListLengthMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("unsupported type: {name}")]
    UnsupportedType { name: String, span: Span },

    #[error("invalid {target} literal '{text}'")]
    NumericFormat {
        text: String,
        target: &'static str,
        span: Span,
    },

    #[error("literal '{text}' out of range for {target}")]
    NumericRange {
        text: String,
        target: &'static str,
        span: Span,
    },

    /// Reserved for tagged enum decoding.
    #[error("undefined identifier: {name}")]
    UndefinedIdentifier { name: String, span: Span },

    /// Reserved for tagged enum decoding.
    #[error("undefined enum type: {name}")]
    UndefinedEnumType { name: String, span: Span },

    #[error("duplicate field: {name}")]
    DuplicateField { name: String, span: Span },

    /// Raised by a `Deserialize` implementation rather than the decoder.
    #[error("{message}")]
    Custom { message: String, span: Option<Span> },
}

impl DecodeError {
    pub fn span(&self) -> Option<Span> {
        match self {
            DecodeError::TypeMismatch { span, .. }
            | DecodeError::ListLengthMismatch { span, .. }
            | DecodeError::UnsupportedType { span, .. }
            | DecodeError::NumericFormat { span, .. }
            | DecodeError::NumericRange { span, .. }
            | DecodeError::UndefinedIdentifier { span, .. }
            | DecodeError::UndefinedEnumType { span, .. }
            | DecodeError::DuplicateField { span, .. } => Some(*span),
            DecodeError::Custom { span, .. } => *span,
        }
    }

    /// Attaches `span` to an error that does not carry one yet.
    pub(crate) fn with_span(self, span: Span) -> Self {
        match self {
            DecodeError::Custom {
                message,
                span: None,
            } => DecodeError::Custom {
                message,
                span: Some(span),
            },
            err => err,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Custom {
            message: msg.to_string(),
            span: None,
        }
    }
}

/// What to do when a record lists the same field more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateFields {
    /// The last occurrence is used.
    #[default]
    LastWins,
    /// A repeated field is a [`DecodeError::DuplicateField`].
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub duplicate_fields: DuplicateFields,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_duplicate_fields(mut self) -> Self {
        self.duplicate_fields = DuplicateFields::Reject;
        self
    }
}

/// Decodes a root list, usually into a record type.
pub fn from_list<'de, T: Deserialize<'de>>(list: &'de List) -> Result<T, DecodeError> {
    from_list_with(list, &DecodeOptions::default())
}

/// Like [`from_list`], with explicit [`DecodeOptions`].
pub fn from_list_with<'de, T: Deserialize<'de>>(
    list: &'de List,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    log::debug!(
        "decoding '{}' into {}",
        list.name(),
        std::any::type_name::<T>()
    );
    T::deserialize(NodeDeserializer::new(list.into(), options))
}

/// Decodes any node, for callers holding a sub-tree rather than a root.
pub fn from_node<'de, T: Deserialize<'de>>(node: &'de Node) -> Result<T, DecodeError> {
    from_node_with(node, &DecodeOptions::default())
}

/// Like [`from_node`], with explicit [`DecodeOptions`].
pub fn from_node_with<'de, T: Deserialize<'de>>(
    node: &'de Node,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    T::deserialize(NodeDeserializer::new(node.into(), options))
}
