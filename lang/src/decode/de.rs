use std::num::IntErrorKind;
use std::str::FromStr;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};

use super::{DecodeError, DecodeOptions, FieldMap};
use crate::lexer::{Base, Span, Token, TokenKind};
use crate::parser::ast::{List, Node, NodeKind};

/// Borrowed view of a node; the root list is not wrapped in a `Node`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeRef<'de> {
    Literal(&'de Token),
    Identifier(&'de Token),
    List(&'de List),
}

impl<'de> From<&'de Node> for NodeRef<'de> {
    fn from(node: &'de Node) -> Self {
        match node {
            Node::Literal(token) => NodeRef::Literal(token),
            Node::Identifier(token) => NodeRef::Identifier(token),
            Node::List(list) => NodeRef::List(list),
        }
    }
}

impl<'de> From<&'de List> for NodeRef<'de> {
    fn from(list: &'de List) -> Self {
        NodeRef::List(list)
    }
}

impl NodeRef<'_> {
    fn span(&self) -> Span {
        match self {
            NodeRef::Literal(token) | NodeRef::Identifier(token) => token.span,
            NodeRef::List(list) => list.span,
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Literal(token) => NodeKind::Literal(token.kind),
            NodeRef::Identifier(_) => NodeKind::Identifier,
            NodeRef::List(_) => NodeKind::List,
        }
    }

    fn mismatch(&self, want: &'static str) -> DecodeError {
        DecodeError::TypeMismatch {
            want,
            have: self.kind(),
            span: self.span(),
        }
    }
}

fn radix(token: &Token) -> u32 {
    token.base().map_or(10, Base::radix)
}

fn numeric_format(token: &Token, target: &'static str) -> DecodeError {
    DecodeError::NumericFormat {
        text: token.literal.clone(),
        target,
        span: token.span,
    }
}

fn numeric_range(token: &Token, target: &'static str) -> DecodeError {
    DecodeError::NumericRange {
        text: token.literal.clone(),
        target,
        span: token.span,
    }
}

fn int_error(kind: &IntErrorKind, token: &Token, target: &'static str) -> DecodeError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => numeric_range(token, target),
        _ => numeric_format(token, target),
    }
}

/// Parses a literal in the base it was scanned in, then narrows it to `T`.
fn parse_signed<T: TryFrom<i128>>(token: &Token, target: &'static str) -> Result<T, DecodeError> {
    if token.literal.starts_with('+') {
        return Err(numeric_format(token, target));
    }
    let value = i128::from_str_radix(&token.literal, radix(token))
        .map_err(|err| int_error(err.kind(), token, target))?;
    T::try_from(value).map_err(|_| numeric_range(token, target))
}

fn parse_unsigned<T: TryFrom<u128>>(token: &Token, target: &'static str) -> Result<T, DecodeError> {
    let (negative, digits) = match token.literal.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, token.literal.as_str()),
    };
    if digits.starts_with('+') {
        return Err(numeric_format(token, target));
    }
    let value = u128::from_str_radix(digits, radix(token))
        .map_err(|err| int_error(err.kind(), token, target))?;
    if negative && value != 0 {
        return Err(numeric_range(token, target));
    }
    T::try_from(value).map_err(|_| numeric_range(token, target))
}

fn parse_float<T: FromStr>(token: &Token, target: &'static str) -> Result<T, DecodeError> {
    let non_decimal = matches!(token.kind, TokenKind::Int(base) if base != Base::Decimal);
    if non_decimal || !is_decimal_number(&token.literal) {
        return Err(numeric_format(token, target));
    }
    token
        .literal
        .parse()
        .map_err(|_| numeric_format(token, target))
}

/// `-? digits ('.' digits)? ([eE] [+-]? digits)?`
fn is_decimal_number(text: &str) -> bool {
    fn digits(text: &str) -> (&str, &str) {
        let end = text
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(text.len());
        text.split_at(end)
    }

    let text = text.strip_prefix('-').unwrap_or(text);
    let (whole, mut rest) = digits(text);
    if whole.is_empty() {
        return false;
    }
    if let Some(after_dot) = rest.strip_prefix('.') {
        let (fraction, after) = digits(after_dot);
        if fraction.is_empty() {
            return false;
        }
        rest = after;
    }
    if let Some(after_e) = rest.strip_prefix(['e', 'E']) {
        let after_sign = after_e.strip_prefix(['+', '-']).unwrap_or(after_e);
        let (exponent, after) = digits(after_sign);
        if exponent.is_empty() {
            return false;
        }
        rest = after;
    }
    rest.is_empty()
}

pub(crate) struct NodeDeserializer<'a, 'de> {
    node: NodeRef<'de>,
    options: &'a DecodeOptions,
}

impl<'a, 'de> NodeDeserializer<'a, 'de> {
    pub(crate) fn new(node: NodeRef<'de>, options: &'a DecodeOptions) -> Self {
        Self { node, options }
    }

    fn list(&self, want: &'static str) -> Result<&'de List, DecodeError> {
        match self.node {
            NodeRef::List(list) => Ok(list),
            other => Err(other.mismatch(want)),
        }
    }

    /// A scalar is either a bare node or a list holding exactly one element.
    fn scalar_node(&self) -> Result<NodeRef<'de>, DecodeError> {
        match self.node {
            NodeRef::List(list) => match list.elements.as_slice() {
                [only] => Ok(only.into()),
                elements => Err(DecodeError::ListLengthMismatch {
                    expected: 1,
                    found: elements.len(),
                    span: list.span,
                }),
            },
            other => Ok(other),
        }
    }

    fn literal(&self, want: &'static str) -> Result<&'de Token, DecodeError> {
        match self.scalar_node()? {
            NodeRef::Literal(token) => Ok(token),
            other => Err(other.mismatch(want)),
        }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident($ty:ty) via $parse:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let token = self.literal(stringify!($ty))?;
                let value: $ty = $parse(token, stringify!($ty))?;
                visitor.$visit(value).map_err(|err: DecodeError| err.with_span(token.span))
            }
        )*
    };
}

impl<'a, 'de> de::Deserializer<'de> for NodeDeserializer<'a, 'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, DecodeError> {
        Err(DecodeError::UnsupportedType {
            name: String::from("self-describing value"),
            span: self.node.span(),
        })
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let node = self.scalar_node()?;
        let text = match node {
            NodeRef::Literal(token) | NodeRef::Identifier(token) => token.literal.as_str(),
            NodeRef::List(_) => return Err(node.mismatch("bool")),
        };
        let value = match text {
            "true" => true,
            "false" => false,
            _ => return Err(node.mismatch("bool")),
        };
        visitor
            .visit_bool(value)
            .map_err(|err: DecodeError| err.with_span(node.span()))
    }

    deserialize_number! {
        deserialize_i8 => visit_i8(i8) via parse_signed,
        deserialize_i16 => visit_i16(i16) via parse_signed,
        deserialize_i32 => visit_i32(i32) via parse_signed,
        deserialize_i64 => visit_i64(i64) via parse_signed,
        deserialize_i128 => visit_i128(i128) via parse_signed,
        deserialize_u8 => visit_u8(u8) via parse_unsigned,
        deserialize_u16 => visit_u16(u16) via parse_unsigned,
        deserialize_u32 => visit_u32(u32) via parse_unsigned,
        deserialize_u64 => visit_u64(u64) via parse_unsigned,
        deserialize_u128 => visit_u128(u128) via parse_unsigned,
        deserialize_f32 => visit_f32(f32) via parse_float,
        deserialize_f64 => visit_f64(f64) via parse_float,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let token = self.literal("char")?;
        let mut chars = token.literal.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor
                .visit_char(ch)
                .map_err(|err: DecodeError| err.with_span(token.span)),
            _ => Err(NodeRef::Literal(token).mismatch("char")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let token = self.literal("string")?;
        visitor
            .visit_borrowed_str(&token.literal)
            .map_err(|err: DecodeError| err.with_span(token.span))
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let token = self.literal("bytes")?;
        visitor
            .visit_borrowed_bytes(token.literal.as_bytes())
            .map_err(|err: DecodeError| err.with_span(token.span))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let span = self.node.span();
        visitor
            .visit_some(self)
            .map_err(|err: DecodeError| err.with_span(span))
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor
            .visit_unit()
            .map_err(|err: DecodeError| err.with_span(self.node.span()))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let span = self.node.span();
        visitor
            .visit_newtype_struct(self)
            .map_err(|err: DecodeError| err.with_span(span))
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let list = self.list("sequence")?;
        visitor
            .visit_seq(ElementsAccess::new(list, self.options))
            .map_err(|err: DecodeError| err.with_span(list.span))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let list = self.list("tuple")?;
        if list.len() != len {
            return Err(DecodeError::ListLengthMismatch {
                expected: len,
                found: list.len(),
                span: list.span,
            });
        }
        visitor
            .visit_seq(ElementsAccess::new(list, self.options))
            .map_err(|err: DecodeError| err.with_span(list.span))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, DecodeError> {
        Err(DecodeError::UnsupportedType {
            name: String::from("map"),
            span: self.node.span(),
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let list = self.list("record")?;
        let present = FieldMap::build(list, self.options.duplicate_fields)?;
        visitor
            .visit_map(RecordAccess::new(fields, present, list.span, self.options))
            .map_err(|err: DecodeError| err.with_span(list.span))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, DecodeError> {
        Err(DecodeError::UnsupportedType {
            name: name.to_string(),
            span: self.node.span(),
        })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

/// Positional access to a list's elements.
struct ElementsAccess<'a, 'de> {
    elements: std::slice::Iter<'de, Node>,
    options: &'a DecodeOptions,
}

impl<'a, 'de> ElementsAccess<'a, 'de> {
    fn new(list: &'de List, options: &'a DecodeOptions) -> Self {
        Self {
            elements: list.elements.iter(),
            options,
        }
    }
}

impl<'a, 'de> SeqAccess<'de> for ElementsAccess<'a, 'de> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        match self.elements.next() {
            Some(node) => seed
                .deserialize(NodeDeserializer::new(node.into(), self.options))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.elements.len())
    }
}

/// Feeds every declared field to the visitor in declaration order, backed
/// by the matching sub-list or by a zero value when the source omits it.
struct RecordAccess<'a, 'de> {
    fields: std::slice::Iter<'static, &'static str>,
    present: FieldMap<'de>,
    pending: Option<&'de List>,
    span: Span,
    options: &'a DecodeOptions,
}

impl<'a, 'de> RecordAccess<'a, 'de> {
    fn new(
        fields: &'static [&'static str],
        present: FieldMap<'de>,
        span: Span,
        options: &'a DecodeOptions,
    ) -> Self {
        Self {
            fields: fields.iter(),
            present,
            pending: None,
            span,
            options,
        }
    }
}

impl<'a, 'de> MapAccess<'de> for RecordAccess<'a, 'de> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        let Some(name) = self.fields.next() else {
            return Ok(None);
        };
        self.pending = self.present.get(name);
        seed.deserialize(BorrowedStrDeserializer::new(*name))
            .map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, DecodeError> {
        match self.pending.take() {
            Some(list) => seed.deserialize(NodeDeserializer::new(list.into(), self.options)),
            None => seed.deserialize(ZeroDeserializer::new(self.span, self.options)),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Produces the zero value of whatever type asks for one.
struct ZeroDeserializer<'a> {
    span: Span,
    options: &'a DecodeOptions,
}

impl<'a> ZeroDeserializer<'a> {
    fn new(span: Span, options: &'a DecodeOptions) -> Self {
        Self { span, options }
    }

    fn unsupported(&self, name: &str) -> DecodeError {
        DecodeError::UnsupportedType {
            name: name.to_string(),
            span: self.span,
        }
    }
}

macro_rules! deserialize_zero {
    ($($method:ident => $visit:ident($zero:expr),)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let span = self.span;
                visitor.$visit($zero).map_err(|err: DecodeError| err.with_span(span))
            }
        )*
    };
}

impl<'a, 'de> de::Deserializer<'de> for ZeroDeserializer<'a> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, DecodeError> {
        Err(self.unsupported("self-describing value"))
    }

    deserialize_zero! {
        deserialize_bool => visit_bool(false),
        deserialize_i8 => visit_i8(0),
        deserialize_i16 => visit_i16(0),
        deserialize_i32 => visit_i32(0),
        deserialize_i64 => visit_i64(0),
        deserialize_i128 => visit_i128(0),
        deserialize_u8 => visit_u8(0),
        deserialize_u16 => visit_u16(0),
        deserialize_u32 => visit_u32(0),
        deserialize_u64 => visit_u64(0),
        deserialize_u128 => visit_u128(0),
        deserialize_f32 => visit_f32(0.0),
        deserialize_f64 => visit_f64(0.0),
        deserialize_char => visit_char('\0'),
        deserialize_str => visit_borrowed_str(""),
        deserialize_string => visit_borrowed_str(""),
        deserialize_bytes => visit_borrowed_bytes(&[]),
        deserialize_byte_buf => visit_borrowed_bytes(&[]),
        deserialize_identifier => visit_borrowed_str(""),
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_none()
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let span = self.span;
        visitor
            .visit_seq(ZeroElements::new(0, self.span, self.options))
            .map_err(|err: DecodeError| err.with_span(span))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let span = self.span;
        visitor
            .visit_seq(ZeroElements::new(len, self.span, self.options))
            .map_err(|err: DecodeError| err.with_span(span))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_map(ZeroElements::new(0, self.span, self.options))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let span = self.span;
        visitor
            .visit_map(RecordAccess::new(
                fields,
                FieldMap::default(),
                self.span,
                self.options,
            ))
            .map_err(|err: DecodeError| err.with_span(span))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, DecodeError> {
        Err(self.unsupported(name))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

/// `len` zero values as a sequence. With `len == 0` it doubles as an empty
/// map.
struct ZeroElements<'a> {
    remaining: usize,
    span: Span,
    options: &'a DecodeOptions,
}

impl<'a> ZeroElements<'a> {
    fn new(remaining: usize, span: Span, options: &'a DecodeOptions) -> Self {
        Self {
            remaining,
            span,
            options,
        }
    }
}

impl<'a, 'de> SeqAccess<'de> for ZeroElements<'a> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(ZeroDeserializer::new(self.span, self.options))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'a, 'de> MapAccess<'de> for ZeroElements<'a> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        _seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        _seed: V,
    ) -> Result<V::Value, DecodeError> {
        Err(de::Error::custom("value requested from an empty map"))
    }
}
