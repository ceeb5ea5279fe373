//! Bind S-expression documents to typed Rust values.
//!
//! A document is a single list whose sub-lists name fields:
//!
//! ```text
//! (server
//!   (host "localhost")
//!   (ports 80 0x1BB)
//!   (tls (enabled true)))
//! ```
//!
//! [`parse`] turns text into a [`List`], and [`from_list`] decodes that list
//! into any type implementing `serde::Deserialize`. [`from_str`] does both.

pub mod decode;
pub mod error;
pub mod lexer;
pub mod parser;

use serde::de::DeserializeOwned;

pub use decode::{
    from_list, from_list_with, from_node, from_node_with, DecodeError, DecodeOptions,
    DuplicateFields,
};
pub use error::Error;
pub use lexer::{Position, Span};
pub use parser::ast::{List, Node};
pub use parser::{parse, parse_strict, ParseError};

/// Parses `input` and decodes the root list into `T`.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, Error> {
    from_str_with(input, &DecodeOptions::default())
}

/// Like [`from_str`], with explicit [`DecodeOptions`].
pub fn from_str_with<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T, Error> {
    let root = parse(input)?;
    Ok(from_list_with(&root, options)?)
}
