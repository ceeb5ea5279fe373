//! Unified error handling.
//!
//! Every stage of the pipeline reports its own error type. This module
//! folds them into one [`Error`] for callers that go from text straight to
//! a typed value and only want to print a diagnostic.


use std::fmt;

use crate::decode::DecodeError;
use crate::lexer::{LexError, Position};
use crate::parser::ParseError;

/// An error from any stage: lexing, parsing or decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed token.
    Lex(LexError),

    /// Grammar violation.
    Parse(ParseError),

    /// The tree does not fit the target type.
    Decode(DecodeError),
}

impl Error {
    /// Short error kind description (e.g., "LexError", "DecodeError").
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Lex(_) => "LexError",
            Error::Parse(_) => "ParseError",
            Error::Decode(_) => "DecodeError",
        }
    }

    /// Error message without kind or position.
    pub fn message(&self) -> String {
        match self {
            Error::Lex(err) => err.to_string(),
            Error::Parse(err) => err.to_string(),
            Error::Decode(err) => err.to_string(),
        }
    }

    /// Where the error starts, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(err) => Some(err.position()),
            Error::Parse(err) => Some(err.position()),
            Error::Decode(err) => err.span().map(|span| span.from),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(position) => write!(f, "{} at {}: {}", self.kind(), position, self.message()),
            None => write!(f, "{}: {}", self.kind(), self.message()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Decode(err) => Some(err),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => Error::Lex(err),
            err => Error::Parse(err),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}
