//! Syntax tree for S-expression documents.
//!
//! The tree is closed over three node kinds: scalar literals, bare
//! identifiers, and parenthesized lists headed by an identifier.

use std::fmt;

use crate::lexer::{Span, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A char, string, integer or float token.
    Literal(Token),
    /// A bare name used as a value.
    Identifier(Token),
    List(List),
}

/// `(prefix element*)`
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub prefix: Token,
    pub elements: Vec<Node>,
    pub span: Span,
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Literal(token) | Node::Identifier(token) => token.span,
            Node::List(list) => list.span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Literal(token) => NodeKind::Literal(token.kind),
            Node::Identifier(_) => NodeKind::Identifier,
            Node::List(_) => NodeKind::List,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }
}

impl List {
    /// Name at the head of the list.
    pub fn name(&self) -> &str {
        &self.prefix.literal
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Shape of a node, used to describe what a decoder found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Literal(TokenKind),
    Identifier,
    List,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Literal(kind) => write!(f, "{}", kind),
            NodeKind::Identifier => write!(f, "identifier"),
            NodeKind::List => write!(f, "list"),
        }
    }
}
