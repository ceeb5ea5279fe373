pub mod ast;

use thiserror::Error;

use crate::lexer::{LexError, Lexer, Position, Span, Token, TokenKind};
use ast::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected {} '{}'", .found.kind, .found.literal)]
    UnexpectedToken { found: Token },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(err) => err.position(),
            ParseError::UnexpectedToken { found } => found.span.from,
        }
    }
}

/// Parses a document into its root list.
///
/// Anything after the root's closing paren is left unscanned; use
/// [`parse_strict`] to reject trailing input.
pub fn parse(input: &str) -> Result<List, ParseError> {
    let mut parser = Parser::new(input);
    let root = parser.parse_root()?;
    log::debug!(
        "parsed root '{}' with {} elements",
        root.name(),
        root.elements.len()
    );
    Ok(root)
}

/// Like [`parse`], but the root list must be the only thing in the input.
pub fn parse_strict(input: &str) -> Result<List, ParseError> {
    let mut parser = Parser::new(input);
    let root = parser.parse_root()?;
    parser.finish()?;
    Ok(root)
}

/// Recursive-descent parser holding one lazily scanned lookahead token.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Token>,
    at_end: bool,
}

impl<'src> Parser<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
            at_end: false,
        }
    }

    /// Root = List
    pub fn parse_root(&mut self) -> Result<List, ParseError> {
        self.expect_list()
    }

    /// Succeeds only if no tokens remain.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.fill()?;
        match self.lookahead.take() {
            Some(found) => Err(ParseError::UnexpectedToken { found }),
            None => Ok(()),
        }
    }

    /// List = '(' Ident Node* ')'
    fn expect_list(&mut self) -> Result<List, ParseError> {
        let open = self.match_term(TokenKind::LParen)?;
        let prefix = self.match_term(TokenKind::Identifier)?;

        let mut elements = Vec::new();
        while self.current()?.kind != TokenKind::RParen {
            elements.push(self.expect_node()?);
        }

        let close = self.match_term(TokenKind::RParen)?;
        Ok(List {
            prefix,
            elements,
            span: Span::new(open.span.from, close.span.to),
        })
    }

    /// Node = List | Ident | Literal
    fn expect_node(&mut self) -> Result<Node, ParseError> {
        match self.current()?.kind {
            TokenKind::LParen => Ok(Node::List(self.expect_list()?)),
            TokenKind::Identifier => Ok(Node::Identifier(self.bump()?)),
            kind if kind.is_literal() => Ok(Node::Literal(self.bump()?)),
            _ => Err(ParseError::UnexpectedToken {
                found: self.bump()?,
            }),
        }
    }

    /// Consumes the current token if it has the given kind.
    fn match_term(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.current()?;
        if token.kind != kind {
            return Err(ParseError::UnexpectedToken {
                found: token.clone(),
            });
        }
        self.bump()
    }

    fn current(&mut self) -> Result<&Token, ParseError> {
        self.fill()?;
        let position = self.lexer.position();
        self.lookahead
            .as_ref()
            .ok_or(ParseError::Lex(LexError::UnexpectedEndOfInput { position }))
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        self.fill()?;
        let position = self.lexer.position();
        self.lookahead
            .take()
            .ok_or(ParseError::Lex(LexError::UnexpectedEndOfInput { position }))
    }

    fn fill(&mut self) -> Result<(), ParseError> {
        if self.lookahead.is_none() && !self.at_end {
            match self.lexer.scan()? {
                Some(token) => self.lookahead = Some(token),
                None => self.at_end = true,
            }
        }
        Ok(())
    }
}
