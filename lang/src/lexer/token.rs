use std::fmt;

/// Position in source text. All fields are 0-based.
///
/// `offset` is a byte offset into the UTF-8 input, `column` counts
/// characters since the last line feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Renders as 1-based `line:column`, the form editors expect.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Half-open range `[from, to)` in source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub from: Position,
    pub to: Position,
}

impl Span {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Byte range of the span, suitable for slicing the source.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.from.offset..self.to.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Numeric base an integer literal was scanned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Octal => 8,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        ch.is_digit(self.radix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Char,
    String,
    Int(Base),
    Float,
    LParen,
    RParen,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Char | TokenKind::String | TokenKind::Int(_) | TokenKind::Float
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Char => write!(f, "char literal"),
            TokenKind::String => write!(f, "string literal"),
            TokenKind::Int(_) => write!(f, "integer literal"),
            TokenKind::Float => write!(f, "float literal"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
        }
    }
}

/// Token with position information.
///
/// `literal` holds the decoded text: escape sequences are already resolved
/// for strings and chars, and integer literals keep only their digits (plus
/// a leading `-`), with the base recorded on the kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// Base of an integer literal, `None` for every other kind.
    pub fn base(&self) -> Option<Base> {
        match self.kind {
            TokenKind::Int(base) => Some(base),
            _ => None,
        }
    }
}
