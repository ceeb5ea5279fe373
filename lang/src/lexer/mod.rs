mod cursor;
pub mod token;

use cursor::Cursor;
pub use token::{Base, Position, Span, Token, TokenKind};

use thiserror::Error;


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Malformed literal, escape or digit run, or a character no token
    /// starts with.
    #[error("format error")]
    Format { position: Position },

    #[error("unknown escape character '{ch}'")]
    UnknownEscapeChar { ch: char, position: Position },

    /// Input ended where a token (or the rest of one) was required.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput { position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::Format { position }
            | LexError::UnknownEscapeChar { position, .. }
            | LexError::UnexpectedEndOfInput { position } => *position,
        }
    }
}

pub type LexResult = Result<Vec<Token>, LexError>;

/// Scans the whole input into a token vector.
pub fn lex(input: &str) -> LexResult {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.scan()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Pull-based tokenizer: every call to [`Lexer::scan`] yields one token.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    reached_end: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            cursor: Cursor::new(input),
            reached_end: false,
        }
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Scans the next token.
    ///
    /// The end of input is reported as `Ok(None)` exactly once. Scanning
    /// again after that fails with [`LexError::UnexpectedEndOfInput`].
    pub fn scan(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia();

        let start = self.cursor.position();
        let Some(ch) = self.cursor.peek() else {
            if self.reached_end {
                return Err(LexError::UnexpectedEndOfInput { position: start });
            }
            self.reached_end = true;
            return Ok(None);
        };

        let (kind, literal) = match ch {
            '0'..='9' => self.scan_number(String::new())?,
            '-' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    Some('0'..='9') => self.scan_number(String::from("-"))?,
                    _ => {
                        return Err(LexError::Format {
                            position: self.cursor.position(),
                        })
                    }
                }
            }
            ch if ch.is_alphabetic() || ch == '_' => {
                let word = self
                    .cursor
                    .eat_while(|ch| ch.is_alphanumeric() || ch == '_');
                (TokenKind::Identifier, word.to_string())
            }
            '(' => {
                self.cursor.advance();
                (TokenKind::LParen, String::from("("))
            }
            ')' => {
                self.cursor.advance();
                (TokenKind::RParen, String::from(")"))
            }
            '"' => (TokenKind::String, self.scan_quoted('"')?),
            '\'' => (TokenKind::Char, self.scan_char()?),
            _ => return Err(LexError::Format { position: start }),
        };

        let token = Token::new(kind, literal, Span::new(start, self.cursor.position()));
        log::trace!("scanned {} {:?} at {}", token.kind, token.literal, token.span);
        Ok(Some(token))
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.cursor.advance();
                }
                Some('/') if self.cursor.peek_second() == Some('/') => {
                    self.cursor.eat_while(|ch| ch != '\n');
                }
                _ => break,
            }
        }
    }

    /// Scans an integer or float literal. `literal` holds the sign, if any.
    fn scan_number(&mut self, mut literal: String) -> Result<(TokenKind, String), LexError> {
        if self.cursor.peek() == Some('0') {
            let base = match self.cursor.peek_second() {
                Some('x') => Some(Base::Hex),
                Some('o') => Some(Base::Octal),
                Some('b') => Some(Base::Binary),
                _ => None,
            };
            if let Some(base) = base {
                self.cursor.advance();
                self.cursor.advance();
                let digits = self.cursor.eat_while(|ch| base.accepts(ch));
                if digits.is_empty() {
                    return Err(LexError::Format {
                        position: self.cursor.position(),
                    });
                }
                literal.push_str(digits);
                return Ok((TokenKind::Int(base), literal));
            }
        }

        literal.push_str(self.cursor.eat_while(|ch| ch.is_ascii_digit()));

        let has_fraction = self.cursor.peek() == Some('.')
            && self
                .cursor
                .peek_second()
                .is_some_and(|ch| ch.is_ascii_digit());
        if !has_fraction {
            return Ok((TokenKind::Int(Base::Decimal), literal));
        }

        self.cursor.advance();
        literal.push('.');
        literal.push_str(self.cursor.eat_while(|ch| ch.is_ascii_digit()));

        if let Some(e @ ('e' | 'E')) = self.cursor.peek() {
            self.cursor.advance();
            literal.push(e);
            if let Some(sign @ ('+' | '-')) = self.cursor.peek() {
                self.cursor.advance();
                literal.push(sign);
            }
            let exponent = self.cursor.eat_while(|ch| ch.is_ascii_digit());
            if exponent.is_empty() {
                return Err(LexError::Format {
                    position: self.cursor.position(),
                });
            }
            literal.push_str(exponent);
        }

        Ok((TokenKind::Float, literal))
    }

    fn scan_char(&mut self) -> Result<String, LexError> {
        let value = self.scan_quoted('\'')?;
        if value.chars().count() != 1 {
            return Err(LexError::Format {
                position: self.cursor.position(),
            });
        }
        Ok(value)
    }

    /// Scans a quoted literal, starting at the opening quote, and returns the
    /// escape-resolved contents.
    fn scan_quoted(&mut self, quote: char) -> Result<String, LexError> {
        self.cursor.advance();
        let mut value = String::new();

        loop {
            match self.cursor.advance() {
                Some('\\') => value.push(self.scan_escape(quote)?),
                Some(ch) if ch == quote => return Ok(value),
                Some(ch) => value.push(ch),
                None => {
                    return Err(LexError::UnexpectedEndOfInput {
                        position: self.cursor.position(),
                    })
                }
            }
        }
    }

    fn scan_escape(&mut self, quote: char) -> Result<char, LexError> {
        let position = self.cursor.position();
        let escaped = match self.cursor.advance() {
            Some(ch) if ch == quote => quote,
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('x') => self.scan_unicode_hex(2)?,
            Some('u') => self.scan_unicode_hex(4)?,
            Some('U') => self.scan_unicode_hex(8)?,
            Some(ch) => return Err(LexError::UnknownEscapeChar { ch, position }),
            None => return Err(LexError::UnexpectedEndOfInput { position }),
        };
        Ok(escaped)
    }

    /// Reads exactly `digits` hex digits and converts them to one char.
    fn scan_unicode_hex(&mut self, digits: usize) -> Result<char, LexError> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            let position = self.cursor.position();
            let ch = self
                .cursor
                .advance()
                .ok_or(LexError::UnexpectedEndOfInput { position })?;
            let digit = ch.to_digit(16).ok_or(LexError::Format { position })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LexError::Format {
            position: self.cursor.position(),
        })
    }
}
