use super::token::Position;

/// Tracks byte offset, line and column while walking the input.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'src> {
    input: &'src str,
    position: Position,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(input: &'src str) -> Self {
        Self {
            input,
            position: Position::default(),
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Returns the current char and moves past it.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position.offset += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        Some(ch)
    }

    /// Advances while `accept` holds and returns the consumed slice.
    pub(crate) fn eat_while(&mut self, mut accept: impl FnMut(char) -> bool) -> &'src str {
        let start = self.position.offset;
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.position.offset]
    }

    fn rest(&self) -> &'src str {
        &self.input[self.position.offset..]
    }
}
