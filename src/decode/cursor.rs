use memchr::{memchr, memmem};

use crate::constants::is_whitespace;
use crate::Error;

/// Forward byte scanner over the raw document. Every lookup is bounded by
/// the slice, so truncated input ends in an error instead of an overrun.
pub(crate) struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    pub fn byte_at(&self, idx: usize) -> u8 {
        self.input[idx]
    }

    pub fn bump(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(byte) if is_whitespace(byte)) {
            self.pos += 1;
        }
    }

    /// Skips spaces and tabs without leaving the current line.
    pub fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Absolute index of the next `byte` at or after the cursor.
    pub fn find(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|idx| self.pos + idx)
    }

    pub fn find_from(&self, from: usize, needle: &[u8]) -> Option<usize> {
        let from = from.min(self.input.len());
        memmem::find(&self.input[from..], needle).map(|idx| from + idx)
    }

    pub fn take_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while matches!(self.peek(), Some(byte) if pred(byte)) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    pub fn expect(&mut self, byte: u8, message: &str) -> Result<(), Error> {
        if self.peek() != Some(byte) {
            return Err(self.error(message));
        }
        self.pos += 1;
        Ok(())
    }

    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.input, self.pos)
    }

    pub fn error_at(&self, message: impl Into<String>, offset: usize) -> Error {
        Error::syntax(message, self.input, offset)
    }
}
