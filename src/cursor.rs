//! Line cursor for the classifier.
//!
//! All Markdown syntax characters are ASCII, so the classifier walks bytes
//! and copies everything else through as ranges. UTF-8 sequences are never
//! split because no multi-byte sequence contains an ASCII byte.

use crate::Range;
use memchr::memchr;

/// A cursor that steps through an input buffer one line at a time.
///
/// # Example
/// ```
/// use mkdown::cursor::Cursor;
///
/// let input = b"first\r\nsecond";
/// let mut cursor = Cursor::new(input);
/// assert_eq!(cursor.line_end(), 5);
/// assert_eq!(cursor.consume_line().slice(input), b"first");
/// assert_eq!(cursor.offset(), 7);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Consume the rest of the line and its terminator.
    ///
    /// Returns the line content without `\n` or `\r\n`.
    pub fn consume_line(&mut self) -> Range {
        let start = self.pos;
        let end = self.line_end();
        self.pos = match memchr(b'\n', &self.input[start..]) {
            Some(i) => start + i + 1,
            None => self.input.len(),
        };
        Range::from_usize(start, end)
    }

    /// End offset of the current line, without consuming it.
    pub fn line_end(&self) -> usize {
        let rest = &self.input[self.pos..];
        let mut end = match memchr(b'\n', rest) {
            Some(i) => self.pos + i,
            None => self.input.len(),
        };
        if end > self.pos && self.input[end - 1] == b'\r' {
            end -= 1;
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_lines() {
        let input = b"one\r\ntwo\nthree";
        let mut c = Cursor::new(input);
        assert_eq!(c.consume_line().slice(input), b"one");
        assert_eq!(c.consume_line().slice(input), b"two");
        assert_eq!(c.consume_line().slice(input), b"three");
        assert!(c.is_eof());
    }

    #[test]
    fn test_line_end_does_not_move() {
        let c = Cursor::new(b"ab\ncd");
        assert_eq!(c.line_end(), 2);
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn test_trailing_newline() {
        let input = b"a\n";
        let mut c = Cursor::new(input);
        c.consume_line();
        assert!(c.is_eof());
    }
}
