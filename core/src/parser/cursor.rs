//! Source cursor and character classification.

/// A position inside an expression source.
///
/// [`crate::compile`] advances a cursor past the expression it consumed, so
/// an expression can be embedded in a larger document and parsing can
/// continue after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<'s> {
    source: &'s str,
    offset: usize,
}

/// ASCII whitespace as the C library classifies it (includes vertical tab).
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

impl<'s> Cursor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source, offset: 0 }
    }

    /// Cursor starting at byte `offset`, clamped to the end of `source`.
    ///
    /// An offset inside a multi-byte character moves back to the start of
    /// that character.
    pub fn at(source: &'s str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        Self { source, offset }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Byte offset into [`Cursor::source`].
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unconsumed text.
    pub fn rest(&self) -> &'s str {
        &self.source[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub(crate) fn reset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.offset).copied()
    }

    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.offset + ahead).copied()
    }

    /// Character at the cursor, decoded as UTF-8.
    pub(crate) fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self, bytes: usize) {
        self.offset = (self.offset + bytes).min(self.source.len());
    }

    /// Consume `b` if it is the next byte.
    pub(crate) fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds and return them.
    pub(crate) fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'s str {
        let start = self.offset;
        while self.peek().is_some_and(&pred) {
            self.offset += 1;
        }
        &self.source[start..self.offset]
    }

    /// Skip whitespace and `;` line comments.
    pub fn skip_trivia(&mut self) {
        loop {
            self.take_while(is_space);
            if self.peek() == Some(b';') {
                self.take_while(|b| b != b'\n');
            } else {
                break;
            }
        }
    }

    /// Scan a numeric literal at the cursor and return its text.
    ///
    /// Accepts an optional `-` (only when a digit follows), digits, an
    /// optional fraction and an optional exponent. The exponent is only
    /// consumed when at least one digit follows `e`/`E` and its sign, so
    /// `2e` scans as `2`.
    pub(crate) fn scan_number(&mut self) -> &'s str {
        let start = self.offset;
        self.eat(b'-');
        self.take_while(|b| b.is_ascii_digit());
        if self.peek() == Some(b'.') {
            self.offset += 1;
            self.take_while(|b| b.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if self.peek_at(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                self.offset += 1 + sign;
                self.take_while(|b| b.is_ascii_digit());
            }
        }
        &self.source[start..self.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_trivia_handles_comments() {
        let mut cursor = Cursor::new("  ; one\n\t; two\n  x");
        cursor.skip_trivia();
        assert_eq!(cursor.rest(), "x");

        let mut cursor = Cursor::new("; only a comment");
        cursor.skip_trivia();
        assert!(cursor.is_at_end());

        let mut cursor = Cursor::new("\x0b\x0c1");
        cursor.skip_trivia();
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_scan_number() {
        let cases = [
            ("1", "1"),
            ("3.25+", "3.25"),
            ("1E-6)", "1E-6"),
            ("6.022e23", "6.022e23"),
            ("-8)", "-8"),
            ("2e", "2"),
            ("2e+x", "2"),
            ("1.2.3", "1.2"),
            ("7.", "7."),
        ];
        for (input, expected) in cases {
            let mut cursor = Cursor::new(input);
            assert_eq!(cursor.scan_number(), expected, "scanning {:?}", input);
        }
    }

    #[test]
    fn test_at_snaps_to_char_boundary() {
        let source = "é1";
        assert_eq!(Cursor::at(source, 1).offset(), 0);
        assert_eq!(Cursor::at(source, 2).rest(), "1");
        assert_eq!(Cursor::at(source, 99).offset(), 3);
        assert_eq!(Cursor::at("x😀", 3).offset(), 1);
        assert_eq!(Cursor::at(source, 1).peek_char(), Some('é'));
    }

    #[test]
    fn test_take_while_identifier() {
        let mut cursor = Cursor::new("x_1(2)");
        assert_eq!(cursor.take_while(is_ident_continue), "x_1");
        assert_eq!(cursor.peek(), Some(b'('));
    }
}
