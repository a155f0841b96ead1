//! Byte cursor over the source text.
//!
//! Reads past the end return `0`, so the scanner can peek freely without
//! bounds checks. `0` never starts a valid token, which makes it a natural
//! terminator for every `eat_while` predicate.

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor { source, pos: 0 }
    }

    #[inline]
    fn byte_at(&self, offset: u32) -> u8 {
        self.source
            .as_bytes()
            .get((self.pos + offset) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Byte at the current position, `0` at EOF.
    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.byte_at(0)
    }

    #[inline]
    pub(crate) fn peek(&self) -> u8 {
        self.byte_at(1)
    }

    #[inline]
    pub(crate) fn peek2(&self) -> u8 {
        self.byte_at(2)
    }

    #[inline]
    pub(crate) fn peek3(&self) -> u8 {
        self.byte_at(3)
    }

    /// The full character at the current position.
    pub(crate) fn current_char(&self) -> Option<char> {
        self.source.get(self.pos as usize..)?.chars().next()
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Step over the current character, however many bytes it occupies.
    pub(crate) fn advance_char(&mut self) {
        let width = self.current_char().map_or(1, char::len_utf8);
        #[allow(clippy::cast_possible_truncation, reason = "a char is at most 4 bytes")]
        self.advance_n(width as u32);
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos as usize >= self.source.len()
    }

    #[inline]
    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    /// Source text from `start` to the current position.
    pub(crate) fn slice_from(&self, start: u32) -> &'a str {
        self.source
            .get(start as usize..self.pos as usize)
            .unwrap_or_default()
    }

    /// Bytes from the current position to the end.
    pub(crate) fn rest(&self) -> &'a [u8] {
        self.source
            .as_bytes()
            .get(self.pos as usize..)
            .unwrap_or_default()
    }

    /// Jump to the end of the source.
    pub(crate) fn skip_to_end(&mut self) {
        #[allow(clippy::cast_possible_truncation, reason = "sources are < 4GiB")]
        let len = self.source.len() as u32;
        self.pos = len;
    }

    /// Advance while `pred` holds for the current byte.
    pub(crate) fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.advance();
        }
    }

    /// Skip to the next newline (not consumed) or EOF.
    pub(crate) fn skip_line(&mut self) {
        match memchr::memchr(b'\n', self.rest()) {
            #[allow(clippy::cast_possible_truncation, reason = "sources are < 4GiB")]
            Some(offset) => self.advance_n(offset as u32),
            None => self.skip_to_end(),
        }
    }

    /// Skip past the next `*/`. Returns `false` (at EOF) if there is none.
    pub(crate) fn skip_block_comment_body(&mut self) -> bool {
        match memchr::memmem::find(self.rest(), b"*/") {
            Some(offset) => {
                #[allow(clippy::cast_possible_truncation, reason = "sources are < 4GiB")]
                self.advance_n(offset as u32 + 2);
                true
            }
            None => {
                self.skip_to_end();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_past_end_are_zero() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), 0);
        cursor.advance_n(2);
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn advance_char_handles_multibyte() {
        let mut cursor = Cursor::new("é1");
        cursor.advance_char();
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.current(), b'1');
    }

    #[test]
    fn skip_line_stops_at_newline() {
        let mut cursor = Cursor::new("// note\nx");
        cursor.skip_line();
        assert_eq!(cursor.current(), b'\n');
        assert_eq!(cursor.slice_from(0), "// note");
    }

    #[test]
    fn block_comment_end() {
        let mut cursor = Cursor::new(" a */b");
        assert!(cursor.skip_block_comment_body());
        assert_eq!(cursor.current(), b'b');
        let mut open = Cursor::new(" never closed");
        assert!(!open.skip_block_comment_body());
        assert!(open.is_eof());
    }
}
