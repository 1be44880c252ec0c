// This file is part of lisp60, a minimal LISP interpreter.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// lisp60 is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// lisp60 is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with lisp60.  If not, see <http://www.gnu.org/licenses/>.

//! The external character source and sink. These are deliberately out of
//! the core's scope: line editing, history, and echo behavior all live on
//! the other side of this seam.

use std::io::{Read, Write};

/// A one-character-lookahead input stream. `get_char` always returns the
/// *previous* lookahead and buffers the freshly read character behind it,
/// and `peek` inspects that buffered character without consuming it: the
/// pairing the reader's tokenizer needs to decide, without over-reading,
/// whether the character after the one it just consumed is itself a
/// delimiter.
pub trait CharSource {
    /// Consumes and returns the next character, or `None` at end-of-stream.
    fn get_char(&mut self) -> Option<char>;

    /// Returns the character that the *next* call to `get_char` will
    /// return, without consuming it.
    fn peek(&self) -> Option<char>;
}

/// A character sink. `put_char` writes one character and must support
/// `∙` (U+2219), outside ASCII, for the printer's dotted-pair separator.
pub trait CharSink {
    fn put_char(&mut self, c: char);
}

/// Adapts any `Iterator<Item = char>` into a [`CharSource`] with the
/// required one-character lookahead.
pub struct LookaheadSource<I: Iterator<Item = char>> {
    lookahead: Option<char>,
    inner: I,
}

impl<I: Iterator<Item = char>> LookaheadSource<I> {
    pub fn new(mut inner: I) -> Self {
        let lookahead = inner.next();
        Self { lookahead, inner }
    }
}

impl<I: Iterator<Item = char>> CharSource for LookaheadSource<I> {
    fn get_char(&mut self) -> Option<char> {
        let current = self.lookahead;
        self.lookahead = self.inner.next();
        current
    }

    fn peek(&self) -> Option<char> {
        self.lookahead
    }
}

/// Reads from an in-memory string. Used by tests and by `READ` when it is
/// handed a pre-buffered line instead of going straight to a live stream.
pub fn str_source(s: &str) -> LookaheadSource<std::vec::IntoIter<char>> {
    LookaheadSource::new(s.chars().collect::<Vec<_>>().into_iter())
}

/// Reads from process stdin, one character at a time.
pub struct StdinSource {
    inner: LookaheadSource<CharsFromReader<std::io::Stdin>>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self { inner: LookaheadSource::new(CharsFromReader::new(std::io::stdin())) }
    }
}

impl CharSource for StdinSource {
    fn get_char(&mut self) -> Option<char> {
        self.inner.get_char()
    }

    fn peek(&self) -> Option<char> {
        self.inner.peek()
    }
}

/// Decodes a byte stream as UTF-8, one `char` at a time, tolerating
/// end-of-stream mid-way with a clean `None` rather than a panic.
pub struct CharsFromReader<R: Read> {
    reader: R,
}

impl<R: Read> CharsFromReader<R> {
    fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> Iterator for CharsFromReader<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let mut buf = [0u8; 4];
        let mut len = 0;
        loop {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => return None, // end-of-stream, even mid-codepoint
                Ok(_) => {
                    buf[len] = byte[0];
                    len += 1;
                    if let Ok(s) = std::str::from_utf8(&buf[..len]) {
                        return s.chars().next();
                    }
                    if len == 4 {
                        return None; // malformed UTF-8; treat as end-of-stream
                    }
                }
                Err(_) => return None,
            }
        }
    }
}

/// Writes to process stdout, one character at a time.
pub struct StdoutSink;

impl CharSink for StdoutSink {
    fn put_char(&mut self, c: char) {
        let mut stdout = std::io::stdout();
        let mut buf = [0u8; 4];
        let _ = stdout.write_all(c.encode_utf8(&mut buf).as_bytes());
    }
}

/// Collects written characters into an in-memory string. Used by tests.
#[derive(Default)]
pub struct StringSink {
    pub text: String,
}

impl CharSink for StringSink {
    fn put_char(&mut self, c: char) {
        self.text.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_source_delays_by_one_character() {
        let mut src = str_source("AB");
        assert_eq!(src.peek(), Some('A'));
        assert_eq!(src.get_char(), Some('A'));
        assert_eq!(src.peek(), Some('B'));
        assert_eq!(src.get_char(), Some('B'));
        assert_eq!(src.peek(), None);
        assert_eq!(src.get_char(), None);
    }

    #[test]
    fn empty_source_is_immediately_at_eof() {
        let mut src = str_source("");
        assert_eq!(src.peek(), None);
        assert_eq!(src.get_char(), None);
    }

    #[test]
    fn string_sink_collects_characters() {
        let mut sink = StringSink::default();
        sink.put_char('A');
        sink.put_char('∙');
        sink.put_char('B');
        assert_eq!(sink.text, "A∙B");
    }
}
