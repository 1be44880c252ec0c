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

//! Tokenizer and recursive-descent parser.
//!
//! The tokenizer keeps its own scratch buffer rather than reusing arena
//! storage the way a more literal translation might: aliasing the
//! reader's scratch space onto the arena is implementation-specific
//! noise worth dropping in a clean rewrite.

use crate::error::{Error, Result};
use crate::io::CharSource;
use crate::mem::arena::Arena;
use crate::mem::intern;
use crate::obj::Obj;

/// A character is a delimiter if it is whitespace-or-lower, or one of the
/// two parentheses.
#[inline]
fn is_delimiter(c: char) -> bool {
    c <= ' ' || c == '(' || c == ')'
}

/// What terminated the most recent token scan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Delim {
    LParen,
    RParen,
    /// A non-empty run of non-delimiter characters, staged in the
    /// reader's scratch buffer.
    Token,
    Eof,
}

/// Tokenizer + recursive-descent parser over a [`CharSource`].
pub struct Reader<S: CharSource> {
    source: S,
    cur: Option<char>,
    token: String,
}

impl<S: CharSource> Reader<S> {
    pub fn new(mut source: S) -> Self {
        let cur = source.get_char();
        Self { source, cur, token: String::new() }
    }

    #[inline]
    fn advance(&mut self) {
        self.cur = self.source.get_char();
    }

    /// Skips whitespace, then either consumes a single paren or
    /// accumulates a maximal run of non-delimiter characters into
    /// `self.token`.
    fn next_token(&mut self) -> Delim {
        while matches!(self.cur, Some(c) if c <= ' ') {
            self.advance();
        }
        match self.cur {
            None => Delim::Eof,
            Some('(') => { self.advance(); Delim::LParen }
            Some(')') => { self.advance(); Delim::RParen }
            Some(_) => {
                self.token.clear();
                while let Some(c) = self.cur {
                    if is_delimiter(c) {
                        break;
                    }
                    self.token.push(c);
                    self.advance();
                }
                Delim::Token
            }
        }
    }

    /// Reads one object given the delimiter that introduces it: `(`
    /// dispatches to [`Self::read_list`]; a staged token is interned as
    /// an atom. A bare `)` or end-of-input here is a syntax error,
    /// hardened to a reported error rather than read as data.
    fn read_object(&mut self, delim: Delim, arena: &mut Arena) -> Result<Obj> {
        match delim {
            Delim::LParen => self.read_list(arena),
            Delim::Token => intern::intern(arena, &self.token),
            Delim::RParen => Err(Error::UnexpectedCloseParen),
            Delim::Eof => Err(Error::EndOfInput),
        }
    }

    /// Reads the contents of a list already past its opening `(`:
    /// `read_list() = NIL` if the next thing is `)`, otherwise
    /// `cons(read_object(delim), read_list())`.
    fn read_list(&mut self, arena: &mut Arena) -> Result<Obj> {
        let delim = self.next_token();
        match delim {
            Delim::RParen => Ok(Obj::NIL),
            Delim::Eof => Err(Error::EndOfInput),
            _ => {
                let head = self.read_object(delim, arena)?;
                let tail = self.read_list(arena)?;
                arena.allocate_pair(head, tail)
            }
        }
    }

    /// Reads the next top-level expression, or `None` at end-of-input
    /// (the REPL's graceful-shutdown signal).
    pub fn read(&mut self, arena: &mut Arena) -> Result<Option<Obj>> {
        let delim = self.next_token();
        match delim {
            Delim::Eof => Ok(None),
            _ => Ok(Some(self.read_object(delim, arena)?)),
        }
    }
}
