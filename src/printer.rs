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

//! The printer: renders an [`Obj`] back out through a [`CharSink`].
//!
//! A cons cell whose `cdr` is itself a cons cell or `NIL` prints as a
//! list; anything else falls back to dotted-pair notation with the `∙`
//! (U+2219) separator.

use crate::io::{CharSink, StringSink};
use crate::mem::arena::Arena;
use crate::obj::Obj;

pub fn print(arena: &Arena, obj: Obj, sink: &mut dyn CharSink) {
    if obj.is_atom() {
        print_symbol(arena, obj, sink);
        return;
    }
    sink.put_char('(');
    print_list_tail(arena, obj, sink);
    sink.put_char(')');
}

fn print_symbol(arena: &Arena, atom: Obj, sink: &mut dyn CharSink) {
    for c in arena.symbol_chars(atom.raw()) {
        sink.put_char(c);
    }
}

/// Prints the elements of a list, assuming the opening `(` has already
/// been written. `cell` is itself a cons cell (never `NIL`; callers only
/// reach here from inside an open list).
fn print_list_tail(arena: &Arena, cell: Obj, sink: &mut dyn CharSink) {
    let car = arena.car(cell);
    print(arena, car, sink);

    let cdr = arena.cdr(cell);
    if cdr.is_nil() {
        // end of a proper list
    } else if cdr.is_cons() {
        sink.put_char(' ');
        print_list_tail(arena, cdr, sink);
    } else {
        sink.put_char(' ');
        sink.put_char('∙');
        sink.put_char(' ');
        print_symbol(arena, cdr, sink);
    }
}

/// Convenience for tests and diagnostics: prints into a fresh `String`.
pub fn print_to_string(arena: &Arena, obj: Obj) -> String {
    let mut sink = StringSink::default();
    print(arena, obj, &mut sink);
    sink.text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::arena::{Arena, DEFAULT_WORDS};

    #[test]
    fn prints_a_bare_atom() {
        let (arena, b) = Arena::new(DEFAULT_WORDS);
        assert_eq!(print_to_string(&arena, b.nil), "NIL");
        assert_eq!(print_to_string(&arena, b.t), "T");
    }

    #[test]
    fn prints_a_proper_list() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let inner = arena.allocate_pair(b.t, b.nil).unwrap();
        let outer = arena.allocate_pair(b.quote, inner).unwrap();
        assert_eq!(print_to_string(&arena, outer), "(QUOTE (T))");
    }

    #[test]
    fn prints_a_dotted_pair() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let pair = arena.allocate_pair(b.t, b.quote).unwrap();
        assert_eq!(print_to_string(&arena, pair), "(T ∙ QUOTE)");
    }

    #[test]
    fn empty_list_prints_as_nil_not_parens() {
        let (arena, b) = Arena::new(DEFAULT_WORDS);
        assert_eq!(print_to_string(&arena, b.nil), "NIL");
    }
}
