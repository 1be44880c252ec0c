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

//! The symbol interner.
//!
//! This deliberately uses a linear scan over the symbol region rather
//! than a hash map: acceptable at the intended scale (hundreds of
//! symbols), and a `HashMap<String, Obj>` front end would make lookups
//! O(1) but would stop this module from being a faithful account of the
//! scan-based algorithm it is meant to implement.

use crate::error::Result;
use crate::mem::arena::Arena;
use crate::obj::Obj;

/// Interns `token`, returning the [`Obj`] handle of the (possibly
/// newly-created) symbol. Byte-equal tokens always yield equal handles;
/// byte-distinct tokens always yield different handles.
pub fn intern(arena: &mut Arena, token: &str) -> Result<Obj> {
    let mut offset = 0;
    let end = arena.sym_end();

    while offset < end {
        let candidate_start = offset;
        let mut matches = true;
        let mut chars = token.chars();
        let mut candidate_len = 0;

        for candidate_ch in arena.symbol_chars(candidate_start) {
            candidate_len += 1;
            match chars.next() {
                Some(token_ch) if token_ch == candidate_ch => continue,
                _ => { matches = false; }
            }
        }
        // The candidate and the token match only if the token had no
        // leftover characters either.
        if matches && chars.next().is_none() {
            return Ok(Obj(candidate_start));
        }

        // Advance past this candidate's terminator (its length plus the
        // null word) and keep scanning.
        offset = candidate_start + candidate_len + 1;
    }

    arena.alloc_symbol(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::arena::DEFAULT_WORDS;

    #[test]
    fn same_text_yields_the_same_handle() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let a = intern(&mut arena, "FOO").unwrap();
        let b = intern(&mut arena, "FOO").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_yields_different_handles() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let a = intern(&mut arena, "FOO").unwrap();
        let b = intern(&mut arena, "BAR").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn prefix_does_not_falsely_match() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let short = intern(&mut arena, "CAT").unwrap();
        let long = intern(&mut arena, "CATALOG").unwrap();
        assert_ne!(short, long);
    }

    #[test]
    fn builtins_are_already_interned() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        assert_eq!(intern(&mut arena, "NIL").unwrap(), b.nil);
        assert_eq!(intern(&mut arena, "CONS").unwrap(), b.cons);
        assert_eq!(intern(&mut arena, "EQ").unwrap(), b.eq);
    }

    #[test]
    fn interning_a_new_symbol_does_not_disturb_old_handles() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let first = intern(&mut arena, "ALPHA").unwrap();
        intern(&mut arena, "BETA").unwrap();
        assert_eq!(intern(&mut arena, "ALPHA").unwrap(), first);
        assert_eq!(intern(&mut arena, "NIL").unwrap(), b.nil);
    }
}
