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

//! The arena: one word array split at its midpoint into a symbol region
//! (grows upward) and a cons heap (grows downward).
//!
//! An object's handle is an offset from the midpoint. Addressing is
//! uniform: `slot(h) == words[mid + h]`, regardless of the sign of `h`.
//! Atoms (`h >= 0`) index forward into the symbol region; cons cells
//! (`h < 0`) index backward into the heap.

use std::mem::transmute;

use crate::error::{Error, Result};
use crate::obj::Obj;

/// Default arena size, in words. Large enough for the meta-circular
/// examples this interpreter is meant to host many times over; override
/// with `Arena::new` for smaller, exhaustion-exercising tests.
pub const DEFAULT_WORDS: usize = 64 * 1024;

/// The seven primitives, two special forms, and `NIL`/`T`, each bound to
/// the interned [`Obj`] handle it was given at startup. The exact
/// offsets are part of the contract; [`Arena::new`] asserts them in its
/// test suite below.
#[derive(Clone, Copy, Debug)]
pub struct Builtins {
    pub nil: Obj,
    pub t: Obj,
    pub quote: Obj,
    pub cond: Obj,
    pub read: Obj,
    pub print: Obj,
    pub atom: Obj,
    pub car: Obj,
    pub cdr: Obj,
    pub cons: Obj,
    pub eq: Obj,
}

impl Builtins {
    /// Any atom handle strictly greater than `EQ` is a user-defined name
    /// that `apply` must resolve through the environment.
    #[inline(always)]
    pub fn is_user_symbol(&self, obj: Obj) -> bool {
        obj.is_atom() && obj.raw() > self.eq.raw()
    }
}

/// The two-region word arena.
pub struct Arena {
    words: Vec<i32>,
    mid: usize,
    /// Next free offset in the symbol region (>= 0, grows upward).
    sym_end: i32,
    /// Current heap allocation boundary (<= 0, grows downward). The next
    /// pair allocated will occupy `[heap_cursor - 2, heap_cursor)`.
    heap_cursor: i32,
}

/// A mark on the heap cursor, taken at the entry of an `eval` call and
/// consumed by [`crate::gc::collect`] at its exit.
#[derive(Clone, Copy, Debug)]
pub struct Mark(pub(crate) i32);

impl Arena {
    /// Creates a new arena of the given size (in words) and interns the
    /// fixed prefix of built-in symbols.
    pub fn new(words: usize) -> (Arena, Builtins) {
        let mut arena = Arena {
            words: vec![0; words],
            mid: words / 2,
            sym_end: 0,
            heap_cursor: 0,
        };

        // Order matters: these exact offsets are part of the contract.
        let nil   = arena.seed_builtin("NIL");
        let t     = arena.seed_builtin("T");
        let quote = arena.seed_builtin("QUOTE");
        let cond  = arena.seed_builtin("COND");
        let read  = arena.seed_builtin("READ");
        let print = arena.seed_builtin("PRINT");
        let atom  = arena.seed_builtin("ATOM");
        let car   = arena.seed_builtin("CAR");
        let cdr   = arena.seed_builtin("CDR");
        let cons  = arena.seed_builtin("CONS");
        let eq    = arena.seed_builtin("EQ");

        let builtins = Builtins { nil, t, quote, cond, read, print, atom, car, cdr, cons, eq };
        (arena, builtins)
    }

    /// Seeds one built-in symbol at startup. Infallible in practice (the
    /// built-in prefix is a few dozen characters, dwarfed by any sane
    /// arena size), but still routed through the fallible path so a
    /// pathologically tiny arena fails loudly rather than panicking.
    fn seed_builtin(&mut self, name: &str) -> Obj {
        self.alloc_symbol(name).expect("arena too small for built-in symbols")
    }

    /// Resets the heap allocation cursor to the midpoint, discarding every
    /// cons cell allocated so far. The symbol region is untouched: user
    /// symbols live forever. Called once per REPL iteration.
    pub fn reset_heap(&mut self) {
        self.heap_cursor = 0;
    }

    /// Takes a mark for the per-eval collector.
    #[inline(always)]
    pub fn mark(&self) -> Mark {
        Mark(self.heap_cursor)
    }

    /// Reads the word at the given offset from the midpoint.
    #[inline(always)]
    pub fn slot(&self, offset: i32) -> i32 {
        self.words[(self.mid as i64 + offset as i64) as usize]
    }

    #[inline(always)]
    fn set_slot(&mut self, offset: i32, value: i32) {
        self.words[(self.mid as i64 + offset as i64) as usize] = value;
    }

    /// Returns the `car` of a cons handle. Undefined on atoms; callers in
    /// this crate must check `is_cons()` first (the evaluator and
    /// primitives do, turning a violation into [`Error::CarCdrOfAtom`]).
    #[inline(always)]
    pub fn car(&self, obj: Obj) -> Obj {
        Obj(self.slot(obj.raw()))
    }

    /// Returns the `cdr` of a cons handle. See [`Arena::car`].
    #[inline(always)]
    pub fn cdr(&self, obj: Obj) -> Obj {
        Obj(self.slot(obj.raw() + 1))
    }

    /// Allocates a new pair and returns its handle. Fails with
    /// [`Error::ArenaExhausted`] if the heap cursor would cross into the
    /// symbol region.
    pub fn allocate_pair(&mut self, car: Obj, cdr: Obj) -> Result<Obj> {
        let handle = self.heap_cursor - 2;
        if self.mid as i64 + handle as i64 < 0 {
            return Err(Error::ArenaExhausted);
        }
        self.heap_cursor = handle;
        self.set_slot(handle, car.raw());
        self.set_slot(handle + 1, cdr.raw());
        Ok(Obj(handle))
    }

    /// Interns a brand-new symbol's characters into the symbol region and
    /// returns its handle. Only called on an interner cache miss, see
    /// `mem::intern`.
    pub(crate) fn alloc_symbol(&mut self, token: &str) -> Result<Obj> {
        let start = self.sym_end;
        let mut offset = start;
        let len = self.words.len() as i64;
        for ch in token.chars() {
            if self.mid as i64 + offset as i64 >= len {
                return Err(Error::ArenaExhausted);
            }
            self.set_slot(offset, ch as i32);
            offset += 1;
        }
        // Null terminator.
        if self.mid as i64 + offset as i64 >= len {
            return Err(Error::ArenaExhausted);
        }
        self.set_slot(offset, 0);
        self.sym_end = offset + 1;
        Ok(Obj(start))
    }

    /// Borrows the characters of an already-interned symbol, for the
    /// printer and for the interner's own comparison loop.
    pub(crate) fn symbol_chars(&self, start: i32) -> SymbolChars<'_> {
        SymbolChars { arena: self, pos: start }
    }

    /// Length of the populated symbol region, for the interner's scan
    /// bound.
    pub(crate) fn sym_end(&self) -> i32 {
        self.sym_end
    }

    /// Wide-offset slot read, used by the collector while it still has
    /// transient handles that may momentarily exceed `i32`'s comfortable
    /// range during the copy phase of a very deep collection.
    pub(crate) fn slot_i64(&self, offset: i64) -> i32 {
        self.words[(self.mid as i64 + offset) as usize]
    }

    /// Wide-offset slot write. See [`Arena::slot_i64`].
    pub(crate) fn set_slot_i64(&mut self, offset: i64, value: i32) {
        self.words[(self.mid as i64 + offset) as usize] = value;
    }

    /// Directly sets the heap cursor. Used only by the collector, which
    /// computes the post-compaction cursor itself.
    pub(crate) fn set_cursor(&mut self, cursor: i32) {
        self.heap_cursor = cursor;
    }

    /// Reinterprets the word at `offset` as a `char`. Every word in the
    /// symbol region was written by [`Arena::alloc_symbol`] from a `char`
    /// cast to `i32`, so the inverse cast below is exact; this is the one
    /// place the arena's "uniform word array" representation is peeled
    /// back to text.
    fn char_at(&self, offset: i32) -> char {
        let word = self.slot(offset);
        // SAFETY: every symbol-region word was produced by `ch as i32` for
        // some `char` `ch` (or is the 0 terminator, handled by the caller
        // before this is reached).
        unsafe { transmute::<u32, char>(word as u32) }
    }
}

/// Iterator over the characters of one interned symbol, stopping before
/// the null terminator.
pub(crate) struct SymbolChars<'a> {
    arena: &'a Arena,
    pos: i32,
}

impl<'a> Iterator for SymbolChars<'a> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let word = self.arena.slot(self.pos);
        if word == 0 {
            None
        } else {
            let c = self.arena.char_at(self.pos);
            self.pos += 1;
            Some(c)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_offsets_match_the_contract() {
        let (_arena, b) = Arena::new(DEFAULT_WORDS);
        assert_eq!(b.nil.raw(),   0);
        assert_eq!(b.t.raw(),     4);
        assert_eq!(b.quote.raw(), 6);
        assert_eq!(b.cond.raw(),  12);
        assert_eq!(b.read.raw(),  17);
        assert_eq!(b.print.raw(), 22);
        assert_eq!(b.atom.raw(),  28);
        assert_eq!(b.car.raw(),   33);
        assert_eq!(b.cdr.raw(),   37);
        assert_eq!(b.cons.raw(),  41);
        assert_eq!(b.eq.raw(),    46);
    }

    #[test]
    fn is_user_symbol_is_strictly_greater_than_eq() {
        let (_arena, b) = Arena::new(DEFAULT_WORDS);
        assert!(!b.is_user_symbol(b.eq));
        assert!(!b.is_user_symbol(b.cons));
        assert!(!b.is_user_symbol(Obj(-2)));
        assert!(b.is_user_symbol(Obj(b.eq.raw() + 1)));
    }

    #[test]
    fn car_cdr_law() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let x = Obj(10);
        let y = Obj(20);
        let pair = arena.allocate_pair(x, y).unwrap();
        assert_eq!(arena.car(pair), x);
        assert_eq!(arena.cdr(pair), y);
    }

    #[test]
    fn allocation_walks_downward() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let first = arena.allocate_pair(Obj(1), Obj(2)).unwrap();
        let second = arena.allocate_pair(Obj(3), Obj(4)).unwrap();
        assert!(second.raw() < first.raw());
    }

    #[test]
    fn reset_heap_reclaims_everything() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        arena.allocate_pair(Obj(1), Obj(2)).unwrap();
        arena.reset_heap();
        assert_eq!(arena.mark().0, 0);
    }

    #[test]
    fn heap_exhaustion_is_fatal() {
        // mid = 60: comfortably fits the ~49-word built-in symbol prefix,
        // leaving only 30 pairs' worth of heap to exhaust quickly.
        let (mut arena, _b) = Arena::new(120);
        let mut last = Ok(Obj(0));
        for _ in 0..64 {
            last = arena.allocate_pair(Obj(1), Obj(2));
            if last.is_err() {
                break;
            }
        }
        assert!(matches!(last, Err(Error::ArenaExhausted)));
    }

    #[test]
    fn symbol_region_exhaustion_is_fatal() {
        let (mut arena, _b) = Arena::new(120);
        let mut last = Ok(Obj(0));
        for i in 0..64 {
            last = arena.alloc_symbol(&format!("SYM{}", i));
            if last.is_err() {
                break;
            }
        }
        assert!(matches!(last, Err(Error::ArenaExhausted)));
    }

    #[test]
    fn symbol_chars_reads_back_what_was_written() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let handle = arena.alloc_symbol("HELLO").unwrap();
        let s: String = arena.symbol_chars(handle.raw()).collect();
        assert_eq!(s, "HELLO");
    }
}
