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

//! The per-eval copy-and-compact collector.
//!
//! Every non-trivial `eval` call marks the heap cursor at entry (`A`), runs
//! its body, and calls [`collect`] on the way out. `collect` copies
//! everything reachable from the result that this call itself allocated
//! (handle `< A`) down to the top of the heap, then slides that freshly
//! copied region back down to abut `A`, reclaiming the gap where the
//! call's transient garbage used to be.

use crate::error::Result;
use crate::mem::arena::{Arena, Mark};
use crate::obj::Obj;

/// Copies everything reachable from `result` that this `eval` call
/// allocated, compacts it against the pre-call mark, and returns the
/// relocated result handle.
///
/// `pre_mark` is `A`: the heap cursor when this `eval` call began. Any
/// handle `>= A` belongs to an outer call (or to the permanent symbol
/// region, for atoms) and is left untouched; any handle `< A` was
/// allocated by this call or one it made and is subject to copying.
pub fn collect(arena: &mut Arena, pre_mark: Mark, result: Obj) -> Result<Obj> {
    let a = pre_mark.0;
    let b = arena.mark().0; // the post-mark: cursor right before collection starts

    if b == a {
        // Nothing was allocated during this call; nothing to do.
        return Ok(result);
    }

    let new_result = copy_live(arena, a, result)?;
    let c = arena.mark().0; // cursor after the copy phase, c <= b

    let shift = a - b; // >= 0: how far to slide the copied region down
    let len = (b - c) as i64; // words copied

    // Read every word of the copied region before writing any of it back.
    // A shared sub-structure copied more than once (e.g. `(CONS X X)`
    // where `X` is itself freshly consed) can make the live region larger
    // than the gap being reclaimed, so the source and destination ranges
    // may overlap in either direction; gathering first keeps the slide
    // correct regardless.
    let mut words: Vec<i32> = (0..len).map(|i| arena.slot_i64(c as i64 + i)).collect();
    for word in &mut words {
        if *word < 0 && *word >= c && *word < b {
            *word += shift;
        }
    }
    for (i, word) in words.into_iter().enumerate() {
        arena.set_slot_i64(c as i64 + i as i64 + shift as i64, word);
    }

    arena.set_cursor(a - len as i32);

    Ok(shift_if_copied(new_result, c, b, shift))
}

/// Recursively copies every cons cell reachable from `obj` whose handle is
/// `< a` (i.e. allocated by the call currently being collected). Atoms and
/// cells belonging to outer calls (`handle >= a`) are returned unchanged.
fn copy_live(arena: &mut Arena, a: i32, obj: Obj) -> Result<Obj> {
    if obj.is_atom() || obj.raw() >= a {
        return Ok(obj);
    }
    let car = arena.car(obj);
    let cdr = arena.cdr(obj);
    let new_car = copy_live(arena, a, car)?;
    let new_cdr = copy_live(arena, a, cdr)?;
    arena.allocate_pair(new_car, new_cdr)
}

/// If `obj` is a cons cell that was relocated by the slide (i.e. it falls
/// within the copied region `[c, b)`), returns its post-slide handle.
/// Otherwise returns it unchanged.
fn shift_if_copied(obj: Obj, c: i32, b: i32, shift: i32) -> Obj {
    if obj.is_cons() && obj.raw() >= c && obj.raw() < b {
        Obj(obj.raw() + shift)
    } else {
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::arena::DEFAULT_WORDS;

    #[test]
    fn gc_preserves_an_atom_result() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let mark = arena.mark();
        let result = collect(&mut arena, mark, b.t).unwrap();
        assert_eq!(result, b.t);
    }

    #[test]
    fn gc_compacts_and_preserves_shape() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let mark = arena.mark();

        // Build (T . T), plus a throwaway cell that should be reclaimed.
        let _garbage = arena.allocate_pair(b.nil, b.nil).unwrap();
        let live = arena.allocate_pair(b.t, b.t).unwrap();

        let cursor_before = arena.mark().0;
        let result = collect(&mut arena, mark, live).unwrap();
        let cursor_after = arena.mark().0;

        assert_eq!(arena.car(result), b.t);
        assert_eq!(arena.cdr(result), b.t);
        // Only the live pair (2 words) survived compaction.
        assert_eq!(mark.0 - cursor_after, 2);
        assert!(cursor_after > cursor_before);
    }

    #[test]
    fn gc_leaves_outer_data_untouched() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);

        // Outer frame allocates an environment-like cell before the call
        // under test begins.
        let outer = arena.allocate_pair(b.t, b.nil).unwrap();
        let outer_car_before = arena.car(outer);

        let mark = arena.mark();
        let fresh = arena.allocate_pair(outer, b.nil).unwrap();
        let result = collect(&mut arena, mark, fresh).unwrap();

        // The outer cell's contents are unchanged, and the inner result
        // still points at it (not copied, since its handle >= mark).
        assert_eq!(arena.car(outer), outer_car_before);
        assert_eq!(arena.car(result), outer);
    }

    #[test]
    fn gc_relocates_nested_structure() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let mark = arena.mark();

        let inner = arena.allocate_pair(b.t, b.nil).unwrap();
        let _garbage1 = arena.allocate_pair(b.nil, b.nil).unwrap();
        let outer = arena.allocate_pair(inner, b.nil).unwrap();
        let _garbage2 = arena.allocate_pair(b.nil, b.nil).unwrap();

        let result = collect(&mut arena, mark, outer).unwrap();

        let result_car = arena.car(result);
        assert_eq!(arena.car(result_car), b.t);
        assert_eq!(arena.cdr(result_car), b.nil);
        assert_eq!(arena.cdr(result), b.nil);
    }
}
