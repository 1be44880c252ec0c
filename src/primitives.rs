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

//! The five pure primitives: `CAR`, `CDR`, `CONS`, `ATOM`, `EQ`. `READ`
//! and `PRINT` need the interpreter's reader and sink, so they are
//! dispatched directly in `eval.rs` instead of here.

use crate::error::{self, Error, Result};
use crate::mem::arena::{Arena, Builtins};
use crate::obj::Obj;

/// Pulls the first argument out of an already-`evlis`'d argument list,
/// failing with an arity error if the list is empty.
fn first(arena: &Arena, args: Obj, name: &'static str) -> Result<Obj> {
    if args.is_nil() {
        return Err(error::arity(name, "1"));
    }
    Ok(arena.car(args))
}

/// Pulls the second argument, failing if fewer than two were given.
fn second(arena: &Arena, args: Obj, name: &'static str) -> Result<Obj> {
    let rest = arena.cdr(args);
    if rest.is_nil() {
        return Err(error::arity(name, "2"));
    }
    Ok(arena.car(rest))
}

pub fn car(arena: &Arena, args: Obj) -> Result<Obj> {
    let x = first(arena, args, "CAR")?;
    if x.is_atom() {
        return Err(Error::CarCdrOfAtom);
    }
    Ok(arena.car(x))
}

pub fn cdr(arena: &Arena, args: Obj) -> Result<Obj> {
    let x = first(arena, args, "CDR")?;
    if x.is_atom() {
        return Err(Error::CarCdrOfAtom);
    }
    Ok(arena.cdr(x))
}

pub fn cons(arena: &mut Arena, args: Obj) -> Result<Obj> {
    let x = first(arena, args, "CONS")?;
    let y = second(arena, args, "CONS")?;
    arena.allocate_pair(x, y)
}

pub fn atom(arena: &Arena, args: Obj, b: &Builtins) -> Result<Obj> {
    let x = first(arena, args, "ATOM")?;
    Ok(if x.is_atom() { b.t } else { b.nil })
}

pub fn eq(arena: &Arena, args: Obj, b: &Builtins) -> Result<Obj> {
    let x = first(arena, args, "EQ")?;
    let y = second(arena, args, "EQ")?;
    Ok(if x == y { b.t } else { b.nil })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::arena::{Arena, DEFAULT_WORDS};

    #[test]
    fn car_and_cdr_of_a_cons() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let pair = arena.allocate_pair(Obj(4), Obj(6)).unwrap();
        let args = arena.allocate_pair(pair, Obj::NIL).unwrap();
        assert_eq!(car(&arena, args).unwrap(), Obj(4));
        assert_eq!(cdr(&arena, args).unwrap(), Obj(6));
    }

    #[test]
    fn car_of_an_atom_is_an_error() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let args = arena.allocate_pair(b.t, Obj::NIL).unwrap();
        assert!(matches!(car(&arena, args), Err(Error::CarCdrOfAtom)));
    }

    #[test]
    fn cons_allocates_a_fresh_pair() {
        let (mut arena, _b) = Arena::new(DEFAULT_WORDS);
        let tail = arena.allocate_pair(Obj(6), Obj::NIL).unwrap();
        let args = arena.allocate_pair(Obj(4), tail).unwrap();
        let pair = cons(&mut arena, args).unwrap();
        assert_eq!(arena.car(pair), Obj(4));
        assert_eq!(arena.cdr(pair), Obj(6));
    }

    #[test]
    fn atom_distinguishes_atoms_from_conses() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let atom_args = arena.allocate_pair(b.t, Obj::NIL).unwrap();
        assert_eq!(atom(&arena, atom_args, &b).unwrap(), b.t);

        let cons_val = arena.allocate_pair(b.t, b.nil).unwrap();
        let cons_args = arena.allocate_pair(cons_val, Obj::NIL).unwrap();
        assert_eq!(atom(&arena, cons_args, &b).unwrap(), b.nil);
    }

    #[test]
    fn eq_compares_handles() {
        let (mut arena, b) = Arena::new(DEFAULT_WORDS);
        let same_tail = arena.allocate_pair(b.t, Obj::NIL).unwrap();
        let same = arena.allocate_pair(b.t, same_tail).unwrap();
        assert_eq!(eq(&arena, same, &b).unwrap(), b.t);

        let different_tail = arena.allocate_pair(b.nil, Obj::NIL).unwrap();
        let different = arena.allocate_pair(b.t, different_tail).unwrap();
        assert_eq!(eq(&arena, different, &b).unwrap(), b.nil);
    }

    #[test]
    fn missing_argument_is_an_arity_error() {
        let (arena, _b) = Arena::new(DEFAULT_WORDS);
        assert!(matches!(car(&arena, Obj::NIL), Err(Error::Arity { .. })));
    }
}
