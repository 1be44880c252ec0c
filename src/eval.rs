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

//! The meta-circular evaluator, and the [`Interpreter`] that owns the
//! arena, reader and sink around it: an explicit owning value in place of
//! a process-wide global.

use crate::error::{Error, Result};
use crate::gc;
use crate::io::{CharSink, CharSource};
use crate::lang::reader::Reader;
use crate::mem::arena::{Arena, Builtins};
use crate::obj::Obj;
use crate::primitives;
use crate::printer;

pub struct Interpreter<S: CharSource, K: CharSink> {
    pub arena: Arena,
    pub builtins: Builtins,
    reader: Reader<S>,
    sink: K,
}

impl<S: CharSource, K: CharSink> Interpreter<S, K> {
    pub fn new(arena_words: usize, source: S, sink: K) -> Self {
        let (arena, builtins) = Arena::new(arena_words);
        Interpreter { arena, builtins, reader: Reader::new(source), sink }
    }

    /// Resets the heap cursor. Called once per REPL iteration.
    pub fn reset_heap(&mut self) {
        self.arena.reset_heap();
    }

    /// Borrows the sink directly. Used by the REPL driver to report
    /// errors through the same channel as ordinary output, and by tests
    /// to observe what was printed.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Reads the next top-level expression, or `None` at end-of-input.
    pub fn read_expr(&mut self) -> Result<Option<Obj>> {
        self.reader.read(&mut self.arena)
    }

    /// Prints an expression followed by a newline, the REPL's output step.
    pub fn print_expr(&mut self, obj: Obj) {
        printer::print(&self.arena, obj, &mut self.sink);
        self.sink.put_char('\n');
    }

    /// `eval(e, a)`. `COND` and function application are wrapped in the
    /// per-eval collection protocol; `eval` of an atom and `QUOTE`
    /// allocate nothing and so need no collection.
    pub fn eval(&mut self, e: Obj, a: Obj) -> Result<Obj> {
        if e.is_atom() {
            return self.assoc(e, a);
        }

        let head = self.arena.car(e);

        if head == self.builtins.quote {
            return Ok(self.arena.car(self.arena.cdr(e)));
        }

        if head == self.builtins.cond {
            let mark = self.arena.mark();
            let result = self.evcon(self.arena.cdr(e), a)?;
            return gc::collect(&mut self.arena, mark, result);
        }

        let mark = self.arena.mark();
        let args = self.evlis(self.arena.cdr(e), a)?;
        let result = self.apply(head, args, a)?;
        gc::collect(&mut self.arena, mark, result)
    }

    /// `apply(f, x, a)`.
    pub fn apply(&mut self, f: Obj, x: Obj, a: Obj) -> Result<Obj> {
        if f.is_cons() {
            // (LAMBDA params body); the head symbol itself is never
            // inspected, any three-element list shaped this way works.
            let params = self.arena.car(self.arena.cdr(f));
            let body = self.arena.car(self.arena.cdr(self.arena.cdr(f)));
            let new_env = self.pairlis(params, x, a)?;
            return self.eval(body, new_env);
        }

        if f.is_nil() {
            return Err(Error::ApplyNil);
        }

        if self.builtins.is_user_symbol(f) {
            let resolved = self.eval(f, a)?;
            return self.apply(resolved, x, a);
        }

        self.apply_primitive(f, x)
    }

    fn apply_primitive(&mut self, f: Obj, x: Obj) -> Result<Obj> {
        let b = self.builtins;
        if f == b.car {
            primitives::car(&self.arena, x)
        } else if f == b.cdr {
            primitives::cdr(&self.arena, x)
        } else if f == b.cons {
            primitives::cons(&mut self.arena, x)
        } else if f == b.atom {
            primitives::atom(&self.arena, x, &b)
        } else if f == b.eq {
            primitives::eq(&self.arena, x, &b)
        } else if f == b.read {
            self.primitive_read()
        } else if f == b.print {
            self.primitive_print(x)
        } else {
            Err(Error::InvalidApply)
        }
    }

    fn primitive_read(&mut self) -> Result<Obj> {
        self.reader.read(&mut self.arena)?.ok_or(Error::EndOfInput)
    }

    fn primitive_print(&mut self, x: Obj) -> Result<Obj> {
        if x.is_nil() {
            self.sink.put_char('\n');
        } else {
            let value = self.arena.car(x);
            printer::print(&self.arena, value, &mut self.sink);
        }
        Ok(Obj::NIL)
    }

    /// `assoc(k, a)`: linear search through the environment. Unbound
    /// lookups fail outright rather than walking off the end of `a` and
    /// reading `NIL` as a cons.
    fn assoc(&self, k: Obj, a: Obj) -> Result<Obj> {
        let mut env = a;
        while env.is_cons() {
            let pair = self.arena.car(env);
            if self.arena.car(pair) == k {
                return Ok(self.arena.cdr(pair));
            }
            env = self.arena.cdr(env);
        }
        Err(Error::UnboundSymbol(self.symbol_name(k)))
    }

    /// `evlis(l, a)`: maps `eval` over a list, left to right. Required so
    /// that `READ`/`PRINT` side effects observe argument order.
    fn evlis(&mut self, list: Obj, a: Obj) -> Result<Obj> {
        if list.is_nil() {
            return Ok(Obj::NIL);
        }
        let item = self.eval(self.arena.car(list), a)?;
        let rest = self.evlis(self.arena.cdr(list), a)?;
        self.arena.allocate_pair(item, rest)
    }

    /// `pairlis(keys, values, a)`: prepends the new bindings to `a`.
    fn pairlis(&mut self, keys: Obj, values: Obj, a: Obj) -> Result<Obj> {
        if keys.is_nil() {
            if !values.is_nil() {
                return Err(Error::PairlisArityMismatch);
            }
            return Ok(a);
        }
        if values.is_nil() {
            return Err(Error::PairlisArityMismatch);
        }
        let key = self.arena.car(keys);
        let value = self.arena.car(values);
        let rest_env = self.pairlis(self.arena.cdr(keys), self.arena.cdr(values), a)?;
        let binding = self.arena.allocate_pair(key, value)?;
        self.arena.allocate_pair(binding, rest_env)
    }

    /// `evcon(cl, a)`: evaluates clause tests in order, returning the
    /// body of the first clause whose test is non-`NIL`.
    fn evcon(&mut self, clauses: Obj, a: Obj) -> Result<Obj> {
        if clauses.is_nil() {
            return Err(Error::EmptyCond);
        }
        let clause = self.arena.car(clauses);
        let test = self.arena.car(clause);
        let test_result = self.eval(test, a)?;
        if !test_result.is_nil() {
            let body = self.arena.car(self.arena.cdr(clause));
            self.eval(body, a)
        } else {
            self.evcon(self.arena.cdr(clauses), a)
        }
    }

    fn symbol_name(&self, atom: Obj) -> String {
        self.arena.symbol_chars(atom.raw()).collect()
    }
}
