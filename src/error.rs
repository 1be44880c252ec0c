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

//! Error conditions.
//!
//! There are exactly two kinds of condition: fatal ones, which have no
//! recovery, and a handful of otherwise-unspecified behaviors that this
//! implementation picks a documented, hardened policy for rather than
//! leaving undefined. [`Error::is_fatal`] tells the REPL whether to unwind
//! the whole process or just abandon the current top-level form.

use std::fmt::{self, Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

/// An evaluation or I/O condition raised by the core.
#[derive(Debug)]
pub enum Error {
    /// The symbol region or the heap region has no room left. Fatal: the
    /// spec gives implementations no recovery path for either region.
    ArenaExhausted,

    /// The character source reached end-of-stream mid-read. At the REPL's
    /// top level this is the ordinary, graceful shutdown signal rather than
    /// an error; it is an `Error` variant only so that `READ` (which may be
    /// called from deep inside a recursive evaluation) can propagate it
    /// uniformly.
    EndOfInput,

    /// A `)` was read where an expression was expected.
    UnexpectedCloseParen,

    /// `eval` of an atom not bound in the environment. The naive algorithm
    /// walks off the end of the environment list and dereferences NIL as a
    /// cons; this implementation's policy is to fail with this error
    /// instead of reading garbage.
    UnboundSymbol(String),

    /// `apply` of `NIL`. The naive algorithm loops forever here
    /// (`apply(eval(NIL, a), ...) == apply(NIL, ...)`); this implementation
    /// breaks the cycle by failing instead.
    ApplyNil,

    /// `apply` of a handle that is neither a `LAMBDA`-shaped cons, a
    /// resolvable user symbol, nor one of the seven primitives.
    InvalidApply,

    /// `CAR`/`CDR` applied to an atom. Undefined on atoms; hardened here
    /// to a reported error rather than reading whatever happens to be in
    /// that slot.
    CarCdrOfAtom,

    /// A primitive was called with the wrong number of arguments.
    Arity { primitive: &'static str, expected: &'static str },

    /// `pairlis` was asked to bind parameter and argument lists of
    /// different lengths.
    PairlisArityMismatch,

    /// `COND` fell through every clause without a true test.
    EmptyCond,
}

impl Error {
    /// Fatal conditions have no recovery: the REPL should report and exit.
    /// Everything else is reported and the offending top-level form is
    /// simply abandoned.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ArenaExhausted | Error::EndOfInput)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::ArenaExhausted =>
                write!(f, "arena exhausted"),
            Error::EndOfInput =>
                write!(f, "end of input"),
            Error::UnexpectedCloseParen =>
                write!(f, "unexpected )"),
            Error::UnboundSymbol(name) =>
                write!(f, "unbound symbol: {}", name),
            Error::ApplyNil =>
                write!(f, "cannot apply NIL"),
            Error::InvalidApply =>
                write!(f, "object is not applicable"),
            Error::CarCdrOfAtom =>
                write!(f, "CAR/CDR of an atom"),
            Error::Arity { primitive, expected } =>
                write!(f, "{} expects {} argument(s)", primitive, expected),
            Error::PairlisArityMismatch =>
                write!(f, "parameter and argument lists have different lengths"),
            Error::EmptyCond =>
                write!(f, "COND fell through with no true clause"),
        }
    }
}

impl std::error::Error for Error {}

/// Helper used by primitive dispatch to report a handle-carrying error
/// without every call site threading `Obj` debug-formatting by hand.
pub(crate) fn arity(primitive: &'static str, expected: &'static str) -> Error {
    Error::Arity { primitive, expected }
}
