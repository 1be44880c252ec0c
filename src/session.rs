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

//! The REPL driver: reset the heap, read, eval, print, repeat, until the
//! character source is exhausted or a fatal condition is hit.

use crate::eval::Interpreter;
use crate::io::{CharSink, CharSource};
use crate::message;
use crate::obj::Obj;

/// Runs the read–eval–print loop to completion.
///
/// Returns `Ok(())` on graceful end-of-input, and `Err(())` if a fatal
/// condition (arena exhaustion) ended the session early; the caller uses
/// this to pick the process exit code.
pub fn run<S: CharSource, K: CharSink>(interp: &mut Interpreter<S, K>) -> Result<(), ()> {
    loop {
        interp.reset_heap();

        let expr = match interp.read_expr() {
            Ok(Some(expr)) => expr,
            Ok(None) => return Ok(()),
            Err(err) if err.is_fatal() => {
                message::report(&err);
                return Err(());
            }
            Err(err) => {
                message::report(&err);
                continue;
            }
        };

        match interp.eval(expr, Obj::NIL) {
            Ok(result) => interp.print_expr(result),
            Err(err) => {
                let fatal = err.is_fatal();
                message::report(&err);
                if fatal {
                    return Err(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{str_source, StringSink};
    use crate::mem::arena::DEFAULT_WORDS;

    fn run_text(text: &str) -> (String, Result<(), ()>) {
        let mut interp = Interpreter::new(DEFAULT_WORDS, str_source(text), StringSink::default());
        let outcome = run(&mut interp);
        (interp.sink().text.clone(), outcome)
    }

    #[test]
    fn evaluates_and_prints_each_top_level_form() {
        let (output, outcome) = run_text("(QUOTE A)\n(QUOTE B)\n");
        assert_eq!(output, "A\nB\n");
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn empty_input_ends_gracefully_with_no_output() {
        let (output, outcome) = run_text("");
        assert_eq!(output, "");
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn a_reported_error_does_not_stop_the_session() {
        let (output, outcome) = run_text("(COND)\n(QUOTE OK)\n");
        assert_eq!(output, "OK\n");
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn meta_circular_firstatom_example_runs_end_to_end() {
        let text = "((LAMBDA (FF X) (FF X)) \
                     (QUOTE (LAMBDA (X) (COND ((ATOM X) X) ((QUOTE T) (FF (CAR X)))))) \
                     (QUOTE ((A) B C)))\n";
        let (output, outcome) = run_text(text);
        assert_eq!(output, "A\n");
        assert_eq!(outcome, Ok(()));
    }
}
