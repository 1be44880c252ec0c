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

#![allow(dead_code)]

mod error;
mod eval;
mod gc;
mod io;
mod lang;
mod mem;
mod message;
mod obj;
mod primitives;
mod printer;
mod session;

use std::env::args;
use std::fs;
use std::process::ExitCode;

use io::{str_source, StdinSource, StdoutSink};
use mem::arena::DEFAULT_WORDS;

/// The program's name, used only in usage text.
pub const PROGRAM_NAME: &str = "lisp60";

fn main() -> ExitCode {
    let mut arena_words = DEFAULT_WORDS;
    let mut path: Option<String> = None;

    let mut it = args();
    it.next(); // skip argv[0]

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--arena-words" => match it.next().and_then(|v| v.parse().ok()) {
                Some(words) => arena_words = words,
                None => {
                    eprintln!("{}: --arena-words requires a numeric argument", PROGRAM_NAME);
                    return ExitCode::FAILURE;
                }
            },
            "-" => path = Some("-".to_string()),
            other => path = Some(other.to_string()),
        }
    }

    match path.as_deref() {
        None | Some("-") => {
            let mut interp = eval::Interpreter::new(arena_words, StdinSource::new(), StdoutSink);
            run(&mut interp)
        }
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => {
                let mut interp = eval::Interpreter::new(arena_words, str_source(&text), StdoutSink);
                run(&mut interp)
            }
            Err(e) => {
                eprintln!("{}: {}: {}", PROGRAM_NAME, path, e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run<S: io::CharSource, K: io::CharSink>(interp: &mut eval::Interpreter<S, K>) -> ExitCode {
    match session::run(interp) {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
