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

//! Diagnostics reported at the REPL boundary.
//!
//! There is exactly one distinction worth drawing among conditions:
//! fatal (no recovery, the process must exit) versus everything else
//! (reported and the current top-level form abandoned). [`Severity`]
//! mirrors that split; there is no source position to report, since the
//! core's error contract carries none.

use colored::Colorize;

use crate::error::Error;

/// How a condition should be reported.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Severity {
    /// Reported; the offending top-level form is abandoned and the REPL
    /// continues.
    Error,

    /// Reported; the REPL has no recovery and exits.
    Fatal,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

pub fn severity_of(err: &Error) -> Severity {
    if err.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Error
    }
}

/// Prints a condition to stderr, colored by severity.
pub fn report(err: &Error) {
    let severity = severity_of(err);
    let line = format!("{}: {}", severity.label(), err);
    match severity {
        Severity::Fatal => eprintln!("{}", line.red().bold()),
        Severity::Error => eprintln!("{}", line.yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_conditions_are_labeled_fatal() {
        assert_eq!(severity_of(&Error::ArenaExhausted), Severity::Fatal);
        assert_eq!(severity_of(&Error::EndOfInput), Severity::Fatal);
    }

    #[test]
    fn reported_conditions_are_labeled_error() {
        assert_eq!(severity_of(&Error::EmptyCond), Severity::Error);
        assert_eq!(severity_of(&Error::ApplyNil), Severity::Error);
    }
}
