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

pub mod reader;
