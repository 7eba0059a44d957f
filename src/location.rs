// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::fmt;

/// A location within the rules section of a specification.
///
/// The line is the number of the first physical line of a logical rule line
/// (a rule continued onto following lines keeps the number of its first
/// line). The column is a byte offset into the logical line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    /// Create a new `Location` for a given line and column.
    pub fn new(line: usize, column: usize) -> Location {
        Location { line, column }
    }

    /// Gets the line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Gets the column (a byte offset into the logical line).
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
