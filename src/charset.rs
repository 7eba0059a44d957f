// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Sets of input characters for character-class edges.

use std::fmt::{self, Display};
use std::iter::FromIterator;

use bitvec::array::BitArray;
use bitvec::order::Lsb0;
use itertools::Itertools;

/// The bytes that end a line: `\n` and `\r`.
///
/// These are excluded from `.` and from negated classes, and are what a
/// trailing `$` matches.
pub const LINE_TERMINATORS: [u8; 2] = [b'\n', b'\r'];

/// A (possibly empty) subset of the 256 input characters.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CharSet {
    bits: BitArray<[u8; 32], Lsb0>,
}

impl CharSet {
    /// Create an empty `CharSet`.
    pub fn new() -> CharSet {
        CharSet {
            bits: BitArray::new([0_u8; 32]),
        }
    }

    /// Add the character `c` to the set.
    pub fn insert(&mut self, c: u8) {
        self.bits.set(c as usize, true);
    }

    /// Add the closed range of characters from `start` to `end`.
    ///
    /// If `end` is less than `start` then they will be reversed.
    pub fn insert_range(&mut self, start: u8, end: u8) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        self.bits[start as usize..=end as usize].fill(true);
    }

    /// Check if the set contains the character `c`.
    pub fn contains(&self, c: u8) -> bool {
        self.bits[c as usize]
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// The number of characters in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Create the set of every character not in this set.
    pub fn complement(&self) -> CharSet {
        CharSet {
            bits: !self.bits.clone(),
        }
    }

    /// Iterate over the characters in the set in increasing order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = u8> + 'a {
        self.bits.iter_ones().map(|c| c as u8)
    }

    /// Iterate over the closed ranges that make up the set.
    ///
    /// The ranges are non-overlapping, in increasing order, and adjacent
    /// ranges are combined.
    pub fn ranges<'a>(&'a self) -> impl Iterator<Item = (u8, u8)> + 'a {
        self.iter().map(|c| (c, c)).coalesce(|prev, next| {
            if prev.1 as usize + 1 == next.0 as usize {
                Ok((prev.0, next.1))
            } else {
                Err((prev, next))
            }
        })
    }
}

impl Default for CharSet {
    fn default() -> CharSet {
        CharSet::new()
    }
}

impl FromIterator<u8> for CharSet {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = u8>,
    {
        let mut set = CharSet::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (start, end) in self.ranges() {
            match end - start {
                0 => write!(f, "{}", Printable(start))?,
                1 => write!(f, "{}{}", Printable(start), Printable(end))?,
                _ => write!(f, "{}-{}", Printable(start), Printable(end))?,
            }
        }
        write!(f, "]")
    }
}

/// Displays a single input character the way it would be written in a
/// pattern.
#[derive(Clone, Copy, Debug)]
pub struct Printable(pub u8);

impl Display for Printable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            b'\n' => write!(f, "\\n"),
            b'\t' => write!(f, "\\t"),
            b'\r' => write!(f, "\\r"),
            b' ' => write!(f, "\\s"),
            b'\\' | b']' | b'[' | b'-' | b'^' => write!(f, "\\{}", self.0 as char),
            c if c > b' ' && c < 0x7f => write!(f, "{}", c as char),
            c => write!(f, "\\x{:02x}", c),
        }
    }
}
