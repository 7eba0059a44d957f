// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Storage for the accept actions attached to accepting states.

use std::result;

use error::ErrorKind;

/// The action text that makes a rule share the preceding rule's action.
pub const SHARED_ACTION: &str = "|";

/// A reference to an accept action stored in an `AcceptPool`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AcceptId(usize);

impl AcceptId {
    /// The position of the action among those stored in its pool.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An accept action and the number of the line on which its rule started.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Accept<'a> {
    line: usize,
    text: &'a str,
}

impl<'a> Accept<'a> {
    /// Gets the line number of the rule the action belongs to.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Gets the action text.
    pub fn text(&self) -> &'a str {
        self.text
    }
}

#[derive(Debug)]
struct Record {
    line: usize,
    start: usize,
    end: usize,
}

/// An append-only pool of accept-action text.
///
/// The text of every action is copied into one buffer which is reserved
/// once at the pool's capacity. Accepting states refer to an action by
/// `AcceptId` so that rules sharing an action share a single copy of it.
#[derive(Debug)]
pub struct AcceptPool {
    text: String,
    records: Vec<Record>,
    capacity: usize,
}

impl AcceptPool {
    /// Create a new `AcceptPool` that can hold `capacity` bytes of text.
    pub fn new(capacity: usize) -> AcceptPool {
        AcceptPool {
            text: String::with_capacity(capacity),
            records: Vec::new(),
            capacity,
        }
    }

    /// Copy `text`, from the rule starting on `line`, into the pool.
    ///
    /// If `text` is exactly `|` nothing is copied and the id of the most
    /// recently stored action is returned instead.
    pub fn intern(&mut self, line: usize, text: &str) -> result::Result<AcceptId, ErrorKind> {
        if text == SHARED_ACTION {
            return self.records
                .len()
                .checked_sub(1)
                .map(AcceptId)
                .ok_or(ErrorKind::NoPreviousAction);
        }

        if self.text.len() + text.len() > self.capacity {
            return Err(ErrorKind::TooMuchAcceptText);
        }

        let start = self.text.len();
        self.text.push_str(text);
        self.records.push(Record {
            line,
            start,
            end: self.text.len(),
        });

        Ok(AcceptId(self.records.len() - 1))
    }

    /// Gets the action referred to by `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this pool.
    pub fn get(&self, id: AcceptId) -> Accept {
        let record = &self.records[id.0];
        Accept {
            line: record.line,
            text: &self.text[record.start..record.end],
        }
    }

    /// The number of actions stored in the pool.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the pool holds no actions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The number of bytes of text stored in the pool.
    pub fn used(&self) -> usize {
        self.text.len()
    }

    /// The number of bytes of text the pool can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the stored actions in the order they were added.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (AcceptId, Accept<'a>)> + 'a {
        (0..self.records.len()).map(move |i| (AcceptId(i), self.get(AcceptId(i))))
    }
}
