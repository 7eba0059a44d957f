// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A fixed-capacity pool of NFA states with an explicit freelist.
//!
//! States refer to each other by `StateId` (an index into the pool) so a
//! fragment may contain cycles. Discarded states are never released; they
//! are cleared to `Edge::Empty` and handed out again by the next
//! `allocate()`.

use std::mem;
use std::ops::{Index, IndexMut};
use std::result;

use error::ErrorKind;
use nfa::{State, StateId};

type Result<T> = result::Result<T, ErrorKind>;

/// The pool of NFA states for one compilation run.
#[derive(Debug)]
pub struct StateArena {
    states: Vec<State>,
    free: Vec<StateId>,
    capacity: usize,
    free_capacity: usize,
    live: usize,
    high_water: usize,
}

impl StateArena {
    /// Create a new `StateArena` that can hold `capacity` states and remember
    /// up to `free_capacity` discarded states for reuse.
    pub fn new(capacity: usize, free_capacity: usize) -> StateArena {
        StateArena {
            states: Vec::with_capacity(capacity),
            free: Vec::with_capacity(free_capacity),
            capacity,
            free_capacity,
            live: 0,
            high_water: 0,
        }
    }

    /// Allocate a fresh `Epsilon` state with no transitions.
    ///
    /// A discarded state is reused if there is one.
    pub fn allocate(&mut self) -> Result<StateId> {
        let id = match self.free.pop() {
            Some(id) => {
                self.states[id.index()] = State::new();
                id
            }
            None => {
                if self.states.len() >= self.capacity {
                    return Err(ErrorKind::AutomatonTooLarge);
                }
                self.states.push(State::new());
                StateId::new(self.states.len() - 1)
            }
        };

        self.live += 1;
        if self.live > self.high_water {
            self.high_water = self.live;
        }
        Ok(id)
    }

    /// Clear the state `id` and put it on the freelist.
    pub fn discard(&mut self, id: StateId) -> Result<()> {
        if self.states[id.index()].is_empty() {
            return Err(ErrorKind::Internal("state discarded twice"));
        }
        if self.free.len() >= self.free_capacity {
            return Err(ErrorKind::Internal("discard stack full"));
        }

        self.states[id.index()] = State::empty();
        self.free.push(id);
        self.live -= 1;
        Ok(())
    }

    /// Remove the contents of the state `id`, leaving a fresh state behind.
    pub(crate) fn take(&mut self, id: StateId) -> State {
        mem::replace(&mut self.states[id.index()], State::new())
    }

    /// The number of states that are allocated and not discarded.
    pub fn live(&self) -> usize {
        self.live
    }

    /// The largest number of states that were live at one time.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// The number of slots that have ever been used.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no state has ever been allocated.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The maximum number of states.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of discarded states waiting for reuse.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Consume the arena, returning the state table and the live count.
    pub fn into_states(self) -> (Vec<State>, usize) {
        (self.states, self.live)
    }
}

impl Index<StateId> for StateArena {
    type Output = State;

    fn index(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }
}

impl IndexMut<StateId> for StateArena {
    fn index_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }
}
