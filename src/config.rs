// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Capacity limits for a compilation run.

/// The default maximum number of NFA states in a single machine.
pub const DEFAULT_MAX_STATES: usize = 768;

/// The default capacity of the discarded-state freelist.
pub const DEFAULT_MAX_FREE_STATES: usize = 32;

/// The default number of bytes available for accept-action text.
pub const DEFAULT_MAX_ACCEPT_TEXT: usize = 10 * 1024;

/// The configuration of a `Context`.
///
/// Every limit is fixed for the whole run; exceeding one is a fatal error
/// rather than a reason to grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_states: usize,
    max_free_states: usize,
    max_accept_text: usize,
}

impl Config {
    /// Create a `Config` with the default limits.
    pub fn new() -> Config {
        Config {
            max_states: DEFAULT_MAX_STATES,
            max_free_states: DEFAULT_MAX_FREE_STATES,
            max_accept_text: DEFAULT_MAX_ACCEPT_TEXT,
        }
    }

    /// Set the maximum number of NFA states.
    pub fn max_states(mut self, limit: usize) -> Config {
        self.max_states = limit;
        self
    }

    /// Set the capacity of the freelist of discarded states.
    pub fn max_free_states(mut self, limit: usize) -> Config {
        self.max_free_states = limit;
        self
    }

    /// Set the number of bytes available for accept-action text.
    pub fn max_accept_text(mut self, limit: usize) -> Config {
        self.max_accept_text = limit;
        self
    }

    /// Gets the maximum number of NFA states.
    pub fn get_max_states(&self) -> usize {
        self.max_states
    }

    /// Gets the capacity of the freelist of discarded states.
    pub fn get_max_free_states(&self) -> usize {
        self.max_free_states
    }

    /// Gets the number of bytes available for accept-action text.
    pub fn get_max_accept_text(&self) -> usize {
        self.max_accept_text
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
