// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! A library for compiling the rules of a lexical-analyzer specification into
//! a nondeterministic finite automaton.
//!
//! Each rule is a regular expression followed by an accept action:
//!
//! ```text
//! {LETTER}({LETTER}|{DIGIT})*    return(ID);
//! "=="                           return(EQ);
//! ```
//!
//! The patterns are compiled by Thompson's construction into a single `Nfa`
//! that recognizes the union of the rules. The `Nfa` is meant to be turned
//! into a DFA by subset construction; this crate does not match input
//! itself.
//!
//! A compilation run uses a `Context`, which owns the macro table, the pool
//! of NFA states and the pool of accept-action text:
//!
//! ```
//! use lexnfa::{Context, RuleLines};
//!
//! let mut ctx = Context::new();
//! ctx.define_macro(1, "DIGIT [0-9]").unwrap();
//!
//! let rules = "a{DIGIT}*  return(NUM);\n";
//! let nfa = ctx.thompson(RuleLines::new(rules.as_bytes()).first_line(3)).unwrap();
//!
//! let (_, accept) = nfa.accepting_states().next().unwrap();
//! assert_eq!(accept.text(), "return(NUM);");
//! assert_eq!(accept.line(), 3);
//! ```

#![deny(missing_docs)]

extern crate arrayvec;
extern crate bitvec;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate proptest;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

pub mod accept;
pub mod charset;
pub mod config;
pub mod diagnostics;
pub mod input;
pub mod lexer;
pub mod macros;
pub mod nfa;
pub mod token;

mod arena;
mod error;
mod location;
mod thompson;

pub use accept::{Accept, AcceptId, AcceptPool};
pub use arena::StateArena;
pub use charset::CharSet;
pub use config::Config;
pub use error::{Error, ErrorKind, Result, EXIT_FAILURE};
pub use input::{LineSource, RuleLines, SourceLine};
pub use location::Location;
pub use macros::MacroTable;
pub use nfa::{Anchor, Edge, Nfa, State, StateId};

use thompson::Thompson;

/// The state of one compilation run.
///
/// A `Context` bundles the macro table with the state arena and the
/// accept-text pool that the NFA is built from. Macros are defined first;
/// `thompson()` then consumes the context and compiles the rules.
#[derive(Debug)]
pub struct Context {
    config: Config,
    states: StateArena,
    accepts: AcceptPool,
    macros: MacroTable,
}

impl Context {
    /// Create a new `Context` with the default limits.
    pub fn new() -> Context {
        Context::with_config(Config::default())
    }

    /// Create a new `Context` with the limits in `config`.
    pub fn with_config(config: Config) -> Context {
        Context {
            config,
            states: StateArena::new(config.get_max_states(), config.get_max_free_states()),
            accepts: AcceptPool::new(config.get_max_accept_text()),
            macros: MacroTable::new(),
        }
    }

    /// Gets the limits of this compilation run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Define a macro from the definition line `text`, which is line
    /// `line_number` of the specification.
    pub fn define_macro(&mut self, line_number: usize, text: &str) -> Result<()> {
        self.macros
            .define_line(text)
            .map_err(|kind| Error::at(kind, Location::new(line_number, 0), text))
    }

    /// Gets the macro table.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Gets the macro table for direct definitions.
    pub fn macros_mut(&mut self) -> &mut MacroTable {
        &mut self.macros
    }

    /// Compile every rule from `source` into an `Nfa`.
    pub fn thompson<S: LineSource>(mut self, source: S) -> Result<Nfa> {
        let start = Thompson::new(source, &self.macros, &mut self.states, &mut self.accepts)
            .machine()?;

        debug!(
            "built NFA: {} live states, {} slots, peak {} of {}, {} bytes of accept text in {} actions",
            self.states.live(),
            self.states.len(),
            self.states.high_water(),
            self.states.capacity(),
            self.accepts.used(),
            self.accepts.len()
        );

        let (states, live) = self.states.into_states();
        Ok(Nfa::new(states, start, live, self.accepts))
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}
