// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The nondeterministic finite automaton produced by Thompson's construction.
//!
//! An `Nfa` is a table of `State`'s that refer to each other by `StateId`.
//! Each `State` has at most two outgoing transitions. A state whose edge is
//! a character, a character class or the wildcard has a single transition
//! (`out1`) taken on that input; an `Epsilon` state has up to two
//! transitions (`out1` and `out2`) taken without consuming input.

use std::fmt::{self, Display};
use std::ops::{self, Index};
use std::rc::Rc;

use accept::{Accept, AcceptId, AcceptPool};
use charset::{CharSet, Printable, LINE_TERMINATORS};

/// A reference to a `State` within its arena (and so within its `Nfa`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> StateId {
        StateId(index)
    }

    /// The position of the state in the state table.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The label on the transition out of a `State`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Edge {
    /// A transition on a single character.
    Char(u8),

    /// A transition on any character in a set.
    Class(Rc<CharSet>),

    /// A transition on any character except a line terminator.
    Any,

    /// Transitions that consume no input.
    Epsilon,

    /// The state is unused and sits on the arena's freelist.
    Empty,
}

impl Edge {
    /// Check if a transition labeled with this edge can be taken on `c`.
    ///
    /// `Epsilon` and `Empty` edges never consume a character.
    pub fn matches(&self, c: u8) -> bool {
        match *self {
            Edge::Char(label) => label == c,
            Edge::Class(ref set) => set.contains(c),
            Edge::Any => !LINE_TERMINATORS.contains(&c),
            Edge::Epsilon | Edge::Empty => false,
        }
    }

    /// Check if this is an `Epsilon` edge.
    pub fn is_epsilon(&self) -> bool {
        *self == Edge::Epsilon
    }
}

/// Whether the pattern of an accepting state is anchored to the start
/// and/or the end of a line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Anchor {
    /// Not anchored.
    None,
    /// Anchored at the start of a line (`^`).
    Start,
    /// Anchored at the end of a line (`$`).
    End,
    /// Anchored at both the start and end of a line.
    Both,
}

impl Anchor {
    /// Check if the pattern must start at the start of a line.
    pub fn at_start(&self) -> bool {
        match *self {
            Anchor::Start | Anchor::Both => true,
            _ => false,
        }
    }

    /// Check if the pattern must end at the end of a line.
    pub fn at_end(&self) -> bool {
        match *self {
            Anchor::End | Anchor::Both => true,
            _ => false,
        }
    }
}

impl Default for Anchor {
    fn default() -> Anchor {
        Anchor::None
    }
}

impl ops::BitOr for Anchor {
    type Output = Anchor;

    fn bitor(self, rhs: Anchor) -> Anchor {
        match (self.at_start() || rhs.at_start(), self.at_end() || rhs.at_end()) {
            (false, false) => Anchor::None,
            (true, false) => Anchor::Start,
            (false, true) => Anchor::End,
            (true, true) => Anchor::Both,
        }
    }
}

impl ops::BitOrAssign for Anchor {
    fn bitor_assign(&mut self, rhs: Anchor) {
        *self = *self | rhs;
    }
}

/// A single NFA state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    pub(crate) edge: Edge,
    pub(crate) out1: Option<StateId>,
    pub(crate) out2: Option<StateId>,
    pub(crate) accept: Option<AcceptId>,
    pub(crate) anchor: Anchor,
}

impl State {
    /// A fresh state: an `Epsilon` edge and no transitions.
    pub(crate) fn new() -> State {
        State {
            edge: Edge::Epsilon,
            out1: None,
            out2: None,
            accept: None,
            anchor: Anchor::None,
        }
    }

    /// A cleared state ready for the freelist.
    pub(crate) fn empty() -> State {
        State {
            edge: Edge::Empty,
            ..State::new()
        }
    }

    /// Gets the label of the transition out of this state.
    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// Gets the first (or only) transition target.
    pub fn out1(&self) -> Option<StateId> {
        self.out1
    }

    /// Gets the second transition target, used only by `Epsilon` states.
    pub fn out2(&self) -> Option<StateId> {
        self.out2
    }

    /// Gets the accept action of an accepting state.
    pub fn accept(&self) -> Option<AcceptId> {
        self.accept
    }

    /// Gets the anchor of an accepting state.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Check if this is an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.accept.is_some()
    }

    /// Check if this state is an unused slot.
    pub fn is_empty(&self) -> bool {
        self.edge == Edge::Empty
    }
}

/// A nondeterministic finite automaton for the union of a set of rules.
///
/// The start state heads a chain of `Epsilon` states, one per rule, whose
/// `out1` is the entry of that rule's automaton and whose `out2` is the next
/// link in the chain. The state table may contain `Empty` slots for states
/// that were discarded during construction.
#[derive(Debug)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    live: usize,
    accepts: AcceptPool,
}

impl Nfa {
    pub(crate) fn new(states: Vec<State>, start: StateId, live: usize, accepts: AcceptPool) -> Nfa {
        Nfa {
            states,
            start,
            live,
            accepts,
        }
    }

    /// Gets the start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The size of the state table, including unused slots.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if the state table is empty (which never happens for an `Nfa`
    /// built from at least one rule).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The number of states in use.
    pub fn live_states(&self) -> usize {
        self.live
    }

    /// Gets the state for `id`.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// Iterate over the states in use.
    pub fn states<'a>(&'a self) -> impl Iterator<Item = (StateId, &'a State)> + 'a {
        self.states
            .iter()
            .enumerate()
            .filter(|&(_, state)| !state.is_empty())
            .map(|(i, state)| (StateId(i), state))
    }

    /// Iterate over the entry state of each rule, in the order of the rules.
    pub fn rules(&self) -> Rules {
        Rules {
            nfa: self,
            link: Some(self.start),
        }
    }

    /// Iterate over the accepting states.
    pub fn accepting_states<'a>(&'a self) -> impl Iterator<Item = (StateId, Accept<'a>)> + 'a {
        self.states()
            .filter_map(move |(id, state)| state.accept.map(|accept| (id, self.accepts.get(accept))))
    }

    /// Gets the accept action of the state `id`, if it is accepting.
    pub fn accept(&self, id: StateId) -> Option<Accept> {
        self.state(id).accept.map(|accept| self.accepts.get(accept))
    }

    /// Gets the pool that holds the accept actions.
    pub fn accepts(&self) -> &AcceptPool {
        &self.accepts
    }
}

impl Index<StateId> for Nfa {
    type Output = State;

    fn index(&self, id: StateId) -> &State {
        self.state(id)
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "----------------- NFA ---------------")?;
        for (id, state) in self.states() {
            write!(f, "NFA state {:3}: ", id)?;
            match state.out1 {
                None => write!(f, "(TERMINAL)")?,
                Some(out1) => {
                    write!(f, "--> {:3} ", out1)?;
                    match state.out2 {
                        Some(out2) => write!(f, "({:3}) ", out2)?,
                        None => write!(f, "      ")?,
                    }
                    match state.edge {
                        Edge::Char(c) => write!(f, "on '{}'", Printable(c))?,
                        Edge::Class(ref set) => write!(f, "on {}", set)?,
                        Edge::Any => write!(f, "on ANY")?,
                        Edge::Epsilon => write!(f, "on EPSILON")?,
                        Edge::Empty => {}
                    }
                }
            }
            if id == self.start {
                write!(f, " (START STATE)")?;
            }
            if let Some(accept) = self.accept(id) {
                write!(
                    f,
                    " accepting {}<{}>{} (line {})",
                    if state.anchor.at_start() { "^" } else { "" },
                    accept.text(),
                    if state.anchor.at_end() { "$" } else { "" },
                    accept.line()
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f, "-------------------------------------")
    }
}

/// An iterator over the entry states of the rules in an `Nfa`.
///
/// This is the return type of the `Nfa::rules()` method.
pub struct Rules<'a> {
    nfa: &'a Nfa,
    link: Option<StateId>,
}

impl<'a> Iterator for Rules<'a> {
    type Item = StateId;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.nfa.state(self.link?);
        self.link = link.out2;
        link.out1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_state_is_clean_epsilon() {
        let sut = State::new();

        assert_eq!(sut.edge(), &Edge::Epsilon);
        assert_eq!(sut.out1(), None);
        assert_eq!(sut.out2(), None);
        assert!(!sut.is_accepting());
        assert_eq!(sut.anchor(), Anchor::None);
    }

    #[test]
    fn anchor_bitor_combines_start_and_end() {
        let mut sut = Anchor::None;

        sut |= Anchor::Start;
        assert_eq!(sut, Anchor::Start);

        sut |= Anchor::End;
        assert_eq!(sut, Anchor::Both);
    }

    #[test]
    fn any_edge_excludes_line_terminators() {
        let sut = Edge::Any;

        assert!(sut.matches(b'a'));
        assert!(sut.matches(0));
        assert!(!sut.matches(b'\n'));
        assert!(!sut.matches(b'\r'));
    }

    #[test]
    fn epsilon_edge_matches_nothing() {
        assert!(!Edge::Epsilon.matches(b'a'));
        assert!(!Edge::Empty.matches(b'a'));
    }

    #[test]
    fn class_edge_matches_members() {
        let mut set = CharSet::new();
        set.insert_range(b'0', b'9');
        let sut = Edge::Class(Rc::new(set));

        assert!(sut.matches(b'5'));
        assert!(!sut.matches(b'a'));
    }

    #[test]
    fn rules_follows_the_start_chain() {
        let mut states = vec![State::new(); 4];
        states[0].out1 = Some(StateId(1));
        states[0].out2 = Some(StateId(2));
        states[2].out1 = Some(StateId(3));
        let sut = Nfa::new(states, StateId(0), 4, AcceptPool::new(0));

        let rules: Vec<_> = sut.rules().collect();

        assert_eq!(rules, vec![StateId(1), StateId(3)]);
    }

    #[test]
    fn state_id_display_honours_width() {
        assert_eq!(format!("{:3}", StateId(7)), "  7");
    }
}
