// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Thompson's construction of an NFA from a list of rules.
//!
//! This is a recursive descent parser for the following grammar. Each
//! production builds an NFA fragment with a single entry state and a single
//! exit state.
//!
//! ```text
//! machine  → rule+ END_OF_INPUT
//! rule     → '^'? expr '$'? EOS action
//! expr     → cat_expr ('|' cat_expr)*
//! cat_expr → factor factor*
//! factor   → term ('*' | '+' | '?')?
//! term     → literal | '.' | class | '(' expr ')'
//! class    → '[' '^'? (literal | literal '-' literal)* ']'
//! ```

use std::rc::Rc;

use accept::AcceptPool;
use arena::StateArena;
use charset::{CharSet, LINE_TERMINATORS};
use error::{ErrorKind, Result};
use input::LineSource;
use lexer::Lexer;
use macros::MacroTable;
use nfa::{Anchor, Edge, StateId};
use token::Token;

#[derive(Clone, Copy, Debug)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// The builder for the NFA of a set of rules.
pub struct Thompson<'a, 'm, S> {
    lexer: Lexer<'m, S>,
    states: &'a mut StateArena,
    accepts: &'a mut AcceptPool,
}

impl<'a, 'm, S: LineSource> Thompson<'a, 'm, S> {
    /// Create a new `Thompson` builder that reads rules from `source` and
    /// draws its states from `states`.
    pub fn new(
        source: S,
        macros: &'m MacroTable,
        states: &'a mut StateArena,
        accepts: &'a mut AcceptPool,
    ) -> Thompson<'a, 'm, S> {
        Thompson {
            lexer: Lexer::new(source, macros),
            states,
            accepts,
        }
    }

    /// Build the NFA for every rule in the source.
    ///
    /// Returns the start state: the head of a chain of `Epsilon` states
    /// whose `out1` leads to the entry of a rule and whose `out2` leads to
    /// the next link.
    pub fn machine(mut self) -> Result<StateId> {
        if self.lexer.advance()? == Token::EndOfInput {
            return Err(self.lexer.error(ErrorKind::NoRules));
        }

        let start = self.allocate()?;
        let entry = self.rule()?;
        self.states[start].out1 = Some(entry);

        let mut link = start;
        while self.lexer.token() != Token::EndOfInput {
            let next = self.allocate()?;
            self.states[link].out2 = Some(next);
            let entry = self.rule()?;
            self.states[next].out1 = Some(entry);
            link = next;
        }

        Ok(start)
    }

    fn rule(&mut self) -> Result<StateId> {
        trace!("rule at line {}", self.lexer.line_number());
        let mut anchor = Anchor::None;

        let frag = if self.lexer.token() == Token::AtBol {
            let start = self.allocate()?;
            self.states[start].edge = Edge::Char(b'\n');
            anchor |= Anchor::Start;
            self.lexer.advance()?;

            let inner = self.expr()?;
            self.states[start].out1 = Some(inner.start);
            Fragment {
                start,
                end: inner.end,
            }
        } else {
            self.expr()?
        };

        let mut end = frag.end;
        if self.lexer.token() == Token::AtEol {
            self.lexer.advance()?;
            let exit = self.allocate()?;
            let eol: CharSet = LINE_TERMINATORS.iter().cloned().collect();
            self.states[end].edge = Edge::Class(Rc::new(eol));
            self.states[end].out1 = Some(exit);
            end = exit;
            anchor |= Anchor::End;
        }

        if self.lexer.token() != Token::EndOfString {
            return Err(self.lexer.error(ErrorKind::MalformedExpression));
        }

        let line = self.lexer.line_number();
        let interned = {
            let action = self.lexer.action();
            self.accepts.intern(line, &action)
        };
        let accept = interned.map_err(|kind| self.lexer.error(kind))?;

        self.states[end].accept = Some(accept);
        self.states[end].anchor = anchor;
        self.lexer.advance()?;

        Ok(frag.start)
    }

    fn expr(&mut self) -> Result<Fragment> {
        trace!("expr");
        let mut frag = self.cat_expr()?;

        while self.lexer.token() == Token::Or {
            self.lexer.advance()?;
            let other = self.cat_expr()?;

            let start = self.allocate()?;
            let end = self.allocate()?;
            self.states[start].out1 = Some(frag.start);
            self.states[start].out2 = Some(other.start);
            self.states[frag.end].out1 = Some(end);
            self.states[other.end].out1 = Some(end);
            frag = Fragment { start, end };
        }

        Ok(frag)
    }

    fn cat_expr(&mut self) -> Result<Fragment> {
        trace!("cat_expr");
        if !self.first_in_cat()? {
            return Err(self.lexer.error(ErrorKind::MalformedExpression));
        }

        let mut frag = self.factor()?;
        while self.first_in_cat()? {
            let next = self.factor()?;

            // The entry of a fragment has no incoming transitions, so its
            // contents can move into the exit of the left fragment.
            let entry = self.states.take(next.start);
            self.states[frag.end] = entry;
            self.discard(next.start)?;
            frag.end = next.end;
        }

        Ok(frag)
    }

    fn first_in_cat(&self) -> Result<bool> {
        match self.lexer.token() {
            Token::CloseParen | Token::AtEol | Token::Or | Token::EndOfString | Token::EndOfInput => {
                Ok(false)
            }
            Token::Closure | Token::PlusClosure | Token::Optional => {
                Err(self.lexer.error(ErrorKind::ClosureWithoutOperand))
            }
            Token::ClassEnd => Err(self.lexer.error(ErrorKind::MissingClassOpen)),
            Token::AtBol => Err(self.lexer.error(ErrorKind::MisplacedBol)),
            _ => Ok(true),
        }
    }

    fn factor(&mut self) -> Result<Fragment> {
        trace!("factor");
        let frag = self.term()?;

        match self.lexer.token() {
            closure @ Token::Closure | closure @ Token::PlusClosure => {
                let start = self.allocate()?;
                let end = self.allocate()?;
                self.states[start].out1 = Some(frag.start);
                self.states[frag.end].out1 = Some(end);
                self.states[frag.end].out2 = Some(frag.start);
                if closure == Token::Closure {
                    self.states[start].out2 = Some(end);
                }
                self.lexer.advance()?;
                Ok(Fragment { start, end })
            }
            Token::Optional => {
                let start = if self.has_free_branch(frag.start) {
                    frag.start
                } else {
                    let start = self.allocate()?;
                    self.states[start].out1 = Some(frag.start);
                    start
                };
                self.states[start].out2 = Some(frag.end);
                self.lexer.advance()?;
                Ok(Fragment {
                    start,
                    end: frag.end,
                })
            }
            _ => Ok(frag),
        }
    }

    fn has_free_branch(&self, id: StateId) -> bool {
        let state = &self.states[id];
        state.edge.is_epsilon() && state.out1.is_some() && state.out2.is_none()
    }

    fn term(&mut self) -> Result<Fragment> {
        trace!("term");
        if self.lexer.token() == Token::OpenParen {
            self.lexer.advance()?;
            let frag = self.expr()?;
            if self.lexer.token() != Token::CloseParen {
                return Err(self.lexer.error(ErrorKind::MissingCloseParen));
            }
            self.lexer.advance()?;
            return Ok(frag);
        }

        let start = self.allocate()?;
        let end = self.allocate()?;
        self.states[start].out1 = Some(end);

        let edge = match self.lexer.token() {
            Token::Any => {
                self.lexer.advance()?;
                Edge::Any
            }
            Token::ClassStart => Edge::Class(Rc::new(self.class()?)),
            _ => {
                let c = self.lexer.lexeme();
                self.lexer.advance()?;
                Edge::Char(c)
            }
        };
        self.states[start].edge = edge;

        Ok(Fragment { start, end })
    }

    fn class(&mut self) -> Result<CharSet> {
        self.lexer.advance()?;

        let mut negate = false;
        if self.lexer.token() == Token::AtBol {
            negate = true;
            self.lexer.advance()?;
        }

        let mut set = CharSet::new();
        if self.lexer.token() == Token::ClassEnd {
            set.insert_range(0, b' ');
        } else {
            self.dodash(&mut set)?;
        }

        if self.lexer.token() != Token::ClassEnd {
            return Err(self.lexer.error(ErrorKind::MissingClassClose));
        }
        self.lexer.advance()?;

        if negate {
            for &c in LINE_TERMINATORS.iter() {
                set.insert(c);
            }
            set = set.complement();
        }
        Ok(set)
    }

    fn dodash(&mut self, set: &mut CharSet) -> Result<()> {
        let mut first = None;

        loop {
            match (self.lexer.token(), first) {
                (Token::ClassEnd, _) | (Token::EndOfString, _) | (Token::EndOfInput, _) => {
                    return Ok(())
                }
                (Token::Dash, Some(low)) => {
                    self.lexer.advance()?;
                    match self.lexer.token() {
                        Token::ClassEnd | Token::EndOfString | Token::EndOfInput => {
                            set.insert(b'-');
                            return Ok(());
                        }
                        _ => {
                            set.insert_range(low, self.lexer.lexeme());
                            first = None;
                            self.lexer.advance()?;
                        }
                    }
                }
                _ => {
                    let c = self.lexer.lexeme();
                    set.insert(c);
                    first = Some(c);
                    self.lexer.advance()?;
                }
            }
        }
    }

    fn allocate(&mut self) -> Result<StateId> {
        let lexer = &self.lexer;
        self.states.allocate().map_err(|kind| lexer.error(kind))
    }

    fn discard(&mut self, id: StateId) -> Result<()> {
        let lexer = &self.lexer;
        self.states.discard(id).map_err(|kind| lexer.error(kind))
    }
}
