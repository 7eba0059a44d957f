// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

#[macro_use]
extern crate assert_matches;
extern crate lexnfa;
#[macro_use]
extern crate proptest;

use std::collections::BTreeSet;
use std::str;

use lexnfa::diagnostics;
use lexnfa::{Anchor, Config, Context, Error, ErrorKind, Nfa, RuleLines, StateId};
use proptest::prelude::*;

fn compile(ctx: Context, rules: &str) -> Result<Nfa, Error> {
    ctx.thompson(RuleLines::new(rules.as_bytes()))
}

fn compile_with_macros(macros: &[&str], rules: &str) -> Result<Nfa, Error> {
    let mut ctx = Context::new();
    for (i, line) in macros.iter().enumerate() {
        ctx.define_macro(i + 1, line)?;
    }
    compile(ctx, rules)
}

fn epsilon_closure(nfa: &Nfa, set: BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut pending: Vec<_> = set.iter().cloned().collect();
    let mut closure = set;

    while let Some(id) = pending.pop() {
        let state = &nfa[id];
        if state.edge().is_epsilon() {
            for next in state.out1().into_iter().chain(state.out2()) {
                if closure.insert(next) {
                    pending.push(next);
                }
            }
        }
    }
    closure
}

// The accept actions of the rules that match all of `input`.
fn run(nfa: &Nfa, input: &[u8]) -> Vec<String> {
    let mut current = epsilon_closure(nfa, Some(nfa.start()).into_iter().collect());

    for &c in input {
        let next = current
            .iter()
            .filter(|&&id| nfa[id].edge().matches(c))
            .filter_map(|&id| nfa[id].out1())
            .collect();
        current = epsilon_closure(nfa, next);
    }

    current
        .iter()
        .filter_map(|&id| nfa.accept(id))
        .map(|accept| accept.text().to_string())
        .collect()
}

fn accepts(nfa: &Nfa, input: &str) -> bool {
    !run(nfa, input.as_bytes()).is_empty()
}

// Every state reachable from the start state by any transition.
fn reachable(nfa: &Nfa) -> BTreeSet<StateId> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![nfa.start()];

    while let Some(id) = pending.pop() {
        if seen.insert(id) {
            let state = &nfa[id];
            pending.extend(state.out1().into_iter().chain(state.out2()));
        }
    }
    seen
}

fn pattern() -> BoxedStrategy<String> {
    let leaf = prop_oneof![
        "[a-c]",
        Just(".".to_string()),
        Just("[ab]".to_string()),
        Just("[^a]".to_string()),
    ];

    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}{}", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({}|{})", a, b)),
            (inner, prop_oneof![Just('*'), Just('+'), Just('?')])
                .prop_map(|(a, op)| format!("({}){}", a, op)),
        ]
    }).boxed()
}

#[test]
fn macro_closure_rule_matches_letter_then_digits() {
    let nfa = compile_with_macros(&["DIGIT [0-9]"], "a{DIGIT}*  return(NUM);\n").unwrap();

    let accepting: Vec<_> = nfa.accepting_states().collect();
    assert_eq!(accepting.len(), 1);
    assert_eq!(accepting[0].1.text(), "return(NUM);");

    assert!(accepts(&nfa, "a"));
    assert!(accepts(&nfa, "a0123456789"));
    assert!(!accepts(&nfa, ""));
    assert!(!accepts(&nfa, "b1"));
    assert!(!accepts(&nfa, "a1x"));
}

#[test]
fn anchored_rule_is_anchored_at_both_ends() {
    let nfa = compile(Context::new(), "^abc$  BOL_EOL;").unwrap();

    let (id, _) = nfa.accepting_states().next().unwrap();
    assert_eq!(nfa[id].anchor(), Anchor::Both);
    assert!(accepts(&nfa, "\nabc\n"));
    assert!(accepts(&nfa, "\nabc\r"));
    assert!(!accepts(&nfa, "abc"));
}

#[test]
fn plus_of_alternation_builds_eight_states() {
    let nfa = compile(Context::new(), "(a|b)+  OR_PLUS;").unwrap();

    assert_eq!(nfa.live_states(), 1 + 8);
    assert!(accepts(&nfa, "abba"));
    assert!(accepts(&nfa, "b"));
    assert!(!accepts(&nfa, ""));
    assert!(!accepts(&nfa, "abc"));
}

#[test]
fn optional_and_star_accept_empty_input() {
    let nfa = compile(Context::new(), "a?  OPT;\nb*  STAR;").unwrap();

    assert_eq!(run(&nfa, b""), vec!["OPT;", "STAR;"]);
    assert_eq!(run(&nfa, b"a"), vec!["OPT;"]);
    assert_eq!(run(&nfa, b"bbb"), vec!["STAR;"]);
}

#[test]
fn unclosed_macro_reference_fails_with_nonzero_status() {
    let err = compile_with_macros(&["DIGIT [0-9]", "BAD x{DIGIT"], "{BAD}  X;").unwrap_err();

    assert_matches!(*err.kind(), ErrorKind::MalformedMacroReference);
    assert_ne!(err.exit_status(), 0);
}

#[test]
fn state_limit_fails_at_the_crossing_allocation() {
    let fits = Context::with_config(Config::new().max_states(6));
    let too_small = Context::with_config(Config::new().max_states(5));

    assert_matches!(compile(fits, "abc  ABC;"), Ok(_));
    assert_matches!(
        *compile(too_small, "abc  ABC;").unwrap_err().kind(),
        ErrorKind::AutomatonTooLarge
    );
}

#[test]
fn shared_action_is_stored_once() {
    let nfa = compile(Context::new(), "a  A_OR_B;\nb  |\n").unwrap();

    let ids: Vec<_> = nfa.accepting_states()
        .map(|(id, _)| nfa[id].accept().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);
    assert_eq!(nfa.accepts().len(), 1);
    assert_eq!(run(&nfa, b"b"), vec!["A_OR_B;"]);
}

#[test]
fn every_rule_that_matches_is_reported() {
    let nfa = compile(Context::new(), "if  IF;\n[a-z]+  ID;\n").unwrap();

    assert_eq!(run(&nfa, b"if"), vec!["IF;", "ID;"]);
    assert_eq!(run(&nfa, b"iff"), vec!["ID;"]);
}

#[test]
fn action_may_continue_onto_following_lines() {
    let nfa = compile(Context::new(), "a  {\n    return(A);\n  }\nb  B;\n").unwrap();

    assert_eq!(run(&nfa, b"a"), vec!["{\n    return(A);\n  }"]);
    assert_eq!(nfa.rules().count(), 2);
}

#[test]
fn rules_end_at_percent_line() {
    let nfa = compile(Context::new(), "a  A;\n%%\nb  B;\n").unwrap();

    assert_eq!(nfa.rules().count(), 1);
}

#[test]
fn quoted_string_keeps_spaces_and_operators() {
    let nfa = compile(Context::new(), "\"a b*\"  QUOTED;").unwrap();

    assert!(accepts(&nfa, "a b*"));
    assert!(!accepts(&nfa, "a bb"));
}

#[test]
fn escapes_decode_to_characters() {
    let nfa = compile(Context::new(), "\\t\\x41\\101\\.  ESC;").unwrap();

    assert!(accepts(&nfa, "\tAA."));
}

#[test]
fn any_does_not_match_newline() {
    let nfa = compile(Context::new(), ".  ANY;").unwrap();

    assert!(accepts(&nfa, "x"));
    assert!(!accepts(&nfa, "\n"));
}

#[test]
fn rule_may_hold_bytes_that_are_not_utf8() {
    let nfa = Context::new()
        .thompson(RuleLines::new(&b"caf\xe9  CAFE;\n[\x80-\xff]+  HIGH;\n"[..]))
        .unwrap();

    assert_eq!(run(&nfa, b"caf\xe9"), vec!["CAFE;"]);
    assert_eq!(run(&nfa, b"\xe9\xff"), vec!["HIGH;"]);
    assert!(run(&nfa, b"cafe").is_empty());
}

#[test]
fn whitespace_in_macro_body_is_rejected() {
    let err = compile_with_macros(&["WS a b"], "{WS}c  ACT;").unwrap_err();

    assert_matches!(*err.kind(), ErrorKind::MalformedExpression);
}

#[test]
fn report_points_at_the_error() {
    let err = compile(Context::new(), "a  A;\n(ab  X;\n").unwrap_err();

    let mut out = Vec::new();
    diagnostics::report(&err, &mut out).unwrap();

    assert_eq!(
        str::from_utf8(&out).unwrap(),
        "ERROR (line 2) missing close parenthesis\n(ab  X;\n___^\n"
    );
}

#[test]
fn independent_contexts_do_not_share_macros() {
    let mut first = Context::new();
    first.define_macro(1, "D [0-9]").unwrap();
    let second = Context::new();

    assert_matches!(compile(first, "{D}  D;"), Ok(_));
    assert_matches!(
        *compile(second, "{D}  D;").unwrap_err().kind(),
        ErrorKind::UndefinedMacro(_)
    );
}

proptest! {
    #[test]
    fn literal_rule_matches_exactly_itself(word in "[a-z]{1,20}", other in "[a-z]{1,20}") {
        let nfa = compile(Context::new(), &format!("{}  WORD;", word)).unwrap();

        prop_assert_eq!(nfa.live_states(), 1 + word.len() + 1);
        prop_assert!(accepts(&nfa, &word));
        prop_assert_eq!(accepts(&nfa, &other), word == other);
    }

    #[test]
    fn reachable_states_are_exactly_the_live_states(first in pattern(), second in pattern()) {
        let rules = format!("^{}$  FIRST;\n{}  SECOND;\n", first, second);
        let nfa = compile(Context::new(), &rules).unwrap();

        let seen = reachable(&nfa);

        for &id in &seen {
            let state = &nfa[id];
            prop_assert!(!state.is_empty());
            if !state.is_accepting() {
                prop_assert!(state.out1().is_some());
            }
        }
        prop_assert_eq!(seen.len(), nfa.live_states());
        prop_assert_eq!(nfa.accepting_states().count(), 2);
    }
}
