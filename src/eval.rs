//! Simulator (`spec.md` §4.C7): NFA/DFA acceptance and tracing on a single string.
//!
//! Structured the same way `dandy::nfa::eval::NfaEvaluator` is: a small struct tracking the
//! current configuration (a set of state indices) that is stepped one symbol at a time. Unlike
//! `dandy`'s evaluators, stepping on a symbol outside the alphabet is not an error here — per
//! `spec.md` §4.C7, it is simply a rejection (the configuration becomes empty and stays empty).

use crate::closure::epsilon_closure_set;
use crate::model::Fsa;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Tracks the current configuration (set of state indices) of an in-progress simulation.
#[derive(Clone, Debug)]
pub struct FsaEvaluator<'a> {
    fsa: &'a Fsa,
    current: HashSet<usize>,
}

impl<'a> FsaEvaluator<'a> {
    pub fn new(fsa: &'a Fsa) -> Self {
        let current = epsilon_closure_set(fsa, [fsa.initial_state_index()]);
        FsaEvaluator { fsa, current }
    }

    pub fn is_accepting(&self) -> bool {
        self.current.iter().any(|&s| self.fsa.is_accepting_state(s))
    }

    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current
    }

    /// The current configuration as state names, sorted for a stable rendering.
    pub fn current_state_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .current
            .iter()
            .map(|&s| self.fsa.states()[s].name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Steps on `symbol`. If `symbol` is not in the alphabet, the configuration becomes empty
    /// (rejection), matching `spec.md` §4.C7's "never an error" rule.
    pub fn step(&mut self, symbol: &str) {
        let Some(symbol_idx) = self.fsa.symbol_index(symbol) else {
            self.current.clear();
            return;
        };
        let stepped = self
            .current
            .iter()
            .flat_map(|&s| self.fsa.succ(s, symbol_idx).iter().copied())
            .collect::<HashSet<_>>();
        self.current = epsilon_closure_set(self.fsa, stepped);
    }

    pub fn step_all(&mut self, symbols: &[&str]) {
        for s in symbols {
            self.step(s);
        }
    }
}

/// Checks whether `fsa` accepts `input`, implementing the standard NFA configuration-set
/// recurrence of `spec.md` §4.C7.
pub fn accepts(fsa: &Fsa, input: &[&str]) -> bool {
    let mut eval = FsaEvaluator::new(fsa);
    eval.step_all(input);
    eval.is_accepting()
}

/// Convenience wrapper splitting `input` into single grapheme clusters before simulating, for
/// alphabets whose symbols are each one character (mirrors `dandy`'s `accepts_graphemes`).
pub fn accepts_graphemes(fsa: &Fsa, input: &str) -> bool {
    let graphemes = input.graphemes(true).collect::<Vec<_>>();
    accepts(fsa, &graphemes)
}

/// Simulates `input` against `fsa`, recording the configuration after each symbol (`spec.md`
/// §4.C7). The first entry of the returned trace is the initial configuration (after epsilon
/// closure, before consuming any symbol); entries are all-distinct-sorted state name lists.
pub fn trace(fsa: &Fsa, input: &[&str]) -> Vec<Vec<String>> {
    let mut eval = FsaEvaluator::new(fsa);
    let mut trace = vec![eval.current_state_names()];
    for symbol in input {
        eval.step(symbol);
        trace.push(eval.current_state_names());
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawFsa, RawTransition};
    use crate::validate::validate_and_build;

    fn triple(from: &str, symbol: &str, to: &str) -> RawTransition {
        RawTransition {
            from_state: from.into(),
            to_state: to.into(),
            symbol: symbol.into(),
        }
    }

    fn ends_with_ab() -> Fsa {
        // spec.md §8, scenario S4: accepts strings ending in "ab"
        let raw = RawFsa {
            states: vec!["q0".into(), "q1".into(), "q2".into()],
            alphabet: vec!["a".into(), "b".into()],
            transitions: vec![
                triple("q0", "a", "q1"),
                triple("q0", "b", "q0"),
                triple("q1", "a", "q1"),
                triple("q1", "b", "q2"),
                triple("q2", "a", "q1"),
                triple("q2", "b", "q0"),
            ],
            initial_state: "q0".into(),
            accept_states: vec!["q2".into()],
        };
        validate_and_build(&raw).1.unwrap()
    }

    #[test]
    fn s4_acceptance_scenarios() {
        let fsa = ends_with_ab();
        assert!(accepts_graphemes(&fsa, "ab"));
        assert!(accepts_graphemes(&fsa, "aab"));
        assert!(!accepts_graphemes(&fsa, "ba"));
        assert!(!accepts_graphemes(&fsa, ""));
    }

    #[test]
    fn unknown_symbol_rejects_without_error() {
        let fsa = ends_with_ab();
        assert!(!accepts(&fsa, &["a", "c", "b"]));
    }

    #[test]
    fn trace_length_is_input_length_plus_one() {
        let fsa = ends_with_ab();
        let t = trace(&fsa, &["a", "a", "b"]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.last().unwrap(), &vec!["q2".to_string()]);
    }
}
