//! Epsilon-closure engine (`spec.md` §4.C3): per-state and bulk epsilon closure computation.
//!
//! Mirrors `dandy::nfa::Nfa::closure`, generalized to operate on the unified [`Fsa`] type and
//! exposed in both a single-state and memoized bulk form (`εsucc`/`εsucc*` in `spec.md`'s
//! notation).

use crate::model::Fsa;
use std::collections::HashSet;
use std::mem;

/// The epsilon closure of a single state: the set of states reachable from `state` by zero or
/// more epsilon transitions. Always contains `state` itself. Terminates on cycles via the
/// `all` membership test, the same way `dandy::nfa::Nfa::closure` does.
pub fn epsilon_closure(fsa: &Fsa, state: usize) -> HashSet<usize> {
    let mut all = HashSet::new();
    all.insert(state);
    let mut frontier = vec![state];
    while !frontier.is_empty() {
        let current = mem::take(&mut frontier);
        for s in current {
            for &next in fsa.states()[s].epsilon_transitions() {
                if all.insert(next) {
                    frontier.push(next);
                }
            }
        }
    }
    all
}

/// The epsilon closure of a set of states: the union of [`epsilon_closure`] over every member.
pub fn epsilon_closure_set(fsa: &Fsa, states: impl IntoIterator<Item = usize>) -> HashSet<usize> {
    states
        .into_iter()
        .fold(HashSet::new(), |mut acc, s| {
            acc.extend(epsilon_closure(fsa, s));
            acc
        })
}

/// Memoizes [`epsilon_closure`] for every state of `fsa` in a single pass (`εsucc*` over all
/// states, `spec.md` §4.C3). Expansion order does not affect the fixed point, so this simply maps
/// each state index to its closure independently.
pub fn epsilon_closure_table(fsa: &Fsa) -> Vec<HashSet<usize>> {
    (0..fsa.num_states())
        .map(|s| epsilon_closure(fsa, s))
        .collect()
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

    #[test]
    fn no_epsilon_moves_is_identity() {
        let raw = RawFsa {
            states: vec!["q0".into(), "q1".into()],
            alphabet: vec!["a".into()],
            transitions: vec![triple("q0", "a", "q1")],
            initial_state: "q0".into(),
            accept_states: vec![],
        };
        let (_, fsa) = validate_and_build(&raw);
        let fsa = fsa.unwrap();
        let closure = epsilon_closure(&fsa, 0);
        assert_eq!(closure, HashSet::from([0]));
    }

    #[test]
    fn epsilon_cycle_terminates() {
        let raw = RawFsa {
            states: vec!["a".into(), "b".into(), "c".into()],
            alphabet: vec!["x".into()],
            transitions: vec![
                triple("a", "ε", "b"),
                triple("b", "ε", "c"),
                triple("c", "ε", "a"),
            ],
            initial_state: "a".into(),
            accept_states: vec![],
        };
        let (_, fsa) = validate_and_build(&raw);
        let fsa = fsa.unwrap();
        let closure = epsilon_closure(&fsa, 0);
        assert_eq!(closure, HashSet::from([0, 1, 2]));
    }
}
