//! Determinizer (`spec.md` §4.C4): subset construction turning a (possibly non-deterministic,
//! possibly epsilon-containing) [`Fsa`] into an equivalent deterministic one.
//!
//! Grounded in `dandy::nfa::Nfa::to_dfa`'s worklist-over-evaluators approach, adapted in two ways
//! required by `spec.md`: new states are named canonically (the sorted, braced member list from
//! [`crate::util::frozen_set_name`]) rather than sequential integers, and a missing transition is
//! simply omitted rather than implicitly completed — the resulting DFA may be partial.

use crate::closure::epsilon_closure_set;
use crate::model::{Fsa, FsaState};
use crate::util::{frozen_set_name, set_to_sorted_vec};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Runs subset construction on `fsa`, producing a deterministic, epsilon-free automaton
/// accepting the same language. The result may be partial: if a subset has no successor on some
/// symbol, that transition is simply absent rather than completed with an implicit trap state
/// (`spec.md` §4.C4, §9).
pub fn determinize(fsa: &Fsa) -> Fsa {
    let alphabet = fsa.alphabet.clone();
    let start = epsilon_closure_set(fsa, [fsa.initial_state_index()]);

    // Discovery order of subsets determines their final index; index 0 is always the start.
    let mut index_of: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut subsets: Vec<HashSet<usize>> = Vec::new();
    let mut queue: Vec<HashSet<usize>> = Vec::new();

    let start_key = set_to_sorted_vec(&start);
    index_of.insert(start_key, 0);
    subsets.push(start.clone());
    queue.push(start);

    let mut transitions: Vec<Vec<Vec<usize>>> = Vec::new();

    while let Some(subset) = queue.pop() {
        let this_idx = index_of[&set_to_sorted_vec(&subset)];
        let mut row = vec![Vec::new(); alphabet.len()];

        for (sym_idx, _) in alphabet.iter().enumerate() {
            let raw_succ: HashSet<usize> = subset
                .iter()
                .flat_map(|&s| fsa.succ(s, sym_idx).iter().copied())
                .collect();
            if raw_succ.is_empty() {
                continue;
            }
            let closed = epsilon_closure_set(fsa, raw_succ);
            let key = set_to_sorted_vec(&closed);
            let target_idx = *index_of.entry(key).or_insert_with(|| {
                let idx = subsets.len();
                subsets.push(closed.clone());
                queue.push(closed.clone());
                idx
            });
            row[sym_idx] = vec![target_idx];
        }

        if this_idx >= transitions.len() {
            transitions.resize(this_idx + 1, Vec::new());
        }
        transitions[this_idx] = row;
    }

    let states: Vec<FsaState> = subsets
        .iter()
        .map(|subset| {
            let mut member_names: Vec<&str> = subset
                .iter()
                .map(|&s| fsa.states()[s].name())
                .collect();
            member_names.sort_unstable();
            let accepting = subset.iter().any(|&s| fsa.is_accepting_state(s));
            FsaState {
                name: frozen_set_name(member_names),
                accepting,
                epsilon_transitions: Vec::new(),
                transitions: transitions
                    .get(index_of[&set_to_sorted_vec(subset)])
                    .cloned()
                    .unwrap_or_else(|| vec![Vec::new(); alphabet.len()]),
            }
        })
        .collect();

    let accepting: Vec<bool> = states.iter().map(|s| s.accepting).collect();
    let name_index: HashMap<Rc<str>, usize> = states
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.name.clone(), idx))
        .collect();

    Fsa {
        alphabet,
        states,
        initial_state: 0,
        accepting,
        name_index: Rc::new(name_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::accepts_graphemes;
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
    fn determinize_resolves_nondeterminism() {
        let raw = RawFsa {
            states: vec!["q0".into(), "q1".into(), "q2".into()],
            alphabet: vec!["a".into()],
            transitions: vec![triple("q0", "a", "q1"), triple("q0", "a", "q2")],
            initial_state: "q0".into(),
            accept_states: vec!["q2".into()],
        };
        let (_, fsa) = validate_and_build(&raw);
        let fsa = fsa.unwrap();
        assert!(!fsa.is_deterministic());
        let dfa = determinize(&fsa);
        assert!(dfa.is_deterministic());
        assert!(!dfa.has_epsilon_moves());
    }

    #[test]
    fn determinize_preserves_language() {
        let raw = RawFsa {
            states: vec!["s0".into(), "s1".into(), "s2".into(), "s3".into()],
            alphabet: vec!["a".into(), "b".into()],
            transitions: vec![
                triple("s0", "ε", "s1"),
                triple("s0", "a", "s0"),
                triple("s1", "a", "s2"),
                triple("s1", "b", "s2"),
                triple("s2", "b", "s3"),
            ],
            initial_state: "s0".into(),
            accept_states: vec!["s3".into()],
        };
        let (_, fsa) = validate_and_build(&raw);
        let fsa = fsa.unwrap();
        let dfa = determinize(&fsa);
        assert!(dfa.is_deterministic());

        for w in ["", "a", "ab", "aab", "abb", "b"] {
            let graphemes = w.chars().map(|c| c.to_string()).collect::<Vec<_>>();
            let refs = graphemes.iter().map(String::as_str).collect::<Vec<_>>();
            assert_eq!(
                crate::eval::accepts(&fsa, &refs),
                crate::eval::accepts(&dfa, &refs),
                "mismatch on {w:?}"
            );
        }
        let _ = accepts_graphemes(&dfa, "ab");
    }
}
