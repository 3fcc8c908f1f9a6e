//! Graph analyzer (`spec.md` §4.C6): reachability-based diagnostics that do not require
//! determinism or minimality.
//!
//! Grounded in the same BFS idiom `dandy`'s state-removal passes use, generalized to also walk
//! epsilon edges and to run over the reverse graph for dead-state detection.

use crate::model::{ErrorCode, Fsa, Highlight, Severity, ValidationError};
use std::collections::{HashSet, VecDeque};

/// States reachable from the initial state via any transition, including epsilon moves
/// (`spec.md` §4.C6, §8 invariant #6).
pub fn find_unreachable_states(fsa: &Fsa) -> Vec<usize> {
    let reachable = forward_reachable(fsa);
    (0..fsa.num_states()).filter(|s| !reachable.contains(s)).collect()
}

/// States from which no accepting state can be reached (`spec.md` §4.C6, §8 invariant #7): a
/// state is dead iff it is non-accepting and no accepting state is reachable from it. Computed by
/// BFS over the reverse graph starting from the accepting set.
pub fn find_dead_states(fsa: &Fsa) -> Vec<usize> {
    let can_reach_accept = backward_reachable_from_accepting(fsa);
    (0..fsa.num_states())
        .filter(|&s| !fsa.is_accepting_state(s) && !can_reach_accept.contains(&s))
        .collect()
}

fn forward_reachable(fsa: &Fsa) -> HashSet<usize> {
    let mut seen = HashSet::new();
    seen.insert(fsa.initial_state_index());
    let mut queue = VecDeque::from([fsa.initial_state_index()]);
    while let Some(s) = queue.pop_front() {
        for &t in fsa.states()[s].epsilon_transitions() {
            if seen.insert(t) {
                queue.push_back(t);
            }
        }
        for sym_idx in 0..fsa.alphabet().len() {
            for &t in fsa.succ(s, sym_idx) {
                if seen.insert(t) {
                    queue.push_back(t);
                }
            }
        }
    }
    seen
}

fn backward_reachable_from_accepting(fsa: &Fsa) -> HashSet<usize> {
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); fsa.num_states()];
    for s in 0..fsa.num_states() {
        for &t in fsa.states()[s].epsilon_transitions() {
            predecessors[t].push(s);
        }
        for sym_idx in 0..fsa.alphabet().len() {
            for &t in fsa.succ(s, sym_idx) {
                predecessors[t].push(s);
            }
        }
    }

    let mut seen: HashSet<usize> =
        (0..fsa.num_states()).filter(|&s| fsa.is_accepting_state(s)).collect();
    let mut queue: VecDeque<usize> = seen.iter().copied().collect();
    while let Some(s) = queue.pop_front() {
        for &p in &predecessors[s] {
            if seen.insert(p) {
                queue.push_back(p);
            }
        }
    }
    seen
}

/// Renders [`find_unreachable_states`] and [`find_dead_states`] as `spec.md` §3 diagnostics
/// (`Severity::Warning`, since neither condition invalidates the automaton).
pub fn analyze(fsa: &Fsa) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for &s in &find_unreachable_states(fsa) {
        let name = fsa.states()[s].name().to_string();
        errors.push(
            ValidationError::new(
                ErrorCode::UnreachableState,
                Severity::Warning,
                format!("state '{name}' cannot be reached from the initial state"),
            )
            .with_suggestion(format!(
                "remove '{name}' or add a transition path to it from the initial state"
            ))
            .with_highlight(Highlight::State { id: name }),
        );
    }

    for &s in &find_dead_states(fsa) {
        let name = fsa.states()[s].name().to_string();
        errors.push(
            ValidationError::new(
                ErrorCode::DeadState,
                Severity::Warning,
                format!("state '{name}' can never reach an accepting state"),
            )
            .with_suggestion(format!(
                "remove '{name}' or add a transition path from it to an accepting state"
            ))
            .with_highlight(Highlight::State { id: name }),
        );
    }

    errors
}
