//! Isomorphism checker (`spec.md` §4.C8): structural comparison of two reduced DFAs over the
//! same alphabet via simultaneous BFS pairing.
//!
//! `spec.md` draws four distinct mismatch kinds (wrong destination, should-be-accepting,
//! should-not-be-accepting, extra transition). This crate's [`ErrorCode`](crate::model::ErrorCode)
//! is a closed set without a variant per kind; see `DESIGN.md` for the mapping used here: a
//! transition present on exactly one side becomes [`ErrorCode::MissingTransition`], every other
//! disagreement (wrong destination, accept-status mismatch, or a precondition failure) becomes
//! [`ErrorCode::LanguageMismatch`], with the specific kind carried in the diagnostic's `message`.

use crate::model::{ErrorCode, Fsa, Highlight, Severity, ValidationError};
use crate::util::alphabet_equal;
use std::collections::{HashMap, VecDeque};

/// Checks whether `a` and `b` are isomorphic as DFAs, assuming both are already reduced
/// (minimal) and deterministic (`spec.md` §4.C8's precondition — callers run
/// [`crate::determinize::determinize`] and [`crate::minimize::minimize`] first). Returns every
/// mismatch found; an empty result means the automata are isomorphic.
pub fn check_isomorphism(a: &Fsa, b: &Fsa) -> Vec<ValidationError> {
    debug_assert!(a.is_deterministic() && b.is_deterministic());

    if !alphabet_equal(a.alphabet(), b.alphabet()) {
        return vec![ValidationError::new(
            ErrorCode::LanguageMismatch,
            Severity::Error,
            format!(
                "the two automata use different alphabets and cannot be compared structurally: \
                 differing symbols are {}",
                alphabet_symmetric_difference(a, b)
            ),
        )
        .with_highlight(Highlight::General)];
    }
    if a.num_states() != b.num_states() {
        return vec![ValidationError::new(
            ErrorCode::LanguageMismatch,
            Severity::Error,
            format!(
                "state count differs: {} vs {}",
                a.num_states(),
                b.num_states()
            ),
        )];
    }
    let a_accepting = (0..a.num_states()).filter(|&s| a.is_accepting_state(s)).count();
    let b_accepting = (0..b.num_states()).filter(|&s| b.is_accepting_state(s)).count();
    if a_accepting != b_accepting {
        return vec![ValidationError::new(
            ErrorCode::LanguageMismatch,
            Severity::Error,
            format!("accepting state count differs: {a_accepting} vs {b_accepting}"),
        )];
    }

    let mut findings = Vec::new();
    let mut a_to_b: HashMap<usize, usize> = HashMap::new();
    let mut b_to_a: HashMap<usize, usize> = HashMap::new();

    a_to_b.insert(a.initial_state_index(), b.initial_state_index());
    b_to_a.insert(b.initial_state_index(), a.initial_state_index());
    let mut queue = VecDeque::from([(a.initial_state_index(), b.initial_state_index())]);

    if a.is_accepting_state(a.initial_state_index()) != b.is_accepting_state(b.initial_state_index())
    {
        findings.push(accept_mismatch(a, a.initial_state_index(), b.initial_state_index()));
    }

    while let Some((sa, sb)) = queue.pop_front() {
        for (sym_idx, symbol) in a.alphabet().iter().enumerate() {
            let ta = a.succ(sa, sym_idx).first().copied();
            let tb = b.succ(sb, sym_idx).first().copied();

            match (ta, tb) {
                (None, None) => {}
                (Some(_), None) | (None, Some(_)) => {
                    findings.push(
                        ValidationError::new(
                            ErrorCode::MissingTransition,
                            Severity::Error,
                            format!(
                                "only one automaton has a transition from '{}'/'{}' on '{}'",
                                a.states()[sa].name(),
                                b.states()[sb].name(),
                                symbol
                            ),
                        )
                        .with_highlight(Highlight::Transition {
                            from: a.states()[sa].name().to_string(),
                            to: String::new(),
                            symbol: symbol.to_string(),
                        }),
                    );
                }
                (Some(ta), Some(tb)) => {
                    match (a_to_b.get(&ta), b_to_a.get(&tb)) {
                        (Some(&mapped_b), _) if mapped_b != tb => {
                            findings.push(destination_mismatch(a, b, sa, sb, symbol, ta, tb));
                        }
                        (_, Some(&mapped_a)) if mapped_a != ta => {
                            findings.push(destination_mismatch(a, b, sa, sb, symbol, ta, tb));
                        }
                        (None, None) => {
                            a_to_b.insert(ta, tb);
                            b_to_a.insert(tb, ta);
                            if a.is_accepting_state(ta) != b.is_accepting_state(tb) {
                                findings.push(accept_mismatch(a, ta, tb));
                            }
                            queue.push_back((ta, tb));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    findings
}

/// Renders the symbols present in exactly one of `a`/`b`'s alphabets, sorted, for the
/// alphabet-mismatch pre-check's diagnostic message (`spec.md` §4.C8).
fn alphabet_symmetric_difference(a: &Fsa, b: &Fsa) -> String {
    let mut differing: Vec<&str> = a
        .alphabet()
        .iter()
        .chain(b.alphabet())
        .map(|s| s.as_ref())
        .filter(|s| {
            let in_a = a.alphabet().iter().any(|sym| sym.as_ref() == *s);
            let in_b = b.alphabet().iter().any(|sym| sym.as_ref() == *s);
            in_a != in_b
        })
        .collect();
    differing.sort_unstable();
    differing.dedup();
    differing.join(", ")
}

fn accept_mismatch(a: &Fsa, state_a: usize, state_b_dummy: usize) -> ValidationError {
    let _ = state_b_dummy;
    let name = a.states()[state_a].name().to_string();
    ValidationError::new(
        ErrorCode::LanguageMismatch,
        Severity::Error,
        format!(
            "accepting status disagrees for corresponding state '{name}': {}",
            if a.is_accepting_state(state_a) {
                "should not be accepting"
            } else {
                "should be accepting"
            }
        ),
    )
    .with_highlight(Highlight::AcceptState { id: name })
}

fn destination_mismatch(
    a: &Fsa,
    b: &Fsa,
    sa: usize,
    sb: usize,
    symbol: &str,
    ta: usize,
    tb: usize,
) -> ValidationError {
    ValidationError::new(
        ErrorCode::LanguageMismatch,
        Severity::Error,
        format!(
            "transition from '{}'/'{}' on '{}' leads to a different corresponding state ('{}' vs '{}')",
            a.states()[sa].name(),
            b.states()[sb].name(),
            symbol,
            a.states()[ta].name(),
            b.states()[tb].name(),
        ),
    )
    .with_highlight(Highlight::Transition {
        from: a.states()[sa].name().to_string(),
        to: a.states()[ta].name().to_string(),
        symbol: symbol.to_string(),
    })
}
