//! Structural validator (`spec.md` §4.C2): checks the well-formedness of a [`RawFsa`] and, if no
//! fatal problems are found, builds the index-based [`Fsa`] the rest of the crate operates on.
//!
//! Every check below runs unconditionally and independently — unlike `dandy`'s
//! `TryFrom<ParsedDfa>` (which returns the first error it finds), this validator collects every
//! violation so a student sees all of their mistakes in one pass, per `spec.md` §4.C2's
//! "no short-circuit" requirement.

use crate::model::{
    is_epsilon, ErrorCode, Fsa, FsaState, Highlight, RawFsa, Severity, ValidationError,
};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Runs every structural check against `raw` and returns the full list of findings. Does not
/// build an [`Fsa`] — see [`validate_and_build`] for that.
pub fn validate_structure(raw: &RawFsa) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let state_set: HashSet<&str> = raw.states.iter().map(String::as_str).collect();
    let alphabet_set: HashSet<&str> = raw.alphabet.iter().map(String::as_str).collect();

    if raw.states.is_empty() {
        errors.push(
            ValidationError::new(
                ErrorCode::EmptyStates,
                Severity::Error,
                "The automaton has no states",
            )
            .with_suggestion("Add at least one state")
            .with_highlight(Highlight::General),
        );
    }
    if raw.alphabet.is_empty() {
        errors.push(
            ValidationError::new(
                ErrorCode::EmptyAlphabet,
                Severity::Error,
                "The automaton has an empty alphabet",
            )
            .with_suggestion("Add at least one input symbol")
            .with_highlight(Highlight::General),
        );
    }

    check_duplicate_states(raw, &mut errors);
    check_duplicate_or_reserved_symbols(raw, &mut errors);

    if !state_set.contains(raw.initial_state.as_str()) {
        let message = if raw.initial_state.is_empty() {
            "No initial state was given".to_string()
        } else {
            format!(
                "Initial state '{}' is not one of the automaton's states",
                raw.initial_state
            )
        };
        errors.push(
            ValidationError::new(ErrorCode::InvalidInitial, Severity::Error, message)
                .with_suggestion(format!(
                    "Add '{}' to the states list or choose an existing state as initial",
                    raw.initial_state
                ))
                .with_highlight(Highlight::InitialState {
                    id: raw.initial_state.clone(),
                }),
        );
    }

    for accept in &raw.accept_states {
        if !state_set.contains(accept.as_str()) {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidAccept,
                    Severity::Error,
                    format!("Accepting state '{accept}' is not one of the automaton's states"),
                )
                .with_suggestion(format!(
                    "Add '{accept}' to the states list or remove it from the accepting states"
                ))
                .with_highlight(Highlight::AcceptState { id: accept.clone() }),
            );
        }
    }

    check_transitions(raw, &state_set, &alphabet_set, &mut errors);

    errors
}

fn check_duplicate_states(raw: &RawFsa, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for name in &raw.states {
        if name.is_empty() {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidState,
                    Severity::Error,
                    "State identifiers must be non-empty",
                )
                .with_suggestion("Give the state a non-empty name")
                .with_highlight(Highlight::General),
            );
        } else if !seen.insert(name.as_str()) {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidState,
                    Severity::Error,
                    format!("State '{name}' is defined more than once"),
                )
                .with_suggestion(format!("Remove the duplicate definition of '{name}'"))
                .with_highlight(Highlight::State { id: name.clone() }),
            );
        }
    }
}

fn check_duplicate_or_reserved_symbols(raw: &RawFsa, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for symbol in &raw.alphabet {
        if symbol.is_empty() || is_epsilon(symbol) {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidSymbol,
                    Severity::Error,
                    format!(
                        "'{symbol}' cannot be used as an alphabet symbol: it is reserved for the epsilon marker"
                    ),
                )
                .with_suggestion("Remove the reserved symbol from the alphabet, or rename it")
                .with_highlight(Highlight::AlphabetSymbol {
                    symbol: symbol.clone(),
                }),
            );
        } else if !seen.insert(symbol.as_str()) {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidSymbol,
                    Severity::Error,
                    format!("Symbol '{symbol}' appears twice in the alphabet"),
                )
                .with_suggestion(format!("Remove the duplicate entry of '{symbol}'"))
                .with_highlight(Highlight::AlphabetSymbol {
                    symbol: symbol.clone(),
                }),
            );
        }
    }
}

fn check_transitions(
    raw: &RawFsa,
    state_set: &HashSet<&str>,
    alphabet_set: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen_triples = HashSet::new();
    for t in &raw.transitions {
        let source_ok = state_set.contains(t.from_state.as_str());
        let dest_ok = state_set.contains(t.to_state.as_str());
        let symbol_ok = is_epsilon(&t.symbol) || alphabet_set.contains(t.symbol.as_str());

        if !source_ok {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidTransitionSource,
                    Severity::Error,
                    format!(
                        "Transition from '{}' to '{}' on '{}' references unknown source state '{}'",
                        t.from_state, t.to_state, t.symbol, t.from_state
                    ),
                )
                .with_suggestion(format!(
                    "Add '{}' to the states list or remove this transition",
                    t.from_state
                ))
                .with_highlight(Highlight::Transition {
                    from: t.from_state.clone(),
                    to: t.to_state.clone(),
                    symbol: t.symbol.clone(),
                }),
            );
        }
        if !dest_ok {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidTransitionDest,
                    Severity::Error,
                    format!(
                        "Transition from '{}' to '{}' on '{}' references unknown destination state '{}'",
                        t.from_state, t.to_state, t.symbol, t.to_state
                    ),
                )
                .with_suggestion(format!(
                    "Add '{}' to the states list or change the destination",
                    t.to_state
                ))
                .with_highlight(Highlight::Transition {
                    from: t.from_state.clone(),
                    to: t.to_state.clone(),
                    symbol: t.symbol.clone(),
                }),
            );
        }
        if !symbol_ok {
            errors.push(
                ValidationError::new(
                    ErrorCode::InvalidTransitionSymbol,
                    Severity::Error,
                    format!(
                        "Transition from '{}' to '{}' uses symbol '{}', which is not in the alphabet",
                        t.from_state, t.to_state, t.symbol
                    ),
                )
                .with_suggestion(format!(
                    "Add '{}' to the alphabet or change the symbol on this transition",
                    t.symbol
                ))
                .with_highlight(Highlight::Transition {
                    from: t.from_state.clone(),
                    to: t.to_state.clone(),
                    symbol: t.symbol.clone(),
                }),
            );
        }

        if source_ok && dest_ok && symbol_ok {
            let key = (t.from_state.as_str(), t.symbol.as_str(), t.to_state.as_str());
            if !seen_triples.insert(key) {
                errors.push(
                    ValidationError::new(
                        ErrorCode::DuplicateTransition,
                        Severity::Info,
                        format!(
                            "Transition from '{}' to '{}' on '{}' is listed more than once",
                            t.from_state, t.to_state, t.symbol
                        ),
                    )
                    .with_suggestion("Remove the duplicate transition entry")
                    .with_highlight(Highlight::Transition {
                        from: t.from_state.clone(),
                        to: t.to_state.clone(),
                        symbol: t.symbol.clone(),
                    }),
                );
            }
        }
    }
}

/// Runs [`validate_structure`] and, if no `Severity::Error` finding was produced, builds the
/// corresponding [`Fsa`]. Simulation and the rest of the semantic pipeline are undefined on an
/// ill-formed automaton, so construction is skipped (not attempted partially) whenever a fatal
/// structural error is present — the caller still receives the full diagnostic list either way.
pub fn validate_and_build(raw: &RawFsa) -> (Vec<ValidationError>, Option<Fsa>) {
    let errors = validate_structure(raw);
    if errors.iter().any(|e| e.severity == Severity::Error) {
        return (errors, None);
    }

    let name_index: HashMap<Rc<str>, usize> = raw
        .states
        .iter()
        .enumerate()
        .map(|(idx, name)| (Rc::from(name.as_str()), idx))
        .collect();
    let alphabet: Rc<[Rc<str>]> = raw.alphabet.iter().map(|s| Rc::from(s.as_str())).collect();
    let symbol_index: HashMap<&str, usize> = raw
        .alphabet
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.as_str(), idx))
        .collect();
    let accepting_set: HashSet<&str> = raw.accept_states.iter().map(String::as_str).collect();

    let mut epsilon_transitions = vec![Vec::new(); raw.states.len()];
    let mut transitions = vec![vec![HashSet::new(); raw.alphabet.len()]; raw.states.len()];

    for t in &raw.transitions {
        let (Some(&from), Some(&to)) = (
            name_index.get(t.from_state.as_str()),
            name_index.get(t.to_state.as_str()),
        ) else {
            continue;
        };
        if is_epsilon(&t.symbol) {
            if !epsilon_transitions[from].contains(&to) {
                epsilon_transitions[from].push(to);
            }
        } else if let Some(&sym) = symbol_index.get(t.symbol.as_str()) {
            transitions[from][sym].insert(to);
        }
    }

    let states = raw
        .states
        .iter()
        .enumerate()
        .map(|(idx, name)| FsaState {
            name: Rc::from(name.as_str()),
            accepting: accepting_set.contains(name.as_str()),
            epsilon_transitions: std::mem::take(&mut epsilon_transitions[idx]),
            transitions: transitions[idx]
                .iter()
                .map(|set| {
                    let mut v: Vec<usize> = set.iter().copied().collect();
                    v.sort_unstable();
                    v
                })
                .collect(),
        })
        .collect();

    let accepting = raw
        .states
        .iter()
        .map(|name| accepting_set.contains(name.as_str()))
        .collect();

    let fsa = Fsa {
        alphabet,
        states,
        initial_state: name_index[raw.initial_state.as_str()],
        accepting,
        name_index: Rc::new(name_index),
    };

    (errors, Some(fsa))
}
