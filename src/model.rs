//! Core data model: the [`Fsa`] value type, its wire-shaped input [`RawFsa`], and the
//! diagnostic value types ([`Highlight`], [`ValidationError`], [`ErrorCode`], [`StructuralInfo`],
//! [`TestResult`], [`LanguageComparison`], [`DifferenceString`] and [`FsaFeedback`]) that the rest
//! of the crate produces. See `spec.md` §3 for the value semantics these types are modeling.
//!
//! An [`Fsa`] is built from a [`RawFsa`] by [`crate::validate::validate_and_build`], which is the
//! only place the two invariant-free-text identifiers (`states`/`alphabet` as `String`s) get
//! resolved to the index-based representation the rest of the crate operates on. Once built, an
//! `Fsa` is immutable and reentrant: every analysis in this crate takes `&Fsa` and returns freshly
//! allocated derived data, never mutating its input (`spec.md` §5).

use std::collections::HashMap;
use std::rc::Rc;

/// The three spellings of the epsilon marker recognized on input (`spec.md` §3).
pub const EPSILON_SPELLINGS: [&str; 3] = ["ε", "epsilon", ""];

/// Checks whether `symbol` is one of the reserved epsilon spellings.
#[inline]
pub fn is_epsilon(symbol: &str) -> bool {
    EPSILON_SPELLINGS.contains(&symbol)
}

/// The wire-shaped wire transition triple, as received from the I/O layer (`spec.md` §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransition {
    pub from_state: String,
    pub to_state: String,
    pub symbol: String,
}

/// The wire-shaped FSA 5-tuple, as received from the I/O layer (`spec.md` §3, §6). This type
/// carries no invariants of its own — it may be empty, reference unknown states, duplicate
/// symbols, and so on. [`crate::validate::validate_and_build`] is the only function that turns
/// this into an [`Fsa`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFsa {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<RawTransition>,
    pub initial_state: String,
    pub accept_states: Vec<String>,
}

/// A single state of a built [`Fsa`]: its name, whether it is accepting, its epsilon successors,
/// and its successors for each alphabet symbol (indexed the same way as [`Fsa::alphabet`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsaState {
    pub(crate) name: Rc<str>,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl FsaState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The epsilon successors of this state, as state indices.
    pub fn epsilon_transitions(&self) -> &[usize] {
        &self.epsilon_transitions
    }

    /// The successors of this state for each symbol, in alphabet order. An entry may contain
    /// zero, one, or many indices — zero means the transition is absent (the automaton may be
    /// partial), more than one means the automaton is non-deterministic on that symbol.
    pub fn transitions(&self) -> &[Vec<usize>] {
        &self.transitions
    }
}

/// A validated, index-based finite-state automaton. May be non-deterministic, partial (missing
/// transitions), and/or contain epsilon moves — see [`crate::validate`] for the invariants this
/// type does guarantee, and [`Fsa::is_deterministic`]/[`Fsa::is_complete`] for derived properties
/// that are not invariants of the type itself.
///
/// Cloning an `Fsa` is cheap: the alphabet is an `Rc<[Rc<str>]>` and state names are `Rc<str>`, so
/// no string data is copied, only some small `Vec`s of indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fsa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<FsaState>,
    pub(crate) initial_state: usize,
    pub(crate) accepting: Vec<bool>,
    pub(crate) name_index: Rc<HashMap<Rc<str>, usize>>,
}

impl Fsa {
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    pub fn states(&self) -> &[FsaState] {
        &self.states
    }

    pub fn initial_state(&self) -> &FsaState {
        &self.states[self.initial_state]
    }

    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }

    /// The index of the state named `name`, if any.
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Index of `symbol` within [`Fsa::alphabet`], if it is a symbol of this automaton.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.alphabet.iter().position(|s| s.as_ref() == symbol)
    }

    /// The successors of `state` on `symbol` (non-epsilon), as a slice of state indices. Returns
    /// an empty slice if `symbol` is not in the alphabet, or the automaton has no transition.
    pub fn succ(&self, state: usize, symbol_idx: usize) -> &[usize] {
        self.states[state]
            .transitions
            .get(symbol_idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `state` is one of the accepting states.
    pub fn is_accepting_state(&self, state: usize) -> bool {
        self.accepting[state]
    }

    /// Whether this automaton has any epsilon transitions at all.
    pub fn has_epsilon_moves(&self) -> bool {
        self.states.iter().any(|s| !s.epsilon_transitions.is_empty())
    }

    /// Deterministic per `spec.md` §3: no epsilon transitions, and at most one successor per
    /// `(state, symbol)` pair.
    pub fn is_deterministic(&self) -> bool {
        !self.has_epsilon_moves()
            && self
                .states
                .iter()
                .all(|s| s.transitions.iter().all(|succs| succs.len() <= 1))
    }

    /// Complete per `spec.md` §3: deterministic, and every `(state, symbol)` pair has exactly one
    /// transition.
    pub fn is_complete(&self) -> bool {
        self.is_deterministic()
            && self
                .states
                .iter()
                .all(|s| s.transitions.iter().all(|succs| succs.len() == 1))
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.states
            .iter()
            .map(|s| {
                s.epsilon_transitions.len() + s.transitions.iter().map(Vec::len).sum::<usize>()
            })
            .sum()
    }
}

/// A reference into a specific FSA element, for highlighting in a hypothetical graphical editor
/// (`spec.md` §3, §6). Carries owned `String`s rather than indices, since a `ValidationError` may
/// outlive the `Fsa`/`RawFsa` it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    State { id: String },
    Transition { from: String, to: String, symbol: String },
    InitialState { id: String },
    AcceptState { id: String },
    AlphabetSymbol { symbol: String },
    General,
}

/// Severity of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The closed set of diagnostic codes a [`ValidationError`] may carry (`spec.md` §6). Some codes
/// cover more than one underlying condition; see `DESIGN.md` for how the finer distinctions drawn
/// in `spec.md` §4.C8 (wrong destination / should-be-accepting / should-not-be-accepting /
/// extra-transition) map onto this closed set via `message` text rather than further variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidState,
    InvalidInitial,
    InvalidAccept,
    InvalidSymbol,
    InvalidTransitionSource,
    InvalidTransitionDest,
    InvalidTransitionSymbol,
    MissingTransition,
    DuplicateTransition,
    UnreachableState,
    DeadState,
    WrongAutomatonType,
    NotDeterministic,
    NotComplete,
    LanguageMismatch,
    TestCaseFailed,
    EmptyStates,
    EmptyAlphabet,
    EvaluationError,
}

/// A single diagnostic finding, suitable for rendering directly to a student (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    pub highlight: Option<Highlight>,
}

impl ValidationError {
    pub(crate) fn new(code: ErrorCode, severity: Severity, message: impl Into<String>) -> Self {
        ValidationError {
            code,
            severity,
            message: message.into(),
            suggestion: None,
            highlight: None,
        }
    }

    pub(crate) fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub(crate) fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// Structural and property summary of an [`Fsa`] (`spec.md` §3, §4.C2/§4.C6).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuralInfo {
    pub is_deterministic: bool,
    pub is_complete: bool,
    /// Whether this automaton has no redundant states: determinizing and minimizing it does not
    /// reduce its state count further. Not an [`ErrorCode`] of its own (`spec.md`'s diagnostic
    /// codes cover well-formedness, not optimality) — surfaced here and, when
    /// `Params::check_minimality` asks for it, as a plain-text hint.
    pub is_minimal: bool,
    pub num_states: usize,
    pub num_transitions: usize,
    pub unreachable_states: Vec<String>,
    pub dead_states: Vec<String>,
}

/// The per-symbol configuration-set history produced by [`crate::eval::trace`]. For a DFA this
/// degenerates to one state per entry; for an NFA, a set.
pub type Configuration = Vec<String>;

/// The outcome of simulating one test case (`spec.md` §3, §4.C7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub input: Vec<String>,
    pub expected: bool,
    pub actual: bool,
    pub passed: bool,
    pub trace: Vec<Configuration>,
}

/// Which side disagreed in a counterexample, from the student's point of view (`spec.md` §4.C9,
/// §9): `ShouldAccept` means the student rejects a string the reference accepts, `ShouldReject`
/// means the student accepts a string the reference rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterexampleType {
    ShouldAccept,
    ShouldReject,
}

/// The result of comparing two FSAs for language equivalence (`spec.md` §3, §4.C9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageComparison {
    pub are_equivalent: bool,
    pub counterexample: Option<Vec<String>>,
    pub counterexample_type: Option<CounterexampleType>,
}

/// One entry of a bounded difference-string enumeration (`spec.md` §4.C9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceString {
    pub input: Vec<String>,
    pub counterexample_type: CounterexampleType,
    pub student_trace: Vec<Configuration>,
    pub reference_trace: Vec<Configuration>,
}

/// The externally visible feedback document produced by the correction pipeline (`spec.md` §3,
/// §4.C10).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FsaFeedback {
    pub summary: String,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    pub structural: Option<StructuralInfo>,
    pub language: Option<LanguageComparison>,
    pub test_results: Vec<TestResult>,
    pub hints: Vec<String>,
}
