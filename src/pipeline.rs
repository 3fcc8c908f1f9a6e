//! Correction pipeline (`spec.md` §4.C10): the single externally-visible entry point that ties
//! every other module together into one grading pass over a student's submission.
//!
//! Shaped like `dandy-cli`'s top-level `run` flow (parse/validate first, dispatch on the kind of
//! work requested, then render one feedback value) but generalized from a one-shot CLI command
//! into a library call a grading service embeds. `spec.md` §9 asks that the public surface be
//! consolidated onto one real procedure; [`evaluate`] is that procedure; [`feedback`],
//! [`is_correct`] and [`evaluate_map`] are thin projections of its result (`SPEC_FULL.md` §S6).

use crate::determinize::determinize;
use crate::eval::{accepts, trace};
use crate::equivalence::{generate_difference_strings, reduce, same_language, DEFAULT_MAX_DIFFERENCES};
use crate::minimize::minimize;
use crate::graph::{analyze, find_dead_states, find_unreachable_states};
use crate::isomorphism::check_isomorphism;
use crate::model::{
    ErrorCode, Fsa, FsaFeedback, Highlight, RawFsa, Severity, StructuralInfo, TestResult,
    ValidationError,
};
use crate::validate::validate_and_build;
use std::collections::BTreeMap;

/// A single input/expected-output pair a submission is graded against (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub input: Vec<String>,
    pub expected: bool,
}

/// What the submission is being compared against (`spec.md` §4.C10). `Regex` and `Grammar` are
/// reserved for a future front-end; this crate does not implement either comparison mode and
/// always reports a single [`ErrorCode::EvaluationError`] diagnostic for them (`spec.md` §1's
/// out-of-scope boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    TestCases(Vec<TestCase>),
    ReferenceFsa(RawFsa),
    Regex(String),
    Grammar(String),
}

/// How strictly failing test cases or a language mismatch affect correctness (`spec.md` §4.C10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Every test case (or full language equivalence) must hold for the submission to be correct.
    Strict,
    /// A small number of failures are tolerated; `is_correct` reflects whether the submission is
    /// "close enough" rather than exact (currently: at least 90% of test cases pass).
    Lenient,
    /// No single pass/fail verdict; the submission is scored fractionally instead.
    Partial,
}

/// Which automaton shapes are accepted as a valid submission (`spec.md` §4.C10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Dfa,
    Nfa,
    Any,
}

/// Controls how much detail [`FsaFeedback`] carries (`spec.md` §4.C10). This crate always
/// computes the full diagnostic set internally; verbosity only affects what [`evaluate`] copies
/// into the returned feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackVerbosity {
    Minimal,
    Standard,
    Detailed,
}

/// Grading configuration for [`evaluate`] (`spec.md` §4.C10).
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub mode: EvaluationMode,
    pub expected_type: ExpectedType,
    pub verbosity: FeedbackVerbosity,
    pub check_completeness: bool,
    pub check_minimality: bool,
    pub highlight_errors: bool,
    pub show_counterexample: bool,
    pub max_test_length: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            mode: EvaluationMode::Strict,
            expected_type: ExpectedType::Any,
            verbosity: FeedbackVerbosity::Standard,
            check_completeness: false,
            check_minimality: false,
            highlight_errors: true,
            show_counterexample: true,
            max_test_length: crate::equivalence::DEFAULT_MAX_LENGTH,
        }
    }
}

/// The full outcome of one grading pass (`spec.md` §3, §4.C10).
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub is_correct: bool,
    pub feedback: String,
    pub score: Option<f64>,
    pub fsa_feedback: FsaFeedback,
}

/// Grades `submission` against `answer` under `params`. This is the one procedure every other
/// entry point in this module projects (`spec.md` §9).
pub fn evaluate(submission: &RawFsa, answer: &Answer, params: &Params) -> EvaluationOutcome {
    let (mut errors, fsa) = validate_and_build(submission);
    let mut warnings: Vec<ValidationError> = errors
        .iter()
        .filter(|e| e.severity != Severity::Error)
        .cloned()
        .collect();
    errors.retain(|e| e.severity == Severity::Error);

    let Some(fsa) = fsa else {
        return EvaluationOutcome {
            is_correct: false,
            feedback: "the submission is not a well-formed automaton; fix the errors below before it can be graded".into(),
            score: Some(0.0),
            fsa_feedback: FsaFeedback {
                summary: "submission failed structural validation".into(),
                errors,
                warnings,
                structural: None,
                language: None,
                test_results: Vec::new(),
                hints: Vec::new(),
            },
        };
    };

    let structural = structural_info(&fsa);
    enforce_type_constraints(&fsa, &structural, params, &mut errors);

    if !errors.is_empty() {
        return EvaluationOutcome {
            is_correct: false,
            feedback: "the submission does not meet the required automaton shape".into(),
            score: Some(0.0),
            fsa_feedback: FsaFeedback {
                summary: "submission violates a type/shape requirement".into(),
                errors,
                warnings,
                structural: Some(structural),
                language: None,
                test_results: Vec::new(),
                hints: Vec::new(),
            },
        };
    }

    warnings.extend(analyze(&fsa));

    let minimality_hint = if params.check_minimality && structural.is_deterministic && !structural.is_minimal
    {
        Some("the automaton is deterministic but not minimal; some states could be merged".to_string())
    } else {
        None
    };

    let mut outcome = match answer {
        Answer::TestCases(cases) => evaluate_against_test_cases(&fsa, cases, params, structural, warnings),
        Answer::ReferenceFsa(reference_raw) => {
            evaluate_against_reference(&fsa, reference_raw, params, structural, warnings, errors)
        }
        Answer::Regex(_) | Answer::Grammar(_) => unsupported_answer_kind(structural, warnings),
    };
    if let Some(hint) = minimality_hint {
        outcome.fsa_feedback.hints.push(hint);
    }
    if !params.highlight_errors {
        for finding in outcome
            .fsa_feedback
            .errors
            .iter_mut()
            .chain(outcome.fsa_feedback.warnings.iter_mut())
        {
            finding.highlight = None;
        }
    }
    apply_verbosity(&mut outcome.fsa_feedback, params.verbosity);
    outcome
}

const MINIMAL_TEST_RESULT_LIMIT: usize = 3;

/// Truncates `feedback`'s hints/test_results/traces per `spec.md` §6's
/// `feedback_verbosity` key. `Minimal` drops hints and caps test results down to a bare handful;
/// `Standard` keeps hints and test results but no traces (already the default shape produced
/// above); `Detailed` is left untouched.
fn apply_verbosity(feedback: &mut FsaFeedback, verbosity: FeedbackVerbosity) {
    match verbosity {
        FeedbackVerbosity::Minimal => {
            feedback.hints.clear();
            for result in &mut feedback.test_results {
                result.trace.clear();
            }
            feedback.test_results.truncate(MINIMAL_TEST_RESULT_LIMIT);
        }
        FeedbackVerbosity::Standard => {
            for result in &mut feedback.test_results {
                result.trace.clear();
            }
        }
        FeedbackVerbosity::Detailed => {}
    }
}

/// Projection of [`evaluate`] returning only the rendered feedback text.
pub fn feedback(submission: &RawFsa, answer: &Answer, params: &Params) -> String {
    evaluate(submission, answer, params).feedback
}

/// Projection of [`evaluate`] returning only the pass/fail verdict.
pub fn is_correct(submission: &RawFsa, answer: &Answer, params: &Params) -> bool {
    evaluate(submission, answer, params).is_correct
}

/// Projection of [`evaluate`] flattening the outcome into a simple string-keyed map, for callers
/// that want a loosely-typed result (e.g. rendering into an arbitrary template) without depending
/// on this crate's richer types.
pub fn evaluate_map(
    submission: &RawFsa,
    answer: &Answer,
    params: &Params,
) -> BTreeMap<&'static str, String> {
    let outcome = evaluate(submission, answer, params);
    let mut map = BTreeMap::new();
    map.insert("is_correct", outcome.is_correct.to_string());
    map.insert("feedback", outcome.feedback);
    map.insert(
        "score",
        outcome.score.map(|s| s.to_string()).unwrap_or_default(),
    );
    map.insert(
        "error_count",
        outcome.fsa_feedback.errors.len().to_string(),
    );
    map.insert(
        "warning_count",
        outcome.fsa_feedback.warnings.len().to_string(),
    );
    map
}

fn structural_info(fsa: &Fsa) -> StructuralInfo {
    let dfa = if fsa.is_deterministic() { fsa.clone() } else { determinize(fsa) };
    let minimized = minimize(&dfa);

    StructuralInfo {
        is_deterministic: fsa.is_deterministic(),
        is_complete: fsa.is_complete(),
        is_minimal: minimized.num_states() == fsa.num_states(),
        num_states: fsa.num_states(),
        num_transitions: fsa.num_transitions(),
        unreachable_states: find_unreachable_states(fsa)
            .into_iter()
            .map(|s| fsa.states()[s].name().to_string())
            .collect(),
        dead_states: find_dead_states(fsa)
            .into_iter()
            .map(|s| fsa.states()[s].name().to_string())
            .collect(),
    }
}

fn enforce_type_constraints(
    fsa: &Fsa,
    structural: &StructuralInfo,
    params: &Params,
    errors: &mut Vec<ValidationError>,
) {
    // A DFA is technically a valid NFA; spec.md leaves `ExpectedType::Nfa` unconstrained, so no
    // error is raised for it here. `ExpectedType::Dfa` against a non-deterministic submission is
    // handled below by the dedicated `NotDeterministic` push, rather than duplicated here as
    // `WrongAutomatonType` too (spec.md §6's slash notation names one code per violation, not
    // both at once).

    if params.check_completeness && structural.is_deterministic && !structural.is_complete {
        errors.push(
            ValidationError::new(
                ErrorCode::NotComplete,
                Severity::Error,
                "the automaton is missing a transition for at least one (state, symbol) pair",
            )
            .with_suggestion("add a transition for every symbol from every state, including an explicit trap state if needed"),
        );
    }
    if !structural.is_deterministic && params.expected_type == ExpectedType::Dfa {
        errors.push(ValidationError::new(
            ErrorCode::NotDeterministic,
            Severity::Error,
            "the automaton has a state with more than one transition on the same symbol, or an epsilon move",
        ));
    }
}

fn evaluate_against_test_cases(
    fsa: &Fsa,
    cases: &[TestCase],
    params: &Params,
    structural: StructuralInfo,
    warnings: Vec<ValidationError>,
) -> EvaluationOutcome {
    let results: Vec<TestResult> = cases
        .iter()
        .map(|case| {
            let refs: Vec<&str> = case.input.iter().map(String::as_str).collect();
            let actual = accepts(fsa, &refs);
            TestResult {
                input: case.input.clone(),
                expected: case.expected,
                actual,
                passed: actual == case.expected,
                trace: if params.verbosity == FeedbackVerbosity::Detailed {
                    trace(fsa, &refs)
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    let total = results.len().max(1);
    let passed = results.iter().filter(|r| r.passed).count();
    let pass_rate = passed as f64 / total as f64;

    let (is_correct, score) = match params.mode {
        EvaluationMode::Strict => (passed == results.len(), Some(pass_rate)),
        EvaluationMode::Lenient => (pass_rate >= 0.9, Some(pass_rate)),
        EvaluationMode::Partial => (passed == results.len(), Some(pass_rate)),
    };

    let summary = if results.is_empty() {
        "no test cases were provided".to_string()
    } else {
        format!("{passed}/{} test cases passed", results.len())
    };

    let test_errors: Vec<ValidationError> = results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| {
            ValidationError::new(
                ErrorCode::TestCaseFailed,
                Severity::Error,
                format!(
                    "on input {:?}, expected {} but got {}",
                    r.input, r.expected, r.actual
                ),
            )
            .with_highlight(Highlight::General)
        })
        .collect();

    EvaluationOutcome {
        is_correct,
        feedback: summary.clone(),
        score,
        fsa_feedback: FsaFeedback {
            summary,
            errors: test_errors,
            warnings,
            structural: Some(structural),
            language: None,
            test_results: results,
            hints: Vec::new(),
        },
    }
}

fn evaluate_against_reference(
    submission: &Fsa,
    reference_raw: &RawFsa,
    params: &Params,
    structural: StructuralInfo,
    mut warnings: Vec<ValidationError>,
    mut errors: Vec<ValidationError>,
) -> EvaluationOutcome {
    let (reference_errors, reference_fsa) = validate_and_build(reference_raw);
    let Some(reference) = reference_fsa else {
        errors.push(ValidationError::new(
            ErrorCode::EvaluationError,
            Severity::Error,
            "the reference automaton provided by the grader is itself not well-formed",
        ));
        return EvaluationOutcome {
            is_correct: false,
            feedback: "grading could not proceed: the reference automaton is invalid".into(),
            score: None,
            fsa_feedback: FsaFeedback {
                summary: "internal grading error".into(),
                errors,
                warnings,
                structural: Some(structural),
                language: None,
                test_results: Vec::new(),
                hints: Vec::new(),
            },
        };
    };
    warnings.extend(reference_errors.into_iter().filter(|e| e.severity != Severity::Error));

    let comparison = same_language(submission, &reference, params.max_test_length);

    let mut hints = Vec::new();
    if !comparison.are_equivalent {
        if params.show_counterexample {
            if let Some(counterexample) = &comparison.counterexample {
                hints.push(format!(
                    "try the input {counterexample:?} — your automaton and the reference disagree on it"
                ));
            }
        }
        // check_isomorphism requires reduced (determinized-then-minimized) DFAs on both sides
        // (spec.md §4.C8's precondition); `submission` may still be an NFA here since
        // ExpectedType::Any permits it.
        let reduced_mismatches = check_isomorphism(&reduce(submission), &reduce(&reference));
        errors.extend(reduced_mismatches.into_iter().filter(|e| e.severity == Severity::Error));
        if errors.is_empty() {
            errors.push(ValidationError::new(
                ErrorCode::LanguageMismatch,
                Severity::Error,
                "the submission accepts a different language than the reference automaton",
            ));
        }
    }

    let is_correct = comparison.are_equivalent;
    let score = if is_correct {
        Some(1.0)
    } else if params.mode == EvaluationMode::Partial {
        // spec.md §4.C10 step 6: score = 1 − min(1, difference_count/max_differences) on the
        // reference-FSA route.
        let differences =
            generate_difference_strings(submission, &reference, params.max_test_length, DEFAULT_MAX_DIFFERENCES);
        let fraction = differences.len() as f64 / DEFAULT_MAX_DIFFERENCES as f64;
        Some(1.0 - fraction.min(1.0))
    } else {
        Some(0.0)
    };
    let summary = if is_correct {
        "the submission accepts the same language as the reference automaton".to_string()
    } else {
        "the submission's language differs from the reference automaton".to_string()
    };

    EvaluationOutcome {
        is_correct,
        feedback: summary.clone(),
        score,
        fsa_feedback: FsaFeedback {
            summary,
            errors,
            warnings,
            structural: Some(structural),
            language: Some(comparison),
            test_results: Vec::new(),
            hints,
        },
    }
}

fn unsupported_answer_kind(structural: StructuralInfo, warnings: Vec<ValidationError>) -> EvaluationOutcome {
    let error = ValidationError::new(
        ErrorCode::EvaluationError,
        Severity::Error,
        "regex and grammar answer keys are not supported by this grading engine",
    );
    EvaluationOutcome {
        is_correct: false,
        feedback: "this answer kind cannot be graded".into(),
        score: None,
        fsa_feedback: FsaFeedback {
            summary: "unsupported answer kind".into(),
            errors: vec![error],
            warnings,
            structural: Some(structural),
            language: None,
            test_results: Vec::new(),
            hints: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTransition;

    fn triple(from: &str, symbol: &str, to: &str) -> RawTransition {
        RawTransition {
            from_state: from.into(),
            to_state: to.into(),
            symbol: symbol.into(),
        }
    }

    fn ends_with_a() -> RawFsa {
        RawFsa {
            states: vec!["q0".into(), "q1".into()],
            alphabet: vec!["a".into(), "b".into()],
            transitions: vec![
                triple("q0", "a", "q1"),
                triple("q0", "b", "q0"),
                triple("q1", "a", "q1"),
                triple("q1", "b", "q0"),
            ],
            initial_state: "q0".into(),
            accept_states: vec!["q1".into()],
        }
    }

    #[test]
    fn invalid_submission_is_never_correct() {
        let raw = RawFsa {
            states: vec![],
            alphabet: vec![],
            transitions: vec![],
            initial_state: "".into(),
            accept_states: vec![],
        };
        let outcome = evaluate(&raw, &Answer::TestCases(vec![]), &Params::default());
        assert!(!outcome.is_correct);
        assert!(!outcome.fsa_feedback.errors.is_empty());
    }

    #[test]
    fn correct_submission_passes_test_cases() {
        let submission = ends_with_a();
        let cases = vec![
            TestCase { input: vec!["a".into()], expected: true },
            TestCase { input: vec!["b".into()], expected: false },
            TestCase { input: vec!["b".into(), "a".into()], expected: true },
        ];
        let outcome = evaluate(&submission, &Answer::TestCases(cases), &Params::default());
        assert!(outcome.is_correct);
        assert_eq!(outcome.score, Some(1.0));
    }

    #[test]
    fn reference_fsa_mismatch_is_reported() {
        let submission = ends_with_a();
        let reference = RawFsa {
            states: vec!["q0".into()],
            alphabet: vec!["a".into(), "b".into()],
            transitions: vec![triple("q0", "a", "q0"), triple("q0", "b", "q0")],
            initial_state: "q0".into(),
            accept_states: vec![],
        };
        let outcome = evaluate(
            &submission,
            &Answer::ReferenceFsa(reference),
            &Params::default(),
        );
        assert!(!outcome.is_correct);
        assert!(outcome.fsa_feedback.language.is_some());
    }

    #[test]
    fn reference_fsa_mismatch_scores_partial_credit_by_difference_fraction() {
        let submission = ends_with_a();
        let reference = RawFsa {
            states: vec!["q0".into()],
            alphabet: vec!["a".into(), "b".into()],
            transitions: vec![triple("q0", "a", "q0"), triple("q0", "b", "q0")],
            initial_state: "q0".into(),
            accept_states: vec![],
        };
        let params = Params { mode: EvaluationMode::Partial, ..Params::default() };
        let outcome = evaluate(&submission, &Answer::ReferenceFsa(reference), &params);
        assert!(!outcome.is_correct);
        let score = outcome.score.expect("partial mode always scores");
        assert!(score > 0.0 && score < 1.0, "expected fractional credit, got {score}");
    }

    #[test]
    fn regex_answer_is_reported_unsupported() {
        let submission = ends_with_a();
        let outcome = evaluate(&submission, &Answer::Regex("a*".into()), &Params::default());
        assert!(!outcome.is_correct);
        assert_eq!(outcome.fsa_feedback.errors[0].code, ErrorCode::EvaluationError);
    }

    #[test]
    fn minimal_verbosity_drops_hints_and_truncates_test_results() {
        let submission = ends_with_a();
        let cases = vec![
            TestCase { input: vec!["a".into()], expected: false },
            TestCase { input: vec!["b".into()], expected: true },
            TestCase { input: vec!["b".into(), "a".into()], expected: false },
            TestCase { input: vec!["a".into(), "a".into()], expected: false },
        ];
        let params = Params {
            verbosity: FeedbackVerbosity::Minimal,
            check_minimality: true,
            ..Params::default()
        };
        let outcome = evaluate(&submission, &Answer::TestCases(cases), &params);
        assert!(outcome.fsa_feedback.hints.is_empty());
        assert!(outcome.fsa_feedback.test_results.len() <= MINIMAL_TEST_RESULT_LIMIT);
    }

    #[test]
    fn detailed_verbosity_keeps_traces() {
        let submission = ends_with_a();
        let cases = vec![TestCase { input: vec!["a".into()], expected: true }];
        let params = Params { verbosity: FeedbackVerbosity::Detailed, ..Params::default() };
        let outcome = evaluate(&submission, &Answer::TestCases(cases), &params);
        assert!(!outcome.fsa_feedback.test_results[0].trace.is_empty());
    }
}
