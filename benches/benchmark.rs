use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsa_grader::determinize::determinize;
use fsa_grader::equivalence::same_language;
use fsa_grader::minimize::minimize;
use fsa_grader::model::{RawFsa, RawTransition};
use fsa_grader::pipeline::{evaluate, Answer, Params, TestCase};
use fsa_grader::validate::validate_and_build;
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a (possibly non-deterministic) "chain with shortcuts" automaton over `{a, b}` with
/// `n` states: from each state, `a` advances to the next state and, every third state, also
/// loops back to a random earlier state (introducing non-determinism), while `b` stays put.
/// Large enough `n` exercises subset construction and minimization the way a real submission
/// accumulating dead branches and duplicate states would.
fn chain_automaton(n: usize, seed: u64) -> RawFsa {
    let mut rng = StdRng::seed_from_u64(seed);
    let states: Vec<String> = (0..n).map(|i| format!("q{i}")).collect();
    let mut transitions = Vec::new();

    for i in 0..n {
        let next = (i + 1) % n;
        transitions.push(RawTransition {
            from_state: states[i].clone(),
            to_state: states[next].clone(),
            symbol: "a".into(),
        });
        transitions.push(RawTransition {
            from_state: states[i].clone(),
            to_state: states[i].clone(),
            symbol: "b".into(),
        });
        if i % 3 == 0 && i > 0 {
            let shortcut = rng.gen_range(0..i);
            transitions.push(RawTransition {
                from_state: states[i].clone(),
                to_state: states[shortcut].clone(),
                symbol: "a".into(),
            });
        }
    }

    RawFsa {
        states: states.clone(),
        alphabet: vec!["a".into(), "b".into()],
        transitions,
        initial_state: states[0].clone(),
        accept_states: vec![states[n - 1].clone()],
    }
}

lazy_static! {
    static ref SMALL: RawFsa = chain_automaton(12, 1);
    static ref LARGE: RawFsa = chain_automaton(120, 2);
}

pub fn determinize_bench(c: &mut Criterion) {
    let (_, fsa) = validate_and_build(&LARGE);
    let fsa = fsa.unwrap();
    c.bench_function("determinize", |b| b.iter(|| determinize(black_box(&fsa))));
}

pub fn minimize_bench(c: &mut Criterion) {
    let (_, fsa) = validate_and_build(&LARGE);
    let dfa = determinize(&fsa.unwrap());
    c.bench_function("minimize", |b| b.iter(|| minimize(black_box(&dfa))));
}

pub fn equivalence_bench(c: &mut Criterion) {
    let (_, a) = validate_and_build(&SMALL);
    let (_, b) = validate_and_build(&chain_automaton(12, 1));
    let a = a.unwrap();
    let b = b.unwrap();
    c.bench_function("same_language", |bencher| {
        bencher.iter(|| same_language(black_box(&a), black_box(&b), 5))
    });
}

pub fn evaluate_bench(c: &mut Criterion) {
    let cases: Vec<TestCase> = (0..20)
        .map(|i| TestCase {
            input: vec!["a".to_string(); i],
            expected: i % 12 == 11,
        })
        .collect();
    let params = Params::default();
    c.bench_function("evaluate against test cases", |b| {
        b.iter(|| evaluate(black_box(&SMALL), black_box(&Answer::TestCases(cases.clone())), &params))
    });
}

criterion_group!(
    benches,
    determinize_bench,
    minimize_bench,
    equivalence_bench,
    evaluate_bench
);
criterion_main!(benches);
