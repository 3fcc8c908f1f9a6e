//! Minimizer (`spec.md` §4.C5): reduces a deterministic, epsilon-free [`Fsa`] to its minimal
//! equivalent form.
//!
//! Two phases, mirroring `dandy::dfa::Dfa::minimize`'s structure: first unreachable states are
//! dropped (a plain BFS from the initial state), then the remaining states are partitioned by
//! Hopcroft's algorithm. Unlike `dandy`, which numbers the resulting blocks by the smallest
//! original state id they contain, `spec.md` §4.C5 mandates naming each block `M<k>` in the order
//! blocks are first discovered by BFS from the initial block — implemented here via
//! [`crate::util::block_name`].

use crate::model::{Fsa, FsaState};
use crate::util::block_name;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Minimizes `dfa`. Panics in debug builds (via `debug_assert`) if `dfa` is not deterministic or
/// contains epsilon moves — callers are expected to run [`crate::determinize::determinize`] first
/// (`spec.md` §4.C5's precondition). Idempotent: minimizing an already-minimal automaton returns
/// an isomorphic copy (`spec.md` §8, invariant #2).
pub fn minimize(dfa: &Fsa) -> Fsa {
    debug_assert!(dfa.is_deterministic(), "minimize requires a deterministic input");
    debug_assert!(!dfa.has_epsilon_moves(), "minimize requires an epsilon-free input");

    let reachable = reachable_states(dfa);
    let partition = hopcroft_partition(dfa, &reachable);
    build_quotient(dfa, &reachable, &partition)
}

/// BFS forward reachability from the initial state (`spec.md` §4.C6's `find_unreachable_states`,
/// reused here as minimization's first phase).
fn reachable_states(fsa: &Fsa) -> HashSet<usize> {
    let mut seen = HashSet::new();
    seen.insert(fsa.initial_state_index());
    let mut queue = VecDeque::from([fsa.initial_state_index()]);
    while let Some(s) = queue.pop_front() {
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

/// Hopcroft partition refinement restricted to `reachable`. Returns, for each reachable state
/// index, the index of the block it ends up in, plus the blocks themselves in discovery order
/// from the initial state.
///
/// A missing `(state, symbol)` transition is treated, for distinguishability purposes, as if it
/// led to an implicit non-accepting "trap" (`spec.md` §4.C7: the simulator's configuration becomes
/// empty and stays empty on an undefined transition, which is not a no-op for equivalence — two
/// otherwise-identical accepting states can still be distinguished by one of them lacking a
/// transition the other has). `TRAP` is a synthetic, non-real state id used only to carry this
/// through the initial partition and refinement; it is stripped out before the blocks are
/// returned, so it never reaches [`build_quotient`].
fn hopcroft_partition(fsa: &Fsa, reachable: &HashSet<usize>) -> Vec<HashSet<usize>> {
    let alphabet_len = fsa.alphabet().len();
    const TRAP: usize = usize::MAX;

    let has_missing_transition = reachable
        .iter()
        .any(|&s| (0..alphabet_len).any(|sym| fsa.succ(s, sym).is_empty()));

    let (accepting, mut non_accepting): (HashSet<usize>, HashSet<usize>) = reachable
        .iter()
        .copied()
        .partition(|&s| fsa.is_accepting_state(s));
    if has_missing_transition {
        non_accepting.insert(TRAP);
    }

    let mut partition: Vec<HashSet<usize>> = vec![accepting, non_accepting]
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    // Worklist seeded with the smaller of the two initial blocks, per Hopcroft's algorithm. When
    // only one block exists (e.g. every reachable state is accepting), it still needs to be
    // checked against itself: with `TRAP` folded in above, or even without it, a single starting
    // block is not necessarily already stable once partiality is in play.
    let mut worklist: Vec<HashSet<usize>> = if partition.len() == 2 {
        if partition[0].len() <= partition[1].len() {
            vec![partition[0].clone()]
        } else {
            vec![partition[1].clone()]
        }
    } else {
        partition.clone()
    };

    // Precompute reverse transitions: for each (symbol, target) pair, which states lead into it.
    // A state with no transition on a symbol is recorded as leading into `TRAP` on that symbol.
    let mut predecessors: Vec<HashMap<usize, Vec<usize>>> = vec![HashMap::new(); alphabet_len];
    for &s in reachable {
        for sym_idx in 0..alphabet_len {
            match fsa.succ(s, sym_idx).first().copied() {
                Some(t) if reachable.contains(&t) => {
                    predecessors[sym_idx].entry(t).or_default().push(s);
                }
                None if has_missing_transition => {
                    predecessors[sym_idx].entry(TRAP).or_default().push(s);
                }
                _ => {}
            }
        }
    }

    while let Some(splitter) = worklist.pop() {
        for sym_idx in 0..alphabet_len {
            let mut into_splitter: HashSet<usize> = HashSet::new();
            for &t in &splitter {
                if let Some(preds) = predecessors[sym_idx].get(&t) {
                    into_splitter.extend(preds.iter().copied());
                }
            }
            if into_splitter.is_empty() {
                continue;
            }

            let mut next_partition = Vec::with_capacity(partition.len());
            for block in partition.drain(..) {
                let (inside, outside): (HashSet<usize>, HashSet<usize>) =
                    block.iter().copied().partition(|s| into_splitter.contains(s));
                if inside.is_empty() || outside.is_empty() {
                    next_partition.push(block);
                    continue;
                }
                // Replace a block already queued for refinement with both halves; otherwise
                // queue the smaller half.
                if let Some(pos) = worklist.iter().position(|w| *w == block) {
                    worklist.remove(pos);
                    worklist.push(inside.clone());
                    worklist.push(outside.clone());
                } else if inside.len() <= outside.len() {
                    worklist.push(inside.clone());
                } else {
                    worklist.push(outside.clone());
                }
                next_partition.push(inside);
                next_partition.push(outside);
            }
            partition = next_partition;
        }
    }

    // TRAP only existed to make missing transitions distinguishable during refinement; it is not
    // a real state and must not reach the quotient construction.
    let partition: Vec<HashSet<usize>> = partition
        .into_iter()
        .filter_map(|mut block| {
            block.remove(&TRAP);
            (!block.is_empty()).then_some(block)
        })
        .collect();

    order_blocks_by_bfs_discovery(fsa, partition)
}

/// Reorders `blocks` so that the block containing the initial state comes first, and subsequent
/// blocks are ordered by BFS discovery from it over the quotient transition graph (`spec.md`
/// §4.C5's canonical `M<k>` naming rule).
fn order_blocks_by_bfs_discovery(fsa: &Fsa, blocks: Vec<HashSet<usize>>) -> Vec<HashSet<usize>> {
    let block_of = |state: usize, blocks: &[HashSet<usize>]| -> usize {
        blocks.iter().position(|b| b.contains(&state)).expect("state must belong to some block")
    };

    let start_block = block_of(fsa.initial_state_index(), &blocks);
    let mut order = vec![start_block];
    let mut seen = HashSet::from([start_block]);
    let mut queue = VecDeque::from([start_block]);

    while let Some(block_idx) = queue.pop_front() {
        let representative = *blocks[block_idx].iter().next().expect("block is non-empty");
        for sym_idx in 0..fsa.alphabet().len() {
            for &t in fsa.succ(representative, sym_idx) {
                let target_block = block_of(t, &blocks);
                if seen.insert(target_block) {
                    order.push(target_block);
                    queue.push_back(target_block);
                }
            }
        }
    }
    // Any block unreachable from the initial block in the quotient graph (shouldn't occur once
    // unreachable states were already dropped, but kept for robustness) is appended last.
    for idx in 0..blocks.len() {
        if seen.insert(idx) {
            order.push(idx);
        }
    }

    order.into_iter().map(|idx| blocks[idx].clone()).collect()
}

fn build_quotient(dfa: &Fsa, reachable: &HashSet<usize>, partition: &[HashSet<usize>]) -> Fsa {
    let block_of: HashMap<usize, usize> = partition
        .iter()
        .enumerate()
        .flat_map(|(block_idx, block)| block.iter().map(move |&s| (s, block_idx)))
        .collect();

    let alphabet = dfa.alphabet().to_vec();
    let alphabet: Rc<[Rc<str>]> = Rc::from(alphabet.into_boxed_slice());

    let states: Vec<FsaState> = partition
        .iter()
        .enumerate()
        .map(|(k, block)| {
            let representative = *block.iter().next().expect("block is non-empty");
            let accepting = dfa.is_accepting_state(representative);
            let mut transitions = vec![Vec::new(); alphabet.len()];
            for sym_idx in 0..alphabet.len() {
                if let Some(&t) = dfa.succ(representative, sym_idx).first() {
                    if reachable.contains(&t) {
                        transitions[sym_idx] = vec![block_of[&t]];
                    }
                }
            }
            let _ = k;
            FsaState {
                name: block_name(k),
                accepting,
                epsilon_transitions: Vec::new(),
                transitions,
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
