use std::collections::HashSet;
use std::rc::Rc;

/// Checks whether two alphabets contain the same symbols, ignoring order.
#[inline]
pub(crate) fn alphabet_equal(a: &[Rc<str>], b: &[Rc<str>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let set1 = a.iter().collect::<HashSet<_>>();
    let set2 = b.iter().collect::<HashSet<_>>();
    set1 == set2
}

/// Converts a `HashSet` (not hashable/orderable) into a sorted `Vec`, which can be used as a
/// deterministic map key or for stable iteration order.
pub(crate) fn set_to_sorted_vec<T: Clone + Ord>(set: &HashSet<T>) -> Vec<T> {
    let mut vec = set.iter().cloned().collect::<Vec<_>>();
    vec.sort();
    vec
}

/// Names a subset-construction state canonically: a sorted, comma-separated list of the
/// original state names it contains, surrounded by braces (see `spec.md` §4.C4).
pub(crate) fn frozen_set_name(mut names: Vec<&str>) -> Rc<str> {
    names.sort_unstable();
    Rc::from(format!("{{{}}}", names.join(",")))
}

/// Names a minimized-DFA block canonically as `M<k>`, where `k` is the order in which the
/// block was first discovered by BFS from the initial block (`spec.md` §4.C5).
pub(crate) fn block_name(discovery_order: usize) -> Rc<str> {
    Rc::from(format!("M{discovery_order}"))
}
