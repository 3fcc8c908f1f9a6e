//! Automated structural validation, analysis, and correction-feedback engine for finite-state
//! automata.
//!
//! A submission arrives as a [`model::RawFsa`] — a plain 5-tuple with no guarantees about its
//! contents — and is pushed through a pipeline of independent stages, each its own module:
//!
//! 1. [`validate`] — structural well-formedness, collecting every violation rather than stopping
//!    at the first one.
//! 2. [`closure`] — epsilon-closure computation, shared by the simulator and the determinizer.
//! 3. [`eval`] — single-string simulation and tracing.
//! 4. [`determinize`] — subset construction.
//! 5. [`minimize`] — unreachable-state removal and Hopcroft partition refinement.
//! 6. [`graph`] — unreachable/dead-state analysis independent of determinism or minimality.
//! 7. [`isomorphism`] — structural comparison of two reduced DFAs.
//! 8. [`equivalence`] — language-equivalence orchestration, falling back to bounded string
//!    enumeration when a quick structural comparison cannot settle the question.
//! 9. [`pipeline`] — the top-level grading procedure tying every stage together.
//!
//! Every stage takes an immutable `&model::Fsa`/`&model::RawFsa` and returns freshly allocated
//! data; nothing in this crate mutates its input.

pub mod closure;
pub mod determinize;
pub mod equivalence;
pub mod eval;
pub mod graph;
pub mod isomorphism;
pub mod minimize;
pub mod model;
pub mod pipeline;
pub(crate) mod util;
pub mod validate;

pub use model::{Fsa, RawFsa, RawTransition};
pub use pipeline::{evaluate, evaluate_map, feedback, is_correct, Answer, Params};
