//! The bounded-lag Viterbi decoder.
//!
//! Rather than keeping the full trellis of a trace, the decoder keeps only
//! the probability of each live state ([`Probabilities`]) and the most recent
//! `constraint_length` states of the best path ending in it ([`Path`]). Once
//! the most likely path has filled this window, its head is final.

pub mod priors;
pub mod session;
pub mod viterbi;


#[doc(inline)]
pub use priors::Priors;
#[doc(inline)]
pub use session::*;
#[doc(inline)]
pub use viterbi::Viterbi;
