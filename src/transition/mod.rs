//! A Hidden-Markov-Model (HMM) matching
//! transition module that allows for
//! matching raw data to an underlying
//! network.
//!
//! The model is made of three read-only parts, built once per network:
//!
//! - a [`TransitionModel`], describing how likely the vehicle moves from
//!   one [`State`] to the next between observations,
//! - an [`EmissionModel`], describing how likely an observation was
//!   recorded from a given state,
//! - a [`CandidateIndex`], narrowing the states worth evaluating per observation.
//!
//! A [`Viterbi`] decoder drives these one observation at a time, holding only a
//! bounded history per live state inside a [`Session`]. The [`TraceSession`]
//! feeds it a raw trace, resampling long hops, and the [`Matcher`] ties it all
//! together for a [`Network`](crate::Network).

pub mod candidate;
pub mod costing;
pub mod matcher;
pub mod solver;
pub mod state;
pub mod trip;

#[cfg(test)]
mod test;

// Re-Exports
#[doc(inline)]
pub use candidate::*;
#[doc(inline)]
pub use costing::*;
#[doc(inline)]
pub use matcher::Matcher;
#[doc(inline)]
pub use solver::*;
#[doc(inline)]
pub use state::*;
#[doc(inline)]
pub use trip::*;
