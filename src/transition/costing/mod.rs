//! The probabilistic heart of the model.
//!
//! ## Structure
//! The decoder is generic over two capabilities, so alternative HMM
//! constructions can be substituted without touching it:
//!
//! - [`TransitionModel`]
//!     The likelihood of moving between two states in one step. Exposes
//!     both directions of the adjacency so the decoder only enumerates the
//!     states able to reach a candidate.
//!
//! - [`EmissionModel`]
//!     The likelihood an observation was recorded from a state.
//!
//! ### Default Models:
//! - [`TransitionTable`]: Built from a [`Network`](crate::Network) topology and edge weights.
//! - [`DistanceEmission`]: Gaussian fall-off of the distance to the edge.
//!
//! ### Creating your own model
//!
//! ```rust
//! use geo::Point;
//! use mapmatch::transition::{EmissionModel, State};
//!
//! struct Indifferent;
//!
//! impl EmissionModel for Indifferent {
//!     fn emission(&self, _state: &State, _observation: &Point) -> f64 {
//!         1.0
//!     }
//! }
//! ```
#[doc(hidden)]
pub mod emission;
#[doc(hidden)]
pub mod transition;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use emission::*;
#[doc(inline)]
pub use transition::*;
