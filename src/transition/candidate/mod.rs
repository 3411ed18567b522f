//! Candidates are the states worth evaluating for a single observation.
//!
//! Scoring every state of a large network for every observation is
//! wasteful, since almost all of them lie far from it. A [`CandidateIndex`]
//! narrows the set beforehand. It may over-approximate freely, the
//! emission model makes the final call, so false positives only cost
//! extra evaluations.

pub mod spatial;


#[doc(inline)]
pub use spatial::*;

use crate::transition::{State, TransitionModel};
use geo::Point;

pub trait CandidateIndex {
    /// The states which may have produced `observation`, given
    /// it was recorded at most `radius` meters from its state.
    fn query(&self, observation: &Point, radius: f64) -> Vec<State>;
}

/// Every state is a candidate, suitable for small models.
#[derive(Clone, Copy, Debug)]
pub struct AllStates<'a> {
    states: &'a [State],
}

impl<'a> AllStates<'a> {
    pub fn new(states: &'a [State]) -> Self {
        Self { states }
    }

    pub fn of<T: TransitionModel>(model: &'a T) -> Self {
        Self::new(model.states())
    }
}

impl CandidateIndex for AllStates<'_> {
    fn query(&self, _observation: &Point, _radius: f64) -> Vec<State> {
        self.states.to_vec()
    }
}
