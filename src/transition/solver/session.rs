use crate::transition::State;

use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// The normalised probability of every live state.
pub type Probabilities = FxHashMap<State, f64>;

/// The most recent states of the best path ending in a live state,
/// oldest first.
pub type Path = VecDeque<State>;

/// The decoding state of a single trace.
///
/// Holds `V` (the [`Probabilities`]) and `P` (a [`Path`] per live state).
/// Obtained from [`Viterbi::session`](crate::transition::Viterbi::session),
/// and advanced by [`Viterbi::step`](crate::transition::Viterbi::step).
///
/// A session belongs to one trace only. Matching another trace
/// requires a fresh session, whereas the decoder itself is shared.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub(crate) probabilities: Probabilities,
    pub(crate) paths: FxHashMap<State, Path>,
    pub(crate) steps: usize,
    pub(crate) recoveries: usize,
}

impl Session {
    pub(crate) fn new(priors: &[(State, f64)]) -> Self {
        Session {
            probabilities: priors.iter().copied().collect(),
            ..Session::default()
        }
    }

    pub fn probabilities(&self) -> &Probabilities {
        &self.probabilities
    }

    pub fn path(&self, state: &State) -> Option<&Path> {
        self.paths.get(state)
    }

    /// Number of observations decoded so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of steps which ruled out every hypothesis, and fell back to the priors.
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }

    /// The most probable live state, the lowest state winning a tie.
    pub fn most_likely(&self) -> Option<(State, f64)> {
        self.probabilities
            .iter()
            .map(|(state, probability)| (*state, *probability))
            .fold(None, better)
    }

    /// The path ending in the [most likely](Session::most_likely) state.
    pub fn best_path(&self) -> Option<&Path> {
        self.most_likely()
            .and_then(|(state, _)| self.paths.get(&state))
    }
}

/// Picks the higher scoring of two candidates. On equal scores the
/// lower state is kept, so the outcome never depends on iteration order.
#[inline]
pub(crate) fn better(best: Option<(State, f64)>, candidate: (State, f64)) -> Option<(State, f64)> {
    match best {
        Some((state, score))
            if score > candidate.1 || (score == candidate.1 && state < candidate.0) =>
        {
            Some((state, score))
        }
        _ => Some(candidate),
    }
}
