use crate::error::MatchError;
use crate::transition::State;

use rustc_hash::FxHashMap;

/// The distribution a decoder starts from, and returns to when every
/// hypothesis has been ruled out.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Priors {
    /// Equal mass over every state of the transition model.
    #[default]
    Uniform,

    /// Mass over the given states only. Weights are normalised and
    /// duplicate states are merged.
    Explicit(Vec<(State, f64)>),
}

impl Priors {
    /// All mass on [`State::Unknown`].
    pub fn unknown() -> Self {
        Priors::Explicit(vec![(State::Unknown, 1.0)])
    }

    /// Resolves the priors over the states of a model into a normalised
    /// distribution, ordered by state.
    pub fn resolve(&self, states: &[State]) -> Result<Vec<(State, f64)>, MatchError> {
        match self {
            Priors::Uniform => {
                if states.is_empty() {
                    return Err(MatchError::EmptyModel);
                }

                let share = 1.0 / states.len() as f64;
                let mut resolved = states
                    .iter()
                    .map(|state| (*state, share))
                    .collect::<Vec<_>>();

                resolved.sort_unstable_by_key(|(state, _)| *state);
                resolved.dedup_by_key(|(state, _)| *state);
                Ok(resolved)
            }
            Priors::Explicit(weights) => {
                if weights
                    .iter()
                    .any(|(_, weight)| !weight.is_finite() || *weight < 0.0)
                {
                    return Err(MatchError::InvalidPriors);
                }

                let mut merged: FxHashMap<State, f64> = FxHashMap::default();
                for (state, weight) in weights.iter().filter(|(_, weight)| *weight > 0.0) {
                    *merged.entry(*state).or_default() += weight;
                }

                let total = merged.values().sum::<f64>();
                if !(total > 0.0 && total.is_finite()) {
                    return Err(MatchError::InvalidPriors);
                }

                let mut resolved = merged
                    .into_iter()
                    .map(|(state, weight)| (state, weight / total))
                    .collect::<Vec<_>>();

                resolved.sort_unstable_by_key(|(state, _)| *state);
                Ok(resolved)
            }
        }
    }
}
