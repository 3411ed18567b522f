use crate::config::MatchConfig;
use crate::error::{Error, MatchError};
use crate::transition::solver::session::better;
use crate::transition::*;

use geo::Point;
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
#[cfg(feature = "tracing")]
use tracing::Level;
use wkt::ToWkt;

/// Decodes observations one at a time against a read-only model.
///
/// The decoder holds no per-trace state, so a single instance may serve
/// any number of [`Session`]s, across threads if the model allows it.
///
/// ```rust
/// use mapmatch::transition::*;
/// use mapmatch::MatchConfig;
/// use geo::Point;
///
/// // A two-state model where the observation always favours `unknown`.
/// let table = TransitionTable::from_rows([(State::Unknown, vec![(State::Unknown, 1.0)])]);
/// let candidates = AllStates::of(&table);
/// let emission = |_: &State, _: &Point| 1.0;
///
/// let config = MatchConfig::default().with_constraint_length(2);
/// let viterbi = Viterbi::new(&table, &candidates, &emission, &config)?;
///
/// let mut session = viterbi.session();
/// assert_eq!(viterbi.step(&mut session, &Point::new(0.0, 0.0)), None);
/// assert_eq!(viterbi.step(&mut session, &Point::new(0.0, 0.0)), Some(State::Unknown));
/// assert_eq!(viterbi.flush(&session), vec![State::Unknown]);
/// # Ok::<(), mapmatch::Error>(())
/// ```
pub struct Viterbi<'a, T, C, E>
where
    T: TransitionModel,
    C: CandidateIndex,
    E: EmissionModel,
{
    transitions: &'a T,
    candidates: &'a C,
    emission: &'a E,

    priors: Vec<(State, f64)>,
    constraint_length: usize,
    eviction_threshold: f64,
    search_radius: f64,
}

impl<'a, T, C, E> Viterbi<'a, T, C, E>
where
    T: TransitionModel,
    C: CandidateIndex,
    E: EmissionModel,
{
    /// Creates a decoder starting from [uniform](Priors::Uniform) priors.
    pub fn new(
        transitions: &'a T,
        candidates: &'a C,
        emission: &'a E,
        config: &MatchConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        Ok(Viterbi {
            transitions,
            candidates,
            emission,
            priors: Priors::Uniform.resolve(transitions.states())?,
            constraint_length: config.constraint_length,
            eviction_threshold: config.eviction_threshold,
            search_radius: config.search_radius,
        })
    }

    pub fn with_priors(self, priors: &Priors) -> Result<Self, MatchError> {
        Ok(Viterbi {
            priors: priors.resolve(self.transitions.states())?,
            ..self
        })
    }

    pub fn priors(&self) -> &[(State, f64)] {
        &self.priors
    }

    pub fn constraint_length(&self) -> usize {
        self.constraint_length
    }

    /// A fresh session, positioned at the priors.
    pub fn session(&self) -> Session {
        Session::new(&self.priors)
    }

    /// Advances the session by one observation.
    ///
    /// Returns the decision made final by this step: the head of the most
    /// likely path, once that path spans `constraint_length` steps. The
    /// `n`-th returned decision belongs to the `n`-th observation.
    ///
    /// If no candidate can explain the observation, the session returns to
    /// the priors and carries on from there.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::DEBUG))]
    pub fn step(&self, session: &mut Session, observation: &Point) -> Option<State> {
        let mut candidates = self.candidates.query(observation, self.search_radius);
        candidates.sort_unstable();
        candidates.dedup();

        let previous = &session.probabilities;
        let mut probabilities = Probabilities::default();
        let mut paths: FxHashMap<State, Path> = FxHashMap::default();

        for to in candidates {
            let emission = self.emission.emission(&to, observation);
            if !(emission > 0.0) {
                continue;
            }

            let Some(incoming) = self.transitions.incoming(&to) else {
                continue;
            };

            // Walk whichever of the two sides is smaller.
            let best = match incoming.len() < previous.len() {
                true => incoming
                    .iter()
                    .filter_map(|(from, transition)| {
                        let probability = previous.get(from).filter(|p| **p > 0.0)?;
                        Some((*from, probability * emission * transition))
                    })
                    .fold(None, better),
                false => previous
                    .iter()
                    .filter(|(_, probability)| **probability > 0.0)
                    .filter_map(|(from, probability)| {
                        let transition = incoming.get(from)?;
                        Some((*from, probability * emission * transition))
                    })
                    .fold(None, better),
            };

            let Some((from, score)) = best else {
                continue;
            };

            trace!("{to} reached from {from} scoring {score:e}");

            let mut path = session.paths.get(&from).cloned().unwrap_or_default();
            self.extend(&mut path, to);

            probabilities.insert(to, score);
            paths.insert(to, path);
        }

        let total = probabilities.values().sum::<f64>();
        if !(total > 0.0 && total.is_finite()) {
            warn!(
                "No state explains observation {} at step {}, returning to priors",
                observation.wkt_string(),
                session.steps
            );

            let recovered = session.best_path().cloned().unwrap_or_default();
            paths = self
                .priors
                .iter()
                .map(|(state, _)| {
                    let mut path = recovered.clone();
                    self.extend(&mut path, *state);
                    (*state, path)
                })
                .collect();

            probabilities = self.priors.iter().copied().collect();
            session.recoveries += 1;
        } else {
            normalize(&mut probabilities, total);
        }

        // The most likely state outlives eviction, so V is never emptied.
        let kept = probabilities
            .iter()
            .map(|(state, probability)| (*state, *probability))
            .fold(None, better)
            .map(|(state, _)| state);

        let live = probabilities.len();
        probabilities.retain(|state, probability| {
            *probability >= self.eviction_threshold || Some(*state) == kept
        });
        if probabilities.len() < live {
            paths.retain(|state, _| probabilities.contains_key(state));
            let total = probabilities.values().sum::<f64>();
            normalize(&mut probabilities, total);
        }

        session.probabilities = probabilities;
        session.paths = paths;
        session.steps += 1;

        debug!(
            "Step {} holds {} live states, most likely {:?}",
            session.steps,
            session.probabilities.len(),
            session.most_likely()
        );

        session
            .best_path()
            .filter(|path| path.len() == self.constraint_length)
            .and_then(|path| path.front().copied())
    }

    /// The decisions not yet made final by [`Viterbi::step`], which belong
    /// to the most recent observations of the session.
    ///
    /// Together with the decisions returned by every step, this yields
    /// exactly one state per observation.
    pub fn flush(&self, session: &Session) -> Vec<State> {
        let Some(path) = session.best_path() else {
            return vec![];
        };

        // The head was already returned by the last step.
        let decided = match path.len() == self.constraint_length {
            true => 1,
            false => 0,
        };

        path.iter().skip(decided).copied().collect()
    }

    /// Appends a state to a path, keeping it within the constraint length.
    fn extend(&self, path: &mut Path, state: State) {
        while path.len() >= self.constraint_length {
            path.pop_front();
        }

        path.push_back(state);
    }
}

fn normalize(probabilities: &mut Probabilities, total: f64) {
    if total > 0.0 {
        probabilities
            .values_mut()
            .for_each(|probability| *probability /= total);
    }
}
