use crate::error::MatchError;
use crate::transition::*;

use log::{debug, error};
use std::collections::VecDeque;

/// Streams a single trace through a [`Viterbi`] decoder.
///
/// Observations are [pushed](TraceSession::push) as they arrive. Each push
/// returns the observations whose state became final, lagging the input by
/// the constraint length. [`TraceSession::finish`] decides the remainder.
///
/// ```rust
/// use mapmatch::transition::*;
/// use mapmatch::{MatchConfig, NetworkBuilder, Observation};
/// use geo::Point;
///
/// let mut builder = NetworkBuilder::new();
/// let edges = builder.add_polyline([Point::new(0.0, 0.0), Point::new(0.001, 0.0)], 1.0)?;
/// let network = builder.build();
///
/// let config = MatchConfig::default().with_constraint_length(3);
/// let matcher = Matcher::new(&network, config)?;
/// let decoder = matcher.decoder()?;
///
/// let mut session = TraceSession::new(&decoder, Interpolator::new(200.0));
/// assert!(session.push(Observation::new(Point::new(0.0002, 0.0))).is_empty());
///
/// let matched = session.finish()?;
/// assert_eq!(matched[0].state, State::Edge(edges[0]));
/// # Ok::<(), mapmatch::Error>(())
/// ```
pub struct TraceSession<'v, 'a, T, C, E>
where
    T: TransitionModel,
    C: CandidateIndex,
    E: EmissionModel,
{
    decoder: &'v Viterbi<'a, T, C, E>,
    interpolator: Interpolator,
    session: Session,

    previous: Option<Observation>,
    /// Decoded, but not yet decided, as `(observation, synthetic)`.
    pending: VecDeque<(Observation, bool)>,
    fed: usize,
    decided: usize,
}

impl<'v, 'a, T, C, E> TraceSession<'v, 'a, T, C, E>
where
    T: TransitionModel,
    C: CandidateIndex,
    E: EmissionModel,
{
    pub fn new(decoder: &'v Viterbi<'a, T, C, E>, interpolator: Interpolator) -> Self {
        TraceSession {
            decoder,
            interpolator,
            session: decoder.session(),
            previous: None,
            pending: VecDeque::new(),
            fed: 0,
            decided: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Decodes the next raw observation, preceded by any synthetic
    /// observations bridging the hop from the previous one.
    pub fn push(&mut self, observation: Observation) -> Vec<MatchedObservation> {
        let synthetic = match &self.previous {
            Some(previous) => self.interpolator.between(previous, &observation),
            None => vec![],
        };

        if !synthetic.is_empty() {
            debug!("Bridging hop with {} synthetic observations", synthetic.len());
        }

        let mut decided = Vec::new();
        let feed = synthetic
            .into_iter()
            .map(|synthetic| (synthetic, true))
            .chain(std::iter::once((observation, false)));

        for (next, synthetic) in feed {
            self.pending.push_back((next, synthetic));
            self.fed += 1;

            if let Some(state) = self.decoder.step(&mut self.session, &next.position) {
                self.decided += 1;

                match self.pending.pop_front() {
                    Some((observation, synthetic)) => decided.push(MatchedObservation {
                        observation,
                        state,
                        synthetic,
                    }),
                    None => error!("Decision {state} has no pending observation"),
                }
            }
        }

        self.previous = Some(observation);
        decided
    }

    /// Decides every observation still pending, ending the trace.
    ///
    /// Fails if the decoder did not produce exactly one state for
    /// every observation it was fed.
    pub fn finish(self) -> Result<Vec<MatchedObservation>, MatchError> {
        let remaining = self.decoder.flush(&self.session);

        let actual = self.decided + remaining.len();
        if actual != self.fed || remaining.len() != self.pending.len() {
            error!(
                "Decoded {actual} states for {} observations, {} pending",
                self.fed,
                self.pending.len()
            );

            return Err(MatchError::LengthMismatch {
                expected: self.fed,
                actual,
            });
        }

        Ok(self
            .pending
            .into_iter()
            .zip(remaining)
            .map(|((observation, synthetic), state)| MatchedObservation {
                observation,
                state,
                synthetic,
            })
            .collect())
    }
}
