use crate::error::MatchError;
use crate::graph::Network;
use crate::transition::{EdgeKey, Observation, State};
use crate::util::geometry::project;

use geo::LineString;

/// An observation paired with the state it was decoded to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedObservation {
    pub observation: Observation,
    pub state: State,
    /// Inserted by the [`Interpolator`](crate::transition::Interpolator),
    /// rather than part of the raw trace.
    pub synthetic: bool,
}

impl MatchedObservation {
    /// The coordinate pair of the matched edge, if matched to one.
    pub fn edge_key(&self, network: &Network) -> Option<EdgeKey> {
        self.state.edge().and_then(|edge| network.key(edge))
    }
}

/// A fully decoded trace.
///
/// Every decoded step is kept, synthetic ones included. The accessors
/// without a qualifier only expose the raw observations, of which
/// there is exactly one state each.
#[derive(Clone, Debug, Default)]
pub struct MatchedTrace {
    steps: Vec<MatchedObservation>,
    raw: usize,
}

impl MatchedTrace {
    /// Collects decoded steps, given the trace held `raw` observations.
    pub fn new(steps: Vec<MatchedObservation>, raw: usize) -> Result<Self, MatchError> {
        let decoded = steps.iter().filter(|step| !step.synthetic).count();
        if decoded != raw {
            return Err(MatchError::LengthMismatch {
                expected: raw,
                actual: decoded,
            });
        }

        Ok(MatchedTrace { steps, raw })
    }

    /// The number of raw observations.
    pub fn len(&self) -> usize {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Every decoded step, including synthetic observations.
    pub fn all(&self) -> &[MatchedObservation] {
        &self.steps
    }

    pub fn observations(&self) -> impl Iterator<Item = &MatchedObservation> {
        self.steps.iter().filter(|step| !step.synthetic)
    }

    /// The decoded state of every raw observation, in order.
    pub fn states(&self) -> Vec<State> {
        self.observations().map(|step| step.state).collect()
    }

    pub fn edge_keys(&self, network: &Network) -> Vec<Option<EdgeKey>> {
        self.observations()
            .map(|step| step.edge_key(network))
            .collect()
    }

    /// The raw observations projected onto their matched edge. Those
    /// decoded as [`State::Unknown`] keep their recorded position.
    pub fn snapped(&self, network: &Network) -> LineString {
        self.observations()
            .map(|step| {
                let position = step.observation.position;
                match step.state.edge().and_then(|edge| network.line(edge)) {
                    Some(line) => project(&line, &position),
                    None => position,
                }
            })
            .collect()
    }
}
