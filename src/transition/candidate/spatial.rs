use crate::transition::{CandidateIndex, Geometry, State};
use crate::util::geometry::{envelope_around, envelope_of};

use geo::Point;
use itertools::{Either, Itertools};
use log::{debug, info};
use measure_time::debug_time;
use rstar::{RTree, RTreeObject, AABB};

/// A state paired with the bounding box of its geometry.
#[derive(Clone, Copy, Debug)]
pub struct LocatedState {
    pub state: State,
    envelope: AABB<Point>,
}

impl RTreeObject for LocatedState {
    type Envelope = AABB<Point>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A [`CandidateIndex`] backed by an R-tree over the bounding box of
/// every state's geometry.
///
/// Queries return the states whose box intersects the box spanning the
/// search radius around the observation, plus every state without a
/// geometry, so `unknown` is always a candidate.
pub struct SpatialIndex {
    tree: RTree<LocatedState>,
    unlocated: Vec<State>,
}

impl SpatialIndex {
    pub fn new<G: Geometry>(states: &[State], geometry: &G) -> Self {
        debug_time!("spatial index construction");

        let (located, unlocated): (Vec<_>, Vec<_>) = states
            .iter()
            .partition_map(|state| match geometry.geometry(state) {
                Some(line) => Either::Left(LocatedState {
                    state: *state,
                    envelope: envelope_of(&line),
                }),
                None => Either::Right(*state),
            });

        let tree = RTree::bulk_load(located);
        info!(
            "Indexed {} located states, {} without geometry",
            tree.size(),
            unlocated.len()
        );

        SpatialIndex { tree, unlocated }
    }

    pub fn len(&self) -> usize {
        self.tree.size() + self.unlocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The states which are always returned, lacking any geometry.
    pub fn unlocated(&self) -> &[State] {
        &self.unlocated
    }
}

impl CandidateIndex for SpatialIndex {
    fn query(&self, observation: &Point, radius: f64) -> Vec<State> {
        let envelope = envelope_around(observation, radius);

        let candidates = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|located| located.state)
            .chain(self.unlocated.iter().copied())
            .collect::<Vec<_>>();

        debug!(
            "Found {} candidates within {radius}m of {:?}",
            candidates.len(),
            observation.x_y()
        );

        candidates
    }
}
