use crate::config::MatchConfig;
use crate::graph::{EdgeIx, Network, Successor};
use crate::transition::State;

use log::{debug, info};
use measure_time::debug_time;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
#[cfg(feature = "tracing")]
use tracing::Level;

/// The outgoing transitions of a single state, as `(to, probability)` pairs.
pub type Row = SmallVec<[(State, f64); 4]>;

/// The incoming transitions of a single state, keyed by the from-state.
pub type Incoming = FxHashMap<State, f64>;

/// The transition probabilities between [`State`]s.
///
/// Implementors must expose both directions of the same relation:
/// for every `(to, p)` in `outgoing(from)`, `incoming(to)[from] == p`.
pub trait TransitionModel {
    /// Every state of the model, in ascending order.
    fn states(&self) -> &[State];

    /// The states reachable from `from`, along with their probability.
    fn outgoing(&self, from: &State) -> &[(State, f64)];

    /// The states able to reach `to`, along with their probability.
    fn incoming(&self, to: &State) -> Option<&Incoming>;
}

/// The constants shaping a network-derived [`TransitionTable`].
#[derive(Clone, Copy, Debug)]
pub struct TransitionConstants {
    /// Remaining upon the same edge.
    pub own: f64,
    /// Falling from an edge into `unknown`.
    pub unknown: f64,
    /// Remaining `unknown`.
    pub unknown_unknown: f64,
    /// Reversing at an intersection.
    pub uturn: f64,
}

impl From<&MatchConfig> for TransitionConstants {
    fn from(config: &MatchConfig) -> Self {
        TransitionConstants {
            own: config.transition_self,
            unknown: config.transition_unknown,
            unknown_unknown: config.transition_unknown_unknown,
            uturn: config.transition_uturn,
        }
    }
}

impl Default for TransitionConstants {
    fn default() -> Self {
        TransitionConstants::from(&MatchConfig::default())
    }
}

/// An adjacency-map [`TransitionModel`].
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    states: Vec<State>,
    outgoing: FxHashMap<State, Row>,
    incoming: FxHashMap<State, Incoming>,
}

impl TransitionModel for TransitionTable {
    fn states(&self) -> &[State] {
        &self.states
    }

    fn outgoing(&self, from: &State) -> &[(State, f64)] {
        self.outgoing.get(from).map_or(&[], |row| row.as_slice())
    }

    fn incoming(&self, to: &State) -> Option<&Incoming> {
        self.incoming.get(to)
    }
}

impl TransitionTable {
    /// Builds a table from explicit rows of `(from, [(to, probability)])`.
    ///
    /// Duplicate transitions within a row are merged by summing their
    /// probability. States which only appear as a destination are
    /// still part of the model, with no outgoing transitions.
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = (State, R)>,
        R: IntoIterator<Item = (State, f64)>,
    {
        let rows = rows
            .into_iter()
            .map(|(from, row)| {
                let mut merged = Row::new();
                row.into_iter()
                    .for_each(|(to, probability)| push(&mut merged, to, probability));
                (from, merged)
            })
            .collect::<Vec<_>>();

        Self::assemble(rows)
    }

    /// Builds the table for every edge of the `network`.
    ///
    /// Each edge `E` transitions:
    /// - to itself with `own`,
    /// - to `unknown` with `unknown`,
    /// - to each successor which does not return to the origin of `E`,
    ///   with its share of the successors' total weight, scaled to the
    ///   remaining mass,
    /// - to its reverse twin with `uturn`, only if the node `E` arrives at
    ///   has more than two outgoing edges (a true intersection). If the
    ///   twin is the only way on (a dead end), it is treated as an
    ///   ordinary successor.
    ///
    /// When the successors carry no weight at all, the remaining mass falls
    /// into `unknown`. Every edge row therefore sums to 1.
    ///
    /// `unknown` remains itself with `unknown_unknown`, and spreads the
    /// remainder uniformly over every edge.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::INFO))]
    pub fn from_network(network: &Network, constants: TransitionConstants) -> Self {
        debug_time!("transition table construction");

        let edges = network.edges().collect::<Vec<EdgeIx>>();

        let mut rows = edges
            .par_iter()
            .map(|edge| (State::Edge(*edge), edge_row(network, *edge, &constants)))
            .collect::<Vec<_>>();

        rows.push((State::Unknown, unknown_row(&edges, &constants)));

        let table = Self::assemble(rows);
        info!(
            "Built transition table over {} states ({} edges)",
            table.len(),
            edges.len()
        );

        table
    }

    fn assemble(mut rows: Vec<(State, Row)>) -> Self {
        rows.sort_by_key(|(from, _)| *from);

        let mut states = rows
            .iter()
            .flat_map(|(from, row)| std::iter::once(*from).chain(row.iter().map(|(to, _)| *to)))
            .collect::<Vec<_>>();

        states.sort_unstable();
        states.dedup();

        let mut incoming: FxHashMap<State, Incoming> = FxHashMap::default();
        for (from, row) in &rows {
            for (to, probability) in row {
                *incoming.entry(*to).or_default().entry(*from).or_default() += probability;
            }
        }

        let outgoing = rows.into_iter().collect::<FxHashMap<_, _>>();
        debug!(
            "Assembled {} rows, {} reachable states",
            outgoing.len(),
            incoming.len()
        );

        TransitionTable {
            states,
            outgoing,
            incoming,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The probability of transitioning from `from` to `to` in one step.
    pub fn probability(&self, from: &State, to: &State) -> f64 {
        self.incoming(to)
            .and_then(|incoming| incoming.get(from))
            .copied()
            .unwrap_or(0.0)
    }

    /// The total outgoing probability of a state.
    pub fn row_sum(&self, from: &State) -> f64 {
        self.outgoing(from).iter().map(|(_, p)| p).sum()
    }
}

/// Appends a transition, merging it into an existing entry of the same state.
fn push(row: &mut Row, to: State, probability: f64) {
    if !(probability > 0.0) {
        return;
    }

    match row.iter_mut().find(|(state, _)| *state == to) {
        Some((_, existing)) => *existing += probability,
        None => row.push((to, probability)),
    }
}

fn edge_row(network: &Network, edge: EdgeIx, constants: &TransitionConstants) -> Row {
    let mut row = Row::new();
    let Some((origin, _)) = network.endpoints(edge) else {
        return row;
    };

    let successors = network.successors(edge).collect::<SmallVec<[Successor; 4]>>();
    let intersection = successors.len() > 2;

    let (reverse, forward): (SmallVec<[Successor; 4]>, SmallVec<[Successor; 4]>) = successors
        .into_iter()
        .partition(|successor| successor.target == origin);

    let mut remaining = (1.0 - constants.own - constants.unknown).max(0.0);
    let mut to_unknown = constants.unknown;

    let dead_end = forward.is_empty() && !reverse.is_empty() && !intersection;

    if intersection && !reverse.is_empty() {
        let uturn = constants.uturn.min(remaining);
        reverse.iter().for_each(|successor| {
            push(&mut row, State::Edge(successor.edge), uturn / reverse.len() as f64)
        });
        remaining -= uturn;
    }

    let neighbours = match dead_end {
        true => reverse.as_slice(),
        false => forward.as_slice(),
    };

    let total_weight = neighbours.iter().map(|successor| successor.weight).sum::<f64>();
    if total_weight > 0.0 {
        neighbours.iter().for_each(|successor| {
            let share = successor.weight / total_weight;
            push(&mut row, State::Edge(successor.edge), share * remaining);
        });
    } else {
        to_unknown += remaining;
    }

    push(&mut row, State::Edge(edge), constants.own);
    push(&mut row, State::Unknown, to_unknown);
    row
}

fn unknown_row(edges: &[EdgeIx], constants: &TransitionConstants) -> Row {
    if edges.is_empty() {
        return Row::from_elem((State::Unknown, 1.0), 1);
    }

    let share = (1.0 - constants.unknown_unknown) / edges.len() as f64;

    let mut row = Row::with_capacity(edges.len() + 1);
    row.push((State::Unknown, constants.unknown_unknown));
    row.extend(edges.iter().map(|edge| (State::Edge(*edge), share)));
    row
}
