use crate::graph::EdgeIx;

use geo::{Line, Point};
use std::fmt::{Display, Formatter};

/// A hidden state of the model.
///
/// Either the vehicle is travelling along a directed [edge](State::Edge)
/// of the network, or its whereabouts are [unknown](State::Unknown).
///
/// States are totally ordered, `Unknown` sorting before every edge and
/// edges sorting by index. This order breaks every tie in the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    Unknown,
    Edge(EdgeIx),
}

impl State {
    #[inline]
    pub const fn edge(&self) -> Option<EdgeIx> {
        match self {
            State::Unknown => None,
            State::Edge(edge) => Some(*edge),
        }
    }

    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, State::Unknown)
    }
}

impl From<EdgeIx> for State {
    fn from(edge: EdgeIx) -> Self {
        State::Edge(edge)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Unknown => write!(f, "unknown"),
            State::Edge(edge) => write!(f, "edge#{}", edge.index()),
        }
    }
}

/// The endpoint coordinates of an edge. Consumers which do not share the
/// in-memory network identify matched edges by this pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeKey {
    pub source: Point,
    pub target: Point,
}

impl EdgeKey {
    pub fn line(&self) -> Line {
        Line::new(self.source, self.target)
    }
}

impl Display for EdgeKey {
    /// Rendered as `lat lng lat lng`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.source.y(),
            self.source.x(),
            self.target.y(),
            self.target.x()
        )
    }
}

/// Resolves the geometry of a state.
///
/// States without a geometry, such as [`State::Unknown`], are never
/// excluded spatially and are scored by the emission model alone.
pub trait Geometry {
    fn geometry(&self, state: &State) -> Option<Line>;
}
