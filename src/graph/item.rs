use geo::Point;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};

pub type NodeIx = NodeIndex<u32>;
pub type EdgeIx = EdgeIndex<u32>;

/// A node within the road network, positioned in longitude/latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: Point,
}

impl Node {
    pub const fn new(position: Point) -> Self {
        Self { position }
    }
}

/// A directed edge within the road network.
///
/// The [weight](#field.weight) is the relative traffic share of the edge,
/// it is used to split the probability of leaving an edge amongst its
/// successors. It does not represent a traversal cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub weight: f64,
}

impl Edge {
    pub const fn new(weight: f64) -> Self {
        Self { weight }
    }
}

pub type GraphStructure = StableDiGraph<Node, Edge>;
