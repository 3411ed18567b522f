use crate::graph::{EdgeIx, GraphStructure, NetworkBuilder, NodeIx};
use crate::transition::{EdgeKey, Geometry, State};

use geo::{Distance, Haversine, Line, Point};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::fmt::{Debug, Formatter};

/// An edge reachable directly after another edge, meaning
/// it departs from the node the previous edge arrives at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Successor {
    pub edge: EdgeIx,
    pub target: NodeIx,
    pub weight: f64,
}

/// An immutable directed road network.
///
/// Constructed through the [`NetworkBuilder`], the only mutation
/// after construction is [`Network::subdivide`].
pub struct Network {
    pub(crate) graph: GraphStructure,
}

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Network with Nodes: {}, Edges: {}",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn position(&self, node: NodeIx) -> Option<Point> {
        self.graph.node_weight(node).map(|node| node.position)
    }

    /// The `(source, target)` nodes of an edge.
    #[inline]
    pub fn endpoints(&self, edge: EdgeIx) -> Option<(NodeIx, NodeIx)> {
        self.graph.edge_endpoints(edge)
    }

    #[inline]
    pub fn weight(&self, edge: EdgeIx) -> Option<f64> {
        self.graph.edge_weight(edge).map(|edge| edge.weight)
    }

    /// The straight segment between the source and target positions of the edge.
    #[inline]
    pub fn line(&self, edge: EdgeIx) -> Option<Line> {
        let (source, target) = self.endpoints(edge)?;
        Some(Line::new(self.position(source)?, self.position(target)?))
    }

    /// Great-circle length of the edge, in meters.
    pub fn length(&self, edge: EdgeIx) -> Option<f64> {
        let line = self.line(edge)?;
        Some(Haversine.distance(line.start_point(), line.end_point()))
    }

    /// Every edge in the network, in ascending index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.graph.edge_indices()
    }

    /// Edges leaving the node `edge` arrives at. Empty if the edge does not exist.
    pub fn successors(&self, edge: EdgeIx) -> impl Iterator<Item = Successor> + '_ {
        self.endpoints(edge)
            .into_iter()
            .flat_map(move |(_, target)| self.graph.edges_directed(target, Direction::Outgoing))
            .map(|reference| Successor {
                edge: reference.id(),
                target: reference.target(),
                weight: reference.weight().weight,
            })
    }

    /// The endpoint coordinate pair identifying an edge outside of this network.
    pub fn key(&self, edge: EdgeIx) -> Option<EdgeKey> {
        let line = self.line(edge)?;
        Some(EdgeKey {
            source: line.start_point(),
            target: line.end_point(),
        })
    }
}

impl Geometry for Network {
    fn geometry(&self, state: &State) -> Option<Line> {
        match state {
            State::Unknown => None,
            State::Edge(edge) => self.line(*edge),
        }
    }
}
