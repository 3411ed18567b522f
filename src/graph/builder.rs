use crate::error::GraphError;
use crate::graph::{Edge, EdgeIx, GraphStructure, Network, Node, NodeIx};

use geo::Point;
use log::info;

/// The construction context of a [`Network`].
///
/// The builder owns the arena every identifier is allocated from, nodes
/// and edges are only ever referenced by the [`NodeIx`] and [`EdgeIx`]
/// values it returns.
///
/// ```rust
/// use geo::Point;
/// use mapmatch::NetworkBuilder;
///
/// let mut builder = NetworkBuilder::default();
/// let a = builder.add_node(Point::new(151.2000, -33.8800)).unwrap();
/// let b = builder.add_node(Point::new(151.2010, -33.8800)).unwrap();
///
/// // A two-way road, as a pair of directed edges.
/// let (forward, backward) = builder.add_road(a, b, 1.0).unwrap();
///
/// let network = builder.build();
/// assert_eq!(network.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    graph: GraphStructure,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node at the given longitude/latitude position.
    pub fn add_node(&mut self, position: Point) -> Result<NodeIx, GraphError> {
        if !(position.x().is_finite() && position.y().is_finite()) {
            return Err(GraphError::InvalidCoordinate(position));
        }

        Ok(self.graph.add_node(Node::new(position)))
    }

    /// Allocates a directed edge from `source` to `target`.
    pub fn add_edge(
        &mut self,
        source: NodeIx,
        target: NodeIx,
        weight: f64,
    ) -> Result<EdgeIx, GraphError> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(GraphError::InvalidWeight(weight));
        }

        for node in [source, target] {
            if !self.graph.contains_node(node) {
                return Err(GraphError::UnknownNode(node));
            }
        }

        Ok(self.graph.add_edge(source, target, Edge::new(weight)))
    }

    /// Allocates a two-way road between `a` and `b`, returned
    /// as the `(a -> b, b -> a)` pair of directed edges.
    pub fn add_road(
        &mut self,
        a: NodeIx,
        b: NodeIx,
        weight: f64,
    ) -> Result<(EdgeIx, EdgeIx), GraphError> {
        let forward = self.add_edge(a, b, weight)?;
        let backward = self.add_edge(b, a, weight)?;
        Ok((forward, backward))
    }

    /// Allocates a node per position and chains them with one-way edges,
    /// returning the edges in travel order.
    pub fn add_polyline(
        &mut self,
        positions: impl IntoIterator<Item = Point>,
        weight: f64,
    ) -> Result<Vec<EdgeIx>, GraphError> {
        let nodes = positions
            .into_iter()
            .map(|position| self.add_node(position))
            .collect::<Result<Vec<_>, _>>()?;

        nodes
            .windows(2)
            .map(|pair| self.add_edge(pair[0], pair[1], weight))
            .collect()
    }

    pub fn build(self) -> Network {
        info!(
            "Built network with {} nodes and {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );

        Network { graph: self.graph }
    }
}
