use crate::error::GraphError;
use crate::graph::{Edge, Network, Node, NodeIx};

use geo::{Distance, Haversine, InterpolatePoint};
use log::debug;
use measure_time::debug_time;
use std::collections::VecDeque;

impl Network {
    /// Splits every edge longer than `max_length` meters into pieces
    /// of `max_length`, measured from the edge source. The final piece
    /// holds the remainder. Every piece inherits the weight of the edge.
    ///
    /// If the edge has a reverse twin (`b -> a` for `a -> b`), the twin is
    /// split at the same inserted nodes, so two-way roads remain pairs of
    /// mutually-reverse edges. The twin's remainder is then its first piece,
    /// as pieces are measured from the source of whichever direction holds
    /// the lower edge index.
    ///
    /// Returns the number of nodes inserted.
    pub fn subdivide(&mut self, max_length: f64) -> Result<usize, GraphError> {
        if !(max_length.is_finite() && max_length > 0.0) {
            return Err(GraphError::InvalidSubdivision(max_length));
        }

        debug_time!("subdivide network");

        // Queued by endpoints, as removed edge indices are recycled.
        let mut queue = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .collect::<VecDeque<(NodeIx, NodeIx)>>();
        let mut inserted = 0;

        while let Some((source, target)) = queue.pop_front() {
            // Twins are split alongside their pair, and no longer exist.
            let Some(edge) = self.graph.find_edge(source, target) else {
                continue;
            };

            let (Some(start), Some(end), Some(weight)) = (
                self.position(source),
                self.position(target),
                self.weight(edge),
            ) else {
                continue;
            };

            let length = Haversine.distance(start, end);
            if length <= max_length {
                continue;
            }

            let position = Haversine.point_at_distance_between(start, end, max_length);
            let node = self.graph.add_node(Node::new(position));
            inserted += 1;

            self.graph.remove_edge(edge);
            self.graph.add_edge(source, node, Edge::new(weight));
            self.graph.add_edge(node, target, Edge::new(weight));

            if let Some(twin) = self.graph.find_edge(target, source) {
                if let Some(twin_weight) = self.weight(twin) {
                    self.graph.remove_edge(twin);
                    self.graph.add_edge(target, node, Edge::new(twin_weight));
                    self.graph.add_edge(node, source, Edge::new(twin_weight));
                }
            }

            // The remainder is re-examined, its own twin is
            // split alongside it when it is popped.
            queue.push_back((node, target));
        }

        debug!(
            "Subdivided network at {max_length}m, inserted {inserted} nodes ({} edges)",
            self.edge_count()
        );

        Ok(inserted)
    }
}
