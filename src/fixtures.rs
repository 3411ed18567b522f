//! Synthetic networks laid out around (0°, 0°), where one degree
//! spans [`METERS_PER_DEGREE`] in both directions.

use crate::graph::{EdgeIx, Network, NetworkBuilder, NodeIx};
use crate::transition::Observation;

use geo::Point;

/// Meters per degree along the equator for the haversine mean radius.
pub const METERS_PER_DEGREE: f64 = 111_195.079_734_6;

/// The position `east` and `north` meters from the origin.
pub fn at(east: f64, north: f64) -> Point {
    Point::new(east / METERS_PER_DEGREE, north / METERS_PER_DEGREE)
}

pub fn observe(east: f64, north: f64) -> Observation {
    Observation::new(at(east, north))
}

/// A straight one-way road heading east, `segments` edges of `spacing` meters.
pub fn one_way_chain(segments: usize, spacing: f64) -> (Network, Vec<EdgeIx>) {
    let mut builder = NetworkBuilder::new();
    let edges = builder
        .add_polyline((0..=segments).map(|i| at(i as f64 * spacing, 0.0)), 1.0)
        .expect("chain must build");

    (builder.build(), edges)
}

/// A straight two-way road heading east, as `(eastbound, westbound)` pairs.
pub fn two_way_chain(segments: usize, spacing: f64) -> (Network, Vec<(EdgeIx, EdgeIx)>) {
    let mut builder = NetworkBuilder::new();
    let nodes = (0..=segments)
        .map(|i| builder.add_node(at(i as f64 * spacing, 0.0)))
        .collect::<Result<Vec<_>, _>>()
        .expect("nodes must build");

    let edges = nodes
        .windows(2)
        .map(|pair| builder.add_road(pair[0], pair[1], 1.0))
        .collect::<Result<Vec<_>, _>>()
        .expect("roads must build");

    (builder.build(), edges)
}

/// A four-way intersection of two-way roads, arms ordered east, north, west, south.
pub struct Crossing {
    pub center: NodeIx,
    pub arms: [NodeIx; 4],
    /// Arm towards the center.
    pub inbound: [EdgeIx; 4],
    /// Center towards the arm.
    pub outbound: [EdgeIx; 4],
}

pub fn crossing(arm: f64, weights: [f64; 4]) -> (Network, Crossing) {
    let mut builder = NetworkBuilder::new();
    let center = builder.add_node(at(0.0, 0.0)).expect("center must build");

    let offsets = [(arm, 0.0), (0.0, arm), (-arm, 0.0), (0.0, -arm)];
    let arms = offsets.map(|(east, north)| builder.add_node(at(east, north)).expect("arm must build"));

    let mut inbound = arms.map(|_| EdgeIx::end());
    let mut outbound = arms.map(|_| EdgeIx::end());

    for (i, node) in arms.iter().enumerate() {
        inbound[i] = builder
            .add_edge(*node, center, weights[i])
            .expect("edge must build");
        outbound[i] = builder
            .add_edge(center, *node, weights[i])
            .expect("edge must build");
    }

    let crossing = Crossing {
        center,
        arms,
        inbound,
        outbound,
    };

    (builder.build(), crossing)
}

/// A `size` x `size` lattice of two-way roads, `spacing` meters apart.
pub fn grid(size: usize, spacing: f64) -> Network {
    let mut builder = NetworkBuilder::new();

    let nodes = (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    builder
                        .add_node(at(col as f64 * spacing, row as f64 * spacing))
                        .expect("node must build")
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for row in 0..size {
        for col in 0..size {
            if col + 1 < size {
                builder
                    .add_road(nodes[row][col], nodes[row][col + 1], 1.0)
                    .expect("road must build");
            }
            if row + 1 < size {
                builder
                    .add_road(nodes[row][col], nodes[row + 1][col], 1.0)
                    .expect("road must build");
            }
        }
    }

    builder.build()
}
