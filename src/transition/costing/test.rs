use crate::fixtures::{at, crossing, grid, one_way_chain, two_way_chain};
use crate::graph::NetworkBuilder;
use crate::transition::*;

use approx::assert_relative_eq;

fn table(network: &crate::Network) -> TransitionTable {
    TransitionTable::from_network(network, TransitionConstants::default())
}

#[test_log::test]
fn straight_chain_rows() {
    let (network, edges) = one_way_chain(3, 100.0);
    let table = table(&network);
    let (a, b, c) = (State::Edge(edges[0]), State::Edge(edges[1]), State::Edge(edges[2]));

    assert_relative_eq!(table.probability(&a, &a), 0.5);
    assert_relative_eq!(table.probability(&a, &State::Unknown), 0.000_01);
    assert_relative_eq!(table.probability(&a, &b), 0.5 - 0.000_01);
    assert_eq!(table.probability(&a, &c), 0.0);

    // The final edge leads nowhere, its onward mass is absorbed by `unknown`.
    assert_relative_eq!(table.probability(&c, &c), 0.5);
    assert_relative_eq!(table.probability(&c, &State::Unknown), 0.5);
}

#[test_log::test]
fn straight_road_never_uturns() {
    let (network, edges) = two_way_chain(3, 100.0);
    let table = table(&network);

    let (east, west) = edges[1];
    let (next_east, _) = edges[2];

    assert_eq!(table.probability(&State::Edge(east), &State::Edge(west)), 0.0);
    assert_relative_eq!(
        table.probability(&State::Edge(east), &State::Edge(next_east)),
        0.5 - 0.000_01
    );
}

#[test_log::test]
fn dead_end_turns_around() {
    let (network, edges) = two_way_chain(2, 100.0);
    let table = table(&network);

    let (last_east, last_west) = edges[1];
    assert_relative_eq!(
        table.probability(&State::Edge(last_east), &State::Edge(last_west)),
        0.5 - 0.000_01
    );
}

#[test_log::test]
fn intersection_shares_by_weight() {
    let (network, crossing) = crossing(100.0, [1.0, 2.0, 1.0, 1.0]);
    let table = table(&network);

    let from = State::Edge(crossing.inbound[0]);
    let remaining = 1.0 - 0.5 - 0.000_01 - 0.000_01;

    // U-turn permitted, but unlikely.
    assert_relative_eq!(
        table.probability(&from, &State::Edge(crossing.outbound[0])),
        0.000_01
    );

    assert_relative_eq!(
        table.probability(&from, &State::Edge(crossing.outbound[1])),
        remaining * 0.5
    );
    assert_relative_eq!(
        table.probability(&from, &State::Edge(crossing.outbound[2])),
        remaining * 0.25
    );
    assert_relative_eq!(
        table.probability(&from, &State::Edge(crossing.outbound[3])),
        remaining * 0.25
    );
    assert_relative_eq!(table.row_sum(&from), 1.0, epsilon = 1e-12);
}

#[test_log::test]
fn weightless_successors_fall_to_unknown() {
    let mut builder = NetworkBuilder::new();
    let edges = builder
        .add_polyline([at(0.0, 0.0), at(100.0, 0.0), at(200.0, 0.0)], 0.0)
        .expect("must build");
    let network = builder.build();
    let table = table(&network);

    let first = State::Edge(edges[0]);
    assert_eq!(table.probability(&first, &State::Edge(edges[1])), 0.0);
    assert_relative_eq!(table.probability(&first, &State::Unknown), 0.5);
    assert_relative_eq!(table.row_sum(&first), 1.0);
}

#[test_log::test]
fn every_row_sums_to_one() {
    let network = grid(5, 50.0);
    let table = table(&network);

    assert_eq!(table.len(), network.edge_count() + 1);
    for state in table.states() {
        assert_relative_eq!(table.row_sum(state), 1.0, epsilon = 1e-9);
    }
}

#[test_log::test]
fn unknown_spreads_uniformly() {
    let network = grid(3, 50.0);
    let table = table(&network);
    let share = 0.1 / network.edge_count() as f64;

    assert_relative_eq!(table.probability(&State::Unknown, &State::Unknown), 0.9);
    for edge in network.edges() {
        assert_relative_eq!(table.probability(&State::Unknown, &State::Edge(edge)), share);
    }
}

#[test]
fn empty_network_stays_unknown() {
    let network = NetworkBuilder::new().build();
    let table = table(&network);

    assert_eq!(table.states(), &[State::Unknown]);
    assert_relative_eq!(table.probability(&State::Unknown, &State::Unknown), 1.0);
}

#[test_log::test]
fn incoming_mirrors_outgoing() {
    let network = grid(4, 50.0);
    let table = table(&network);

    for from in table.states() {
        for (to, probability) in table.outgoing(from) {
            let incoming = table.incoming(to).expect("destination must have incoming");
            assert_eq!(incoming.get(from), Some(probability));
        }
    }

    let incoming_total = table
        .states()
        .iter()
        .filter_map(|state| table.incoming(state))
        .map(|incoming| incoming.len())
        .sum::<usize>();
    let outgoing_total = table
        .states()
        .iter()
        .map(|state| table.outgoing(state).len())
        .sum::<usize>();

    assert_eq!(incoming_total, outgoing_total);
}

#[test]
fn explicit_rows_merge_duplicates() {
    let a = State::Edge(crate::graph::EdgeIx::new(0));
    let b = State::Edge(crate::graph::EdgeIx::new(1));

    let table = TransitionTable::from_rows([
        (a, vec![(a, 0.25), (b, 0.25), (a, 0.25), (State::Unknown, 0.0)]),
        (State::Unknown, vec![(a, 1.0)]),
    ]);

    assert_eq!(table.states(), &[State::Unknown, a, b]);
    assert_relative_eq!(table.probability(&a, &a), 0.5);
    assert_eq!(table.probability(&a, &State::Unknown), 0.0);
    assert!(table.outgoing(&b).is_empty());
}

#[test]
fn complementary_cdf_matches_reference_values() {
    assert_relative_eq!(complementary_normal_cdf(0.0, 0.0, 50.0), 0.5, epsilon = 1e-7);
    assert_relative_eq!(
        complementary_normal_cdf(50.0, 0.0, 50.0),
        0.158_655_25,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        complementary_normal_cdf(100.0, 0.0, 50.0),
        0.022_750_13,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        complementary_normal_cdf(-50.0, 0.0, 50.0),
        1.0 - 0.158_655_25,
        epsilon = 1e-6
    );
}

#[test]
fn emission_table_covers_three_sigma() {
    let table = EmissionTable::new(50.0);

    assert_eq!(table.len(), 150);
    assert!(table.lookup(149.9) > 0.0);
    assert_eq!(table.lookup(150.0), 0.0);
    assert_eq!(table.lookup(-1.0), 0.0);
    assert_eq!(table.lookup(f64::NAN), 0.0);

    // Monotonically decreasing with distance.
    assert!(table.lookup(10.0) > table.lookup(20.0));
}

#[test]
fn emission_table_clamps_sigma() {
    let table = EmissionTable::new(1e15);

    assert_eq!(table.sigma(), crate::config::MAX_EMISSION_SIGMA);
    assert_eq!(table.len(), 30_000);
}

#[test_log::test]
fn emission_falls_off_with_distance() {
    let (network, edges) = one_way_chain(1, 200.0);
    let emission = DistanceEmission::new(&network, 50.0, 0.01);
    let edge = State::Edge(edges[0]);

    assert_relative_eq!(
        emission.emission(&edge, &at(100.0, 0.0)),
        0.5,
        epsilon = 1e-6
    );

    // Projection is perpendicular onto the segment.
    let offset = emission.emission(&edge, &at(80.0, 25.5));
    assert_relative_eq!(
        offset,
        complementary_normal_cdf(25.0, 0.0, 50.0),
        epsilon = 1e-9
    );

    // Beyond the segment end, distance is measured to the endpoint.
    let distance = emission
        .distance(&edge, &at(230.0, 0.0))
        .expect("edge has geometry");
    assert_relative_eq!(distance, 30.0, max_relative = 1e-6);

    assert_eq!(emission.emission(&edge, &at(100.0, 400.0)), 0.0);
    assert_eq!(emission.emission(&State::Unknown, &at(100.0, 400.0)), 0.01);
}
