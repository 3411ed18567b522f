use crate::fixtures::{grid, observe, one_way_chain, two_way_chain};
use crate::transition::*;
use crate::{MatchConfig, Network};

use rayon::prelude::*;

/// East along the bottom row of a grid, then north along its last column.
fn grid_trace(size: usize, spacing: f64) -> Vec<Observation> {
    let edge = (size - 1) as f64 * spacing;

    let east = (0..12).map(|i| observe(5.0 + i as f64 * edge / 12.0, 3.0));
    let north = (0..12).map(|i| observe(edge - 4.0, 5.0 + i as f64 * edge / 12.0));

    east.chain(north).collect()
}

fn match_states(network: &Network, config: MatchConfig, trace: &[Observation]) -> Vec<State> {
    Matcher::new(network, config)
        .expect("valid matcher")
        .match_trace(trace.iter().copied())
        .expect("trace must match")
        .states()
}

#[test_log::test]
fn straight_road_progresses_monotonically() {
    let (network, edges) = one_way_chain(3, 100.0);
    let (a, b, c) = (State::Edge(edges[0]), State::Edge(edges[1]), State::Edge(edges[2]));

    let trace = [25.0, 75.0, 125.0, 175.0, 250.0].map(|east| observe(east, 0.0));
    let states = match_states(&network, MatchConfig::default(), &trace);

    assert_eq!(states, vec![a, a, b, b, c]);
}

#[test_log::test]
fn noise_free_trace_stays_on_its_edge() {
    let (network, edges) = one_way_chain(1, 500.0);

    let trace = (0..10)
        .map(|i| observe(20.0 + i as f64 * 50.0, 0.0))
        .collect::<Vec<_>>();

    let states = match_states(&network, MatchConfig::default(), &trace);
    assert_eq!(states, vec![State::Edge(edges[0]); trace.len()]);
}

#[test_log::test]
fn two_way_road_never_reverses() {
    let (network, edges) = two_way_chain(4, 100.0);
    let eastbound = edges
        .iter()
        .map(|(east, _)| State::Edge(*east))
        .collect::<Vec<_>>();

    let trace = (0..8)
        .map(|i| observe(10.0 + i as f64 * 50.0, 2.0))
        .collect::<Vec<_>>();

    let states = match_states(&network, MatchConfig::default(), &trace);
    assert!(
        states.iter().all(|state| eastbound.contains(state)),
        "expected eastbound edges only, got {states:?}"
    );
}

#[test_log::test]
fn aggressive_eviction_still_matches_every_observation() {
    let (network, _) = two_way_chain(4, 100.0);
    let config = MatchConfig::default()
        .with_constraint_length(3)
        .with_eviction_threshold(0.9);

    let trace = (0..6)
        .map(|i| observe(10.0 + i as f64 * 50.0, 2.0))
        .collect::<Vec<_>>();

    let states = match_states(&network, config, &trace);
    assert_eq!(states.len(), trace.len());
}

#[test_log::test]
fn leaving_coverage_decodes_unknown_then_recovers() {
    let (network, edges) = one_way_chain(3, 100.0);
    let (a, b) = (State::Edge(edges[0]), State::Edge(edges[1]));

    let trace = [
        observe(10.0, 0.0),
        observe(30.0, 0.0),
        observe(50.0, 0.0),
        // Far beyond the reach of any edge.
        observe(50.0, 400.0),
        observe(60.0, 400.0),
        observe(150.0, 0.0),
        observe(170.0, 0.0),
        observe(190.0, 0.0),
    ];

    let states = match_states(&network, MatchConfig::default(), &trace);
    assert_eq!(
        states,
        vec![a, a, a, State::Unknown, State::Unknown, b, b, b]
    );
}

#[test_log::test]
fn one_state_per_raw_observation() {
    let network = grid(5, 100.0);
    let trace = grid_trace(5, 100.0);

    for config in [
        MatchConfig::default(),
        MatchConfig::default().with_constraint_length(1),
        MatchConfig::default().with_constraint_length(300),
        MatchConfig::default().with_interpolation_distance(1_000.0),
    ] {
        let matched = Matcher::new(&network, config)
            .expect("valid matcher")
            .match_trace(trace.iter().copied())
            .expect("trace must match");

        assert_eq!(matched.len(), trace.len());
        assert_eq!(matched.states().len(), trace.len());
        assert_eq!(matched.edge_keys(&network).len(), trace.len());
        assert!(matched.all().len() >= trace.len());

        let raw = matched
            .observations()
            .map(|matched| matched.observation)
            .collect::<Vec<_>>();
        assert_eq!(raw, trace);
    }
}

#[test_log::test]
fn decoding_is_deterministic() {
    let trace = grid_trace(6, 80.0);

    let first = match_states(&grid(6, 80.0), MatchConfig::default(), &trace);
    let second = match_states(&grid(6, 80.0), MatchConfig::default(), &trace);

    assert_eq!(first, second);
    assert!(first.iter().all(|state| !state.is_unknown()));
}

#[test_log::test]
fn streamed_decisions_are_final() {
    let network = grid(5, 100.0);
    let trace = grid_trace(5, 100.0);

    let config = MatchConfig::default().with_constraint_length(4);
    let matcher = Matcher::new(&network, config).expect("valid matcher");
    let decoder = matcher.decoder().expect("valid decoder");

    let mut session = TraceSession::new(&decoder, Interpolator::from_config(&config));
    let mut streamed = Vec::new();

    for observation in &trace {
        streamed.extend(session.push(*observation));

        // Decisions lag the steps taken by exactly the constraint length.
        let steps = session.session().steps();
        assert_eq!(streamed.len(), (steps + 1).saturating_sub(4));
    }

    let finished = session.finish().expect("lengths must agree");
    let whole = matcher
        .match_trace(trace.iter().copied())
        .expect("trace must match");

    assert_eq!(&whole.all()[..streamed.len()], streamed.as_slice());
    assert_eq!(&whole.all()[streamed.len()..], finished.as_slice());
}

#[test_log::test]
fn unknown_priors_are_honoured() {
    let (network, edges) = one_way_chain(2, 100.0);
    let matcher = Matcher::new(&network, MatchConfig::default())
        .expect("valid matcher")
        .with_priors(Priors::unknown())
        .expect("valid priors");

    let decoder = matcher.decoder().expect("valid decoder");
    assert_eq!(decoder.priors(), &[(State::Unknown, 1.0)]);

    let trace = (0..6).map(|i| observe(10.0 + i as f64 * 30.0, 0.0));
    let states = matcher.match_trace(trace).expect("trace must match").states();

    assert_eq!(states.last(), Some(&State::Edge(edges[1])));
}

#[test_log::test]
fn matcher_is_shared_across_threads() {
    fn assert_sync<T: Send + Sync>() {}
    assert_sync::<Matcher<'static>>();

    let network = grid(5, 100.0);
    let matcher = Matcher::new(&network, MatchConfig::default()).expect("valid matcher");
    let trace = grid_trace(5, 100.0);

    let sequential = matcher
        .match_trace(trace.iter().copied())
        .expect("trace must match")
        .states();

    let parallel = (0..4)
        .into_par_iter()
        .map(|_| {
            matcher
                .match_trace(trace.iter().copied())
                .map(|matched| matched.states())
        })
        .collect::<Result<Vec<_>, _>>()
        .expect("traces must match");

    assert!(parallel.iter().all(|states| *states == sequential));
}

#[test]
fn invalid_configuration_is_rejected() {
    let (network, _) = one_way_chain(1, 100.0);
    let config = MatchConfig::default().with_emission_sigma(0.0);

    assert!(Matcher::new(&network, config).is_err());
}
