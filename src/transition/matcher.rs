use crate::config::MatchConfig;
use crate::error::{Error, MatchError};
use crate::graph::Network;
use crate::transition::*;

use log::info;
use measure_time::debug_time;
#[cfg(feature = "tracing")]
use tracing::Level;

/// The decoder specialised for a [`Network`].
pub type NetworkViterbi<'v, 'a> =
    Viterbi<'v, TransitionTable, SpatialIndex, DistanceEmission<'a, Network>>;

/// Matches traces onto a [`Network`].
///
/// Construction builds the read-only model once: the transition table,
/// the spatial candidate index and the emission lookup table. Each trace
/// is then decoded in its own session, so a matcher may be shared across
/// threads matching traces in parallel.
///
/// ```rust
/// use geo::Point;
/// use mapmatch::{Matcher, MatchConfig, NetworkBuilder, Observation, State};
///
/// let mut builder = NetworkBuilder::new();
/// let edges = builder.add_polyline(
///     [Point::new(0.0, 0.0), Point::new(0.001, 0.0), Point::new(0.002, 0.0)],
///     1.0,
/// )?;
///
/// let network = builder.build();
/// let matcher = Matcher::new(&network, MatchConfig::default())?;
///
/// let trace = [0.0003, 0.0007, 0.0013, 0.0017]
///     .map(|lng| Observation::from_lat_lng(0.0, lng));
///
/// let matched = matcher.match_trace(trace)?;
/// assert_eq!(matched.len(), 4);
/// assert_eq!(matched.states()[0], State::Edge(edges[0]));
/// assert_eq!(matched.states()[3], State::Edge(edges[1]));
/// # Ok::<(), mapmatch::Error>(())
/// ```
pub struct Matcher<'a> {
    network: &'a Network,
    config: MatchConfig,

    transitions: TransitionTable,
    index: SpatialIndex,
    emission: DistanceEmission<'a, Network>,
    priors: Priors,
}

impl<'a> Matcher<'a> {
    pub fn new(network: &'a Network, config: MatchConfig) -> Result<Self, Error> {
        config.validate()?;
        debug_time!("matcher construction");

        let transitions = TransitionTable::from_network(network, TransitionConstants::from(&config));
        let index = SpatialIndex::new(transitions.states(), network);
        let emission = DistanceEmission::from_config(network, &config);

        info!(
            "Constructed matcher over {network:?}, {} candidate states",
            index.len()
        );

        Ok(Matcher {
            network,
            config,
            transitions,
            index,
            emission,
            priors: Priors::default(),
        })
    }

    /// Replaces the priors every trace starts from.
    pub fn with_priors(self, priors: Priors) -> Result<Self, MatchError> {
        priors.resolve(self.transitions.states())?;
        Ok(Matcher { priors, ..self })
    }

    pub fn network(&self) -> &Network {
        self.network
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn emission(&self) -> &DistanceEmission<'a, Network> {
        &self.emission
    }

    /// A decoder over this matcher's model, for driving sessions by hand.
    pub fn decoder(&self) -> Result<NetworkViterbi<'_, 'a>, Error> {
        let decoder = Viterbi::new(&self.transitions, &self.index, &self.emission, &self.config)?
            .with_priors(&self.priors)?;

        Ok(decoder)
    }

    /// Decodes an entire trace, one state per observation.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::INFO))]
    pub fn match_trace(
        &self,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<MatchedTrace, Error> {
        let decoder = self.decoder()?;
        let mut session = TraceSession::new(&decoder, Interpolator::from_config(&self.config));

        let mut steps = Vec::new();
        let mut raw = 0;

        for observation in observations {
            raw += 1;
            steps.extend(session.push(observation));
        }

        let recoveries = session.session().recoveries();
        steps.extend(session.finish()?);

        info!(
            "Matched {raw} observations over {} steps, {recoveries} recoveries",
            steps.len()
        );

        Ok(MatchedTrace::new(steps, raw)?)
    }
}
