use crate::config::{MatchConfig, MAX_EMISSION_SIGMA};
use crate::transition::{Geometry, State};
use crate::util::geometry::project;

use geo::{Distance, Haversine, Point};
use log::trace;
use std::f64::consts::SQRT_2;
use wkt::ToWkt;

/// The likelihood that an observation was recorded from a given state.
///
/// Values lie within `[0, +inf)` and need not integrate to 1, the decoder
/// only compares them within a single step. A value of zero removes the
/// state from consideration for that observation.
pub trait EmissionModel {
    fn emission(&self, state: &State, observation: &Point) -> f64;
}

impl<F> EmissionModel for F
where
    F: Fn(&State, &Point) -> f64,
{
    #[inline]
    fn emission(&self, state: &State, observation: &Point) -> f64 {
        self(state, observation)
    }
}

/// The complementary normal CDF, `P(X > x)` for `X ~ N(mu, sigma)`.
pub fn complementary_normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    0.5 * erfc((x - mu) / (sigma * SQRT_2))
}

/// Complementary error function using Abramowitz & Stegun formula 7.1.26.
/// Absolute error is below `1.5e-7`.
fn erfc(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let z = x.abs();
    let t = 1.0 / (1.0 + P * z);
    let tail = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-z * z).exp();

    match x < 0.0 {
        true => 2.0 - tail,
        false => tail,
    }
}

/// Emission likelihoods precomputed per whole meter of distance.
///
/// Covers `[0, 3σ)`, anything further is considered impossible. Sigma is
/// clamped to [`MAX_EMISSION_SIGMA`].
#[derive(Clone, Debug)]
pub struct EmissionTable {
    sigma: f64,
    probabilities: Vec<f64>,
}

impl EmissionTable {
    pub fn new(sigma: f64) -> Self {
        let sigma = sigma.min(MAX_EMISSION_SIGMA);
        let probabilities = (0..(3.0 * sigma) as usize)
            .map(|distance| complementary_normal_cdf(distance as f64, 0.0, sigma))
            .collect::<Vec<_>>();

        EmissionTable {
            sigma,
            probabilities,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The likelihood of an observation `distance` meters from its state.
    #[inline]
    pub fn lookup(&self, distance: f64) -> f64 {
        if !(distance >= 0.0) {
            return 0.0;
        }

        self.probabilities
            .get(distance as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Scores edges by the great-circle distance between the observation and
/// its perpendicular projection onto the edge, through an [`EmissionTable`].
///
/// [`State::Unknown`] scores a constant floor. Edges the geometry cannot
/// resolve score zero.
pub struct DistanceEmission<'a, G>
where
    G: Geometry,
{
    table: EmissionTable,
    unknown: f64,
    geometry: &'a G,
}

impl<'a, G> DistanceEmission<'a, G>
where
    G: Geometry,
{
    pub fn new(geometry: &'a G, sigma: f64, unknown: f64) -> Self {
        DistanceEmission {
            table: EmissionTable::new(sigma),
            unknown,
            geometry,
        }
    }

    pub fn from_config(geometry: &'a G, config: &MatchConfig) -> Self {
        Self::new(geometry, config.emission_sigma, config.emission_unknown)
    }

    pub fn table(&self) -> &EmissionTable {
        &self.table
    }

    /// Distance, in meters, from the observation to the closest point of the state.
    pub fn distance(&self, state: &State, observation: &Point) -> Option<f64> {
        let line = self.geometry.geometry(state)?;
        let projected = project(&line, observation);

        trace!(
            "Projected {} onto {} at {}",
            observation.wkt_string(),
            state,
            projected.wkt_string()
        );

        Some(Haversine.distance(projected, *observation))
    }
}

impl<G> EmissionModel for DistanceEmission<'_, G>
where
    G: Geometry,
{
    #[inline]
    fn emission(&self, state: &State, observation: &Point) -> f64 {
        match state {
            State::Unknown => self.unknown,
            State::Edge(_) => self
                .distance(state, observation)
                .map_or(0.0, |distance| self.table.lookup(distance)),
        }
    }
}
