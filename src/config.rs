//! Tunable constants of the matching model.
//!
//! Every value has a default mirroring a well-behaved urban setup with
//! GPS error around 50m. Values may be overridden in code using the
//! `with_*` setters, deserialized with `serde`, or loaded from the
//! environment (and an optional `.env` file) using [`MatchConfig::from_env`].
//!
//! ```bash
//! MAPMATCH_EMISSION_SIGMA=25
//! MAPMATCH_SEARCH_RADIUS=350
//! MAPMATCH_CONSTRAINT_LENGTH=300
//! ```

use crate::error::ConfigError;

use dotenv::dotenv;
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const ENV_PREFIX: &str = "MAPMATCH_";

/// Largest accepted emission sigma, in meters. The emission lookup holds
/// one entry per meter up to three sigma.
pub const MAX_EMISSION_SIGMA: f64 = 10_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Standard deviation (meters) of the Gaussian emission model.
    pub emission_sigma: f64,

    /// Constant emission likelihood of the `unknown` state.
    pub emission_unknown: f64,

    /// Probability of remaining upon the same edge between observations.
    pub transition_self: f64,

    /// Probability of an edge falling into the `unknown` state.
    pub transition_unknown: f64,

    /// Probability of `unknown` remaining `unknown`. The remainder
    /// is spread uniformly over every edge in the network.
    pub transition_unknown_unknown: f64,

    /// Probability of reversing along the twin edge at an intersection.
    pub transition_uturn: f64,

    /// Radius (meters) searched around an observation for candidate edges.
    pub search_radius: f64,

    /// Maximum path history retained per live state. This is also the
    /// lag, in observations, before a decision becomes final.
    pub constraint_length: usize,

    /// Normalised probabilities below this value are evicted after each step.
    pub eviction_threshold: f64,

    /// Raw observations further apart than this (meters) are resampled.
    pub interpolation_distance: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            emission_sigma: 50.0,
            emission_unknown: 0.01,
            transition_self: 0.5,
            transition_unknown: 0.000_01,
            transition_unknown_unknown: 0.9,
            transition_uturn: 0.000_01,
            search_radius: 100.0,
            constraint_length: 10,
            eviction_threshold: 0.000_000_000_01,
            interpolation_distance: 10.0,
        }
    }
}

impl MatchConfig {
    pub fn with_emission_sigma(self, emission_sigma: f64) -> Self {
        MatchConfig {
            emission_sigma,
            ..self
        }
    }

    pub fn with_search_radius(self, search_radius: f64) -> Self {
        MatchConfig {
            search_radius,
            ..self
        }
    }

    pub fn with_constraint_length(self, constraint_length: usize) -> Self {
        MatchConfig {
            constraint_length,
            ..self
        }
    }

    pub fn with_interpolation_distance(self, interpolation_distance: f64) -> Self {
        MatchConfig {
            interpolation_distance,
            ..self
        }
    }

    pub fn with_eviction_threshold(self, eviction_threshold: f64) -> Self {
        MatchConfig {
            eviction_threshold,
            ..self
        }
    }

    /// Overrides the transition constants, given as
    /// `(self, unknown, unknown->unknown, u-turn)`.
    pub fn with_transitions(self, (own, unknown, unknown_unknown, uturn): (f64, f64, f64, f64)) -> Self {
        MatchConfig {
            transition_self: own,
            transition_unknown: unknown,
            transition_unknown_unknown: unknown_unknown,
            transition_uturn: uturn,
            ..self
        }
    }

    /// Loads the configuration from `MAPMATCH_*` environment variables,
    /// after reading a `.env` file if one is present. Variables which
    /// are not set keep their default value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv() {
            debug!("No .env file loaded: {err}");
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source, such
    /// that `lookup("MAPMATCH_SEARCH_RADIUS")` yields the raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = MatchConfig::default();

        fn read<T: FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
            slot: &mut T,
        ) -> Result<(), ConfigError> {
            let name = format!("{ENV_PREFIX}{key}");
            if let Some(value) = lookup(&name) {
                *slot = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidVariable { name, value })?;
            }
            Ok(())
        }

        read(&lookup, "EMISSION_SIGMA", &mut config.emission_sigma)?;
        read(&lookup, "EMISSION_UNKNOWN", &mut config.emission_unknown)?;
        read(&lookup, "TRANSITION_SELF", &mut config.transition_self)?;
        read(&lookup, "TRANSITION_UNKNOWN", &mut config.transition_unknown)?;
        read(
            &lookup,
            "TRANSITION_UNKNOWN_UNKNOWN",
            &mut config.transition_unknown_unknown,
        )?;
        read(&lookup, "TRANSITION_UTURN", &mut config.transition_uturn)?;
        read(&lookup, "SEARCH_RADIUS", &mut config.search_radius)?;
        read(&lookup, "CONSTRAINT_LENGTH", &mut config.constraint_length)?;
        read(&lookup, "EVICTION_THRESHOLD", &mut config.eviction_threshold)?;
        read(
            &lookup,
            "INTERPOLATION_DISTANCE",
            &mut config.interpolation_distance,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Checks every value lies within its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
            match (0.0..=1.0).contains(&value) {
                true => Ok(()),
                false => Err(ConfigError::OutOfRange { name, value }),
            }
        }

        fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
            match value.is_finite() && value >= 0.0 {
                true => Ok(()),
                false => Err(ConfigError::OutOfRange { name, value }),
            }
        }

        if !(self.emission_sigma > 0.0 && self.emission_sigma <= MAX_EMISSION_SIGMA) {
            return Err(ConfigError::OutOfRange {
                name: "emission_sigma",
                value: self.emission_sigma,
            });
        }

        if !(self.interpolation_distance.is_finite() && self.interpolation_distance > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "interpolation_distance",
                value: self.interpolation_distance,
            });
        }

        probability("emission_unknown", self.emission_unknown)?;
        probability("transition_self", self.transition_self)?;
        probability("transition_unknown", self.transition_unknown)?;
        probability("transition_unknown_unknown", self.transition_unknown_unknown)?;
        probability("transition_uturn", self.transition_uturn)?;
        if !(0.0..1.0).contains(&self.eviction_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "eviction_threshold",
                value: self.eviction_threshold,
            });
        }

        non_negative("search_radius", self.search_radius)?;

        let committed = self.transition_self + self.transition_unknown + self.transition_uturn;
        if committed > 1.0 {
            return Err(ConfigError::TransitionMassExceeded(committed));
        }

        if self.constraint_length == 0 {
            return Err(ConfigError::ZeroConstraintLength);
        }

        Ok(())
    }
}
