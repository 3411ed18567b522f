use crate::config::MatchConfig;
use crate::transition::Observation;

use chrono::{DateTime, TimeDelta, Utc};
use geo::{Distance, Haversine, InterpolatePoint};

/// Resamples hops between consecutive observations which are too long
/// for the decoder to bridge in a single step.
#[derive(Clone, Copy, Debug)]
pub struct Interpolator {
    threshold: f64,
}

impl Interpolator {
    /// An interpolator filling hops longer than `threshold` meters.
    pub fn new(threshold: f64) -> Self {
        Interpolator { threshold }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.interpolation_distance)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The synthetic observations strictly between `previous` and `next`.
    ///
    /// A hop of `d` meters beyond the threshold is cut into
    /// `ceil(d / threshold)` equal pieces along the great circle, so no
    /// piece exceeds the threshold. Timestamps are interpolated linearly
    /// when both ends carry one.
    pub fn between(&self, previous: &Observation, next: &Observation) -> Vec<Observation> {
        let distance = Haversine.distance(previous.position, next.position);
        if !(distance > self.threshold) || !(self.threshold > 0.0) {
            return vec![];
        }

        let pieces = (distance / self.threshold).ceil() as usize;

        (1..pieces)
            .map(|step| {
                let ratio = step as f64 / pieces as f64;

                Observation {
                    position: Haversine.point_at_ratio_between(
                        previous.position,
                        next.position,
                        ratio,
                    ),
                    timestamp: previous
                        .timestamp
                        .zip(next.timestamp)
                        .map(|(start, end)| lerp(start, end, ratio)),
                }
            })
            .collect()
    }
}

fn lerp(start: DateTime<Utc>, end: DateTime<Utc>, ratio: f64) -> DateTime<Utc> {
    let span = (end - start).num_milliseconds() as f64;
    start + TimeDelta::milliseconds((span * ratio).round() as i64)
}
