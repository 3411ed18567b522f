use chrono::{DateTime, Utc};
use geo::Point;

/// A single positional fix of a trace.
///
/// The position is stored with `x` as longitude and `y` as latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub position: Point,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(position: Point) -> Self {
        Observation {
            position,
            timestamp: None,
        }
    }

    pub fn at(position: Point, timestamp: DateTime<Utc>) -> Self {
        Observation {
            position,
            timestamp: Some(timestamp),
        }
    }

    /// Creates an observation from a `(latitude, longitude)` pair, the
    /// order most trace formats record them in.
    pub fn from_lat_lng(latitude: f64, longitude: f64) -> Self {
        Self::new(Point::new(longitude, latitude))
    }

    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Observation {
            timestamp: Some(timestamp),
            ..self
        }
    }
}

impl From<Point> for Observation {
    fn from(position: Point) -> Self {
        Observation::new(position)
    }
}
