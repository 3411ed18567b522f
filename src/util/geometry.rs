//! Small geodetic helpers shared by the emission model and the spatial index.

use geo::{Destination, Haversine, Line, LineInterpolatePoint, LineLocatePoint, Point};
use rstar::AABB;

/// Projects `point` perpendicularly onto `line`, clamped to the segment.
///
/// The projection happens in longitude/latitude space, which is adequate
/// for the short segments road networks are made of. A degenerate
/// (zero-length) line projects onto its start.
pub fn project(line: &Line, point: &Point) -> Point {
    // We locate the point upon the line, and then project
    // that fractional (%) upon the line to obtain a point
    line.line_locate_point(point)
        .filter(|fraction| fraction.is_finite())
        .and_then(|fraction| line.line_interpolate_point(fraction))
        .unwrap_or_else(|| line.start_point())
}

/// The axis-aligned longitude/latitude box spanning `distance` meters
/// from `point` in every cardinal direction.
pub fn envelope_around(point: &Point, distance: f64) -> AABB<Point> {
    let north = Haversine.destination(*point, 0.0, distance);
    let east = Haversine.destination(*point, 90.0, distance);

    let lat_delta = (north.y() - point.y()).abs();
    let lng_delta = (east.x() - point.x()).abs();

    AABB::from_corners(
        Point::new(point.x() - lng_delta, point.y() - lat_delta),
        Point::new(point.x() + lng_delta, point.y() + lat_delta),
    )
}

/// The axis-aligned bounding box of a segment.
pub fn envelope_of(line: &Line) -> AABB<Point> {
    AABB::from_corners(line.start_point(), line.end_point())
}
