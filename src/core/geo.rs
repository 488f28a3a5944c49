use crate::core::constants::{
    FEET_PER_METER, FEET_PER_MILE, POINT_EPSILON, RADIUS_OF_WORLD_IN_METERS,
    WORLD_METERS_PER_DEGREE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographical coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl WorldPoint {
    /// Creates a new world point
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Equality within [`POINT_EPSILON`] on both axes
    pub fn points_equal(&self, other: &WorldPoint) -> bool {
        (self.latitude - other.latitude).abs() < POINT_EPSILON
            && (self.longitude - other.longitude).abs() < POINT_EPSILON
    }

    /// Planar distance in degree space.
    ///
    /// This is the flat-earth metric used by clipping, hit testing and
    /// address interpolation.
    pub fn distance_to(&self, other: &WorldPoint) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Great-circle distance in meters using the Haversine formula
    pub fn meters_to(&self, other: &WorldPoint) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        RADIUS_OF_WORLD_IN_METERS * c
    }

    /// Point at parameter `t` on the straight segment from `self` to `other`
    pub fn lerp(&self, other: &WorldPoint, t: f64) -> WorldPoint {
        WorldPoint::new(
            self.latitude + (other.latitude - self.latitude) * t,
            self.longitude + (other.longitude - self.longitude) * t,
        )
    }
}

impl Default for WorldPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Axis-aligned bounding box in world coordinates.
///
/// `a` always holds the minimum latitude/longitude corner and `b` the maximum;
/// [`WorldRect::new`] normalizes whatever corners it is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub a: WorldPoint,
    pub b: WorldPoint,
}

impl WorldRect {
    /// Creates a rectangle from any two opposite corners
    pub fn new(p1: WorldPoint, p2: WorldPoint) -> Self {
        Self {
            a: WorldPoint::new(
                p1.latitude.min(p2.latitude),
                p1.longitude.min(p2.longitude),
            ),
            b: WorldPoint::new(
                p1.latitude.max(p2.latitude),
                p1.longitude.max(p2.longitude),
            ),
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self::new(WorldPoint::new(lat1, lon1), WorldPoint::new(lat2, lon2))
    }

    /// Bounding box of a point sequence, `None` when empty
    pub fn from_points(points: &[WorldPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = WorldRect {
            a: *first,
            b: *first,
        };
        for p in &points[1..] {
            rect.extend(p);
        }
        Some(rect)
    }

    /// Extends the rectangle to include a point
    pub fn extend(&mut self, point: &WorldPoint) {
        self.a.latitude = self.a.latitude.min(point.latitude);
        self.a.longitude = self.a.longitude.min(point.longitude);
        self.b.latitude = self.b.latitude.max(point.latitude);
        self.b.longitude = self.b.longitude.max(point.longitude);
    }

    /// Checks if the rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: &WorldPoint) -> bool {
        point.latitude >= self.a.latitude
            && point.latitude <= self.b.latitude
            && point.longitude >= self.a.longitude
            && point.longitude <= self.b.longitude
    }

    /// Checks if the rectangle intersects another rectangle
    pub fn intersects(&self, other: &WorldRect) -> bool {
        !(other.b.latitude < self.a.latitude
            || other.a.latitude > self.b.latitude
            || other.b.longitude < self.a.longitude
            || other.a.longitude > self.b.longitude)
    }

    /// Checks if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &WorldRect) -> bool {
        self.contains(&other.a) && self.contains(&other.b)
    }

    /// Returns a copy grown by `delta` degrees on every side
    pub fn expanded(&self, delta: f64) -> WorldRect {
        WorldRect::from_coords(
            self.a.latitude - delta,
            self.a.longitude - delta,
            self.b.latitude + delta,
            self.b.longitude + delta,
        )
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            (self.a.latitude + self.b.latitude) / 2.0,
            (self.a.longitude + self.b.longitude) / 2.0,
        )
    }

    /// Longitude span in degrees
    pub fn width(&self) -> f64 {
        self.b.longitude - self.a.longitude
    }

    /// Latitude span in degrees
    pub fn height(&self) -> f64 {
        self.b.latitude - self.a.latitude
    }
}

/// How one rectangle relates to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlap {
    /// No common area; the object is skipped
    None,
    /// Straddles the edge; geometry must be clipped
    Partial,
    /// Entirely inside; drawn without clipping
    Full,
}

/// Classifies `a` against `b`: `Full` when `a` is inside `b`.
pub fn classify_overlap(a: &WorldRect, b: &WorldRect) -> Overlap {
    if !b.intersects(a) {
        Overlap::None
    } else if b.contains_rect(a) {
        Overlap::Full
    } else {
        Overlap::Partial
    }
}

/// Units for human-readable distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Feet,
    Miles,
    Meters,
    Kilometers,
}

impl DistanceUnit {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceUnit::Feet => "Feet",
            DistanceUnit::Miles => "Miles",
            DistanceUnit::Meters => "Meters",
            DistanceUnit::Kilometers => "Kilometers",
        }
    }

    /// Short label used on scale bars
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DistanceUnit::Feet => "ft",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
        }
    }

    /// Meters in one of this unit
    pub fn meters(&self) -> f64 {
        match self {
            DistanceUnit::Feet => 1.0 / FEET_PER_METER,
            DistanceUnit::Miles => FEET_PER_MILE / FEET_PER_METER,
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts a distance to degrees using the flat-earth constant
pub fn distance_in_units_to_degrees(distance: f64, unit: DistanceUnit) -> f64 {
    distance * unit.meters() / WORLD_METERS_PER_DEGREE
}

/// Distance from `p` to the segment `a`-`b` in degree space, with the
/// closest point on the segment.
pub fn point_segment_distance(
    p: &WorldPoint,
    a: &WorldPoint,
    b: &WorldPoint,
) -> (f64, WorldPoint) {
    let dx = b.longitude - a.longitude;
    let dy = b.latitude - a.latitude;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return (p.distance_to(a), *a);
    }

    let t = (((p.longitude - a.longitude) * dx + (p.latitude - a.latitude) * dy) / len_sq)
        .clamp(0.0, 1.0);
    let closest = a.lerp(b, t);
    (p.distance_to(&closest), closest)
}
