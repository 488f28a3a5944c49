//! Placing a house number along a road.
//!
//! A road segment stores one address range per side. A number is turned into
//! a fraction of the road's length, then into a point on the polyline, pushed
//! off the centreline towards the side that carries the number.

use crate::core::constants::HIGHLIGHT_DISTANCE_FROM_ROAD;
use crate::core::geo::WorldPoint;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Side of a road relative to its direction of travel (first point to last)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadSide {
    Center,
    Left,
    Right,
}

impl RoadSide {
    pub fn opposite(self) -> Self {
        match self {
            RoadSide::Center => RoadSide::Center,
            RoadSide::Left => RoadSide::Right,
            RoadSide::Right => RoadSide::Left,
        }
    }
}

/// Address numbers along one side of a road.
///
/// `start` is the number at the road's first point and `end` the number at
/// its last point, so `start > end` means numbers decrease along the road.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: i32,
    pub end: i32,
}

impl AddressRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// `0-0` marks a side without addresses
    pub fn is_empty(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn low(&self) -> i32 {
        self.start.min(self.end)
    }

    pub fn high(&self) -> i32 {
        self.start.max(self.end)
    }

    pub fn is_descending(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, number: i32) -> bool {
        number >= self.low() && number <= self.high()
    }

    /// Odd numbers need an odd endpoint, even numbers an even one
    pub fn matches_parity(&self, number: i32) -> bool {
        let parity = number.rem_euclid(2);
        self.start.rem_euclid(2) == parity || self.end.rem_euclid(2) == parity
    }
}

/// Where `number` falls along the road, as a fraction of its length from the
/// first point, or `None` when this side cannot hold the number.
///
/// A zero-width range maps to the middle of the road.
pub fn address_fraction(number: i32, range: &AddressRange) -> Option<f64> {
    if range.is_empty() || !range.matches_parity(number) || !range.contains(number) {
        return None;
    }

    let (low, high) = (range.low(), range.high());
    if low == high {
        return Some(0.5);
    }

    let fraction = (number - low) as f64 / (high - low) as f64;
    Some(if range.is_descending() {
        1.0 - fraction
    } else {
        fraction
    })
}

/// Point at `fraction` of the polyline's planar length, offset perpendicular
/// to the local segment for `Left` and `Right`.
///
/// Fractions `0.0` and `1.0` with `Center` return the first and last points
/// exactly. Zero-length segments are skipped.
pub fn interpolate_address_point(
    points: &[WorldPoint],
    fraction: f64,
    side: RoadSide,
) -> Result<WorldPoint> {
    interpolate_with_offset(points, fraction, side, HIGHLIGHT_DISTANCE_FROM_ROAD)
}

/// [`interpolate_address_point`] with an explicit offset in degrees
pub fn interpolate_with_offset(
    points: &[WorldPoint],
    fraction: f64,
    side: RoadSide,
    offset: f64,
) -> Result<WorldPoint> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(MapError::OutOfRange {
            what: "address fraction",
            value: fraction,
        });
    }
    if points.len() < 2 {
        return Err(MapError::DegenerateGeometry(format!(
            "cannot interpolate along {} point(s)",
            points.len()
        )));
    }

    let segments: Vec<(WorldPoint, WorldPoint, f64)> = points
        .windows(2)
        .map(|w| (w[0], w[1], w[0].distance_to(&w[1])))
        .filter(|&(_, _, len)| len > 0.0)
        .collect();
    let total: f64 = segments.iter().map(|&(_, _, len)| len).sum();
    if segments.is_empty() || total <= 0.0 {
        return Err(MapError::DegenerateGeometry(
            "polyline has zero length".to_string(),
        ));
    }

    let mut remaining = total * fraction;
    let last = segments.len() - 1;
    for (i, &(a, b, len)) in segments.iter().enumerate() {
        if remaining <= len || i == last {
            let t = (remaining / len).clamp(0.0, 1.0);
            let on_line = if t >= 1.0 {
                b
            } else if t <= 0.0 {
                a
            } else {
                a.lerp(&b, t)
            };
            return Ok(offset_point(on_line, &a, &b, len, side, offset));
        }
        remaining -= len;
    }

    // segments is non-empty, so the loop always returns
    Err(MapError::DegenerateGeometry(
        "polyline walk did not terminate".to_string(),
    ))
}

fn offset_point(
    point: WorldPoint,
    a: &WorldPoint,
    b: &WorldPoint,
    len: f64,
    side: RoadSide,
    offset: f64,
) -> WorldPoint {
    let rise = b.latitude - a.latitude;
    let run = b.longitude - a.longitude;
    // Unit normal pointing to the left of travel, as (longitude, latitude)
    let normal_lon = -rise / len;
    let normal_lat = run / len;

    let sign = match side {
        RoadSide::Center => return point,
        RoadSide::Left => 1.0,
        RoadSide::Right => -1.0,
    };
    WorldPoint::new(
        point.latitude + sign * normal_lat * offset,
        point.longitude + sign * normal_lon * offset,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn main_st() -> Vec<WorldPoint> {
        vec![WorldPoint::new(42.0, -71.0), WorldPoint::new(42.01, -71.0)]
    }

    fn bent() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(0.0, 3.0),
            WorldPoint::new(0.0, 3.0),
            WorldPoint::new(4.0, 3.0),
        ]
    }

    #[test]
    fn test_endpoints_exact() {
        let poly = bent();
        assert_eq!(interpolate_address_point(&poly, 0.0, RoadSide::Center).unwrap(), poly[0]);
        assert_eq!(interpolate_address_point(&poly, 1.0, RoadSide::Center).unwrap(), poly[3]);
    }

    #[test]
    fn test_walks_by_length() {
        // Total length 7; 3/7 lands on the corner
        let p = interpolate_address_point(&bent(), 3.0 / 7.0, RoadSide::Center).unwrap();
        assert_abs_diff_eq!(p.latitude, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.longitude, 3.0, epsilon = 1e-12);

        let p = interpolate_address_point(&bent(), 5.0 / 7.0, RoadSide::Center).unwrap();
        assert_abs_diff_eq!(p.latitude, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.longitude, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_left_right_reflect() {
        let poly = main_st();
        let center = interpolate_address_point(&poly, 0.3, RoadSide::Center).unwrap();
        let left = interpolate_address_point(&poly, 0.3, RoadSide::Left).unwrap();
        let right = interpolate_address_point(&poly, 0.3, RoadSide::Right).unwrap();

        assert_abs_diff_eq!(center.distance_to(&left), HIGHLIGHT_DISTANCE_FROM_ROAD, epsilon = 1e-12);
        assert_abs_diff_eq!(center.distance_to(&right), HIGHLIGHT_DISTANCE_FROM_ROAD, epsilon = 1e-12);
        assert_abs_diff_eq!(
            (left.longitude + right.longitude) / 2.0,
            center.longitude,
            epsilon = 1e-12
        );

        // Heading north, left is west
        assert!(left.longitude < center.longitude);
        assert!(right.longitude > center.longitude);
    }

    #[test]
    fn test_interpolation_errors() {
        assert!(matches!(
            interpolate_address_point(&main_st(), 1.5, RoadSide::Center),
            Err(MapError::OutOfRange { .. })
        ));
        assert!(interpolate_address_point(&main_st(), f64::NAN, RoadSide::Center).is_err());
        assert!(matches!(
            interpolate_address_point(&main_st()[..1], 0.5, RoadSide::Center),
            Err(MapError::DegenerateGeometry(_))
        ));
        let stuck = vec![WorldPoint::new(1.0, 1.0); 3];
        assert!(matches!(
            interpolate_address_point(&stuck, 0.5, RoadSide::Left),
            Err(MapError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_address_fraction() {
        let range = AddressRange::new(100, 200);
        assert_eq!(address_fraction(150, &range), Some(0.5));
        assert_eq!(address_fraction(100, &range), Some(0.0));
        assert_eq!(address_fraction(202, &range), None);
        assert_eq!(address_fraction(151, &range), None);
    }

    #[test]
    fn test_descending_range_flips_end() {
        let range = AddressRange::new(200, 100);
        assert_eq!(address_fraction(200, &range), Some(0.0));
        assert_abs_diff_eq!(address_fraction(120, &range).unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_parity_filter() {
        let odd = AddressRange::new(97, 157);
        assert!(!odd.matches_parity(124));
        assert_eq!(address_fraction(124, &odd), None);
        assert!(address_fraction(125, &odd).is_some());

        // One even endpoint is enough
        let mixed = AddressRange::new(97, 158);
        assert!(address_fraction(124, &mixed).is_some());
    }

    #[test]
    fn test_zero_width_and_empty_ranges() {
        assert_eq!(address_fraction(12, &AddressRange::new(12, 12)), Some(0.5));
        assert_eq!(address_fraction(0, &AddressRange::default()), None);
    }
}
