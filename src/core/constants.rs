//! Core constants for the map geometry engine.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Screen resolution assumed when converting map scale (1:N) to pixels.
pub const PIXELS_PER_INCH: f64 = 85.333;

/// Inches in one meter.
pub const INCHES_PER_METER: f64 = 39.37007;

/// Equatorial circumference used for the flat-earth degree conversion.
pub const WORLD_CIRCUMFERENCE_IN_METERS: f64 = 40_075_452.7;

/// Meters covered by one degree of latitude or longitude.
pub const WORLD_METERS_PER_DEGREE: f64 = WORLD_CIRCUMFERENCE_IN_METERS / 360.0;

/// Mean earth radius for great-circle distances.
pub const RADIUS_OF_WORLD_IN_METERS: f64 = 6_371_010.0;

/// Feet in one meter.
pub const FEET_PER_METER: f64 = 3.280_839_9;

/// Feet in one statute mile.
pub const FEET_PER_MILE: f64 = 5280.0;

/// Tolerance used when comparing world coordinates.
pub const POINT_EPSILON: f64 = 1e-9;

/// Largest vertex count sent to the backend in a single draw call.
pub const MAX_LINE_SEGMENTS: usize = 2000;

/// Perpendicular distance, in degrees, between a road centreline and an address point.
pub const HIGHLIGHT_DISTANCE_FROM_ROAD: f64 = 0.00012;

/// URLs collected into one location balloon.
pub const MAX_LOCATION_SELECTION_URLS: usize = 5;

/// Upper bound on results returned by a single road search.
pub const SEARCH_RESULT_COUNT_LIMIT: usize = 400;

/// Upper bound on results returned by a single location search.
pub const LOCATION_SEARCH_RESULT_LIMIT: usize = 100;
