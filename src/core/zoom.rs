//! The fixed zoom table.
//!
//! Each integer level carries a map scale (`1:N`), the style bucket whose
//! per-layer styles apply at that level, and the numbers shown on the scale
//! bar. Several levels share a bucket so style data is reused. The table is
//! built once and never changes; reloading styles does not touch it.

use crate::core::constants::{INCHES_PER_METER, PIXELS_PER_INCH, WORLD_METERS_PER_DEGREE};
use crate::core::geo::DistanceUnit;
use crate::{MapError, Result};
use once_cell::sync::Lazy;

pub const MIN_ZOOM_LEVEL: u8 = 1;
pub const MAX_ZOOM_LEVEL: u8 = 10;
pub const NUM_ZOOM_LEVELS: usize = (MAX_ZOOM_LEVEL - MIN_ZOOM_LEVEL + 1) as usize;

pub const MIN_STYLE_BUCKET: u8 = 1;
pub const MAX_STYLE_BUCKET: u8 = 5;

/// Location pins are shown, and hit-tested, at this level and closer.
pub const MIN_ZOOM_LEVEL_FOR_LOCATIONS: u8 = 7;

/// Level a search result asks the view to display.
pub const SEARCH_RESULT_ZOOM_LEVEL: u8 = 9;

/// Level a location search result asks for; pins are visible from here on.
pub const LOCATION_RESULT_ZOOM_LEVEL: u8 = MIN_ZOOM_LEVEL_FOR_LOCATIONS;

/// One row of the zoom table
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomLevel {
    pub level: u8,
    /// Map scale denominator
    pub scale: u32,
    pub style_bucket: u8,
    pub imperial_unit: DistanceUnit,
    pub imperial_number: u32,
    pub metric_unit: DistanceUnit,
    pub metric_number: u32,
    pub name: Option<&'static str>,
}

impl ZoomLevel {
    /// Degrees covered by one screen pixel, identical for both axes.
    pub fn degrees_per_pixel(&self) -> f64 {
        self.scale as f64 / (PIXELS_PER_INCH * INCHES_PER_METER) / WORLD_METERS_PER_DEGREE
    }

    /// Human-readable scale bar label, e.g. `"2 km / 1 mi"`
    pub fn scale_label(&self) -> String {
        format!(
            "{} {} / {} {}",
            self.metric_number,
            self.metric_unit.abbreviation(),
            self.imperial_number,
            self.imperial_unit.abbreviation()
        )
    }
}

static ZOOM_LEVELS: Lazy<Vec<ZoomLevel>> = Lazy::new(|| {
    use DistanceUnit::*;

    #[rustfmt::skip]
    let rows: [(u32, u8, DistanceUnit, u32, DistanceUnit, u32, Option<&'static str>); NUM_ZOOM_LEVELS] = [
        (25_000_000, 1, Miles, 300, Kilometers, 500, Some("Country")),
        (10_000_000, 1, Miles, 100, Kilometers, 200, None),
        ( 4_000_000, 2, Miles,  50, Kilometers, 100, Some("State")),
        ( 1_600_000, 2, Miles,  25, Kilometers,  40, None),
        (   640_000, 3, Miles,  10, Kilometers,  15, Some("Region")),
        (   256_000, 3, Miles,   3, Kilometers,   5, None),
        (   100_000, 4, Miles,   1, Kilometers,   2, Some("City")),
        (    40_000, 4, Feet, 2000, Kilometers,   1, None),
        (    16_000, 5, Feet, 1500, Meters,     400, Some("Neighborhood")),
        (     6_400, 5, Feet,  500, Meters,     150, Some("Street")),
    ];

    rows.iter()
        .enumerate()
        .map(
            |(i, &(scale, style_bucket, imperial_unit, imperial_number, metric_unit, metric_number, name))| {
                ZoomLevel {
                    level: MIN_ZOOM_LEVEL + i as u8,
                    scale,
                    style_bucket,
                    imperial_unit,
                    imperial_number,
                    metric_unit,
                    metric_number,
                    name,
                }
            },
        )
        .collect()
});

/// Checks that a level is inside the table
pub fn validate_zoom_level(level: u8) -> Result<u8> {
    if (MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(MapError::OutOfRange {
            what: "zoom level",
            value: level as f64,
        })
    }
}

/// Looks up a row of the zoom table
pub fn zoom_level(level: u8) -> Result<&'static ZoomLevel> {
    let level = validate_zoom_level(level)?;
    ZOOM_LEVELS
        .get((level - MIN_ZOOM_LEVEL) as usize)
        .ok_or(MapError::OutOfRange {
            what: "zoom level",
            value: level as f64,
        })
}

/// All rows, most zoomed out first
pub fn zoom_levels() -> &'static [ZoomLevel] {
    &ZOOM_LEVELS
}

/// Style bucket for a zoom level
pub fn zoom_level_to_bucket(level: u8) -> Result<u8> {
    Ok(zoom_level(level)?.style_bucket)
}

pub fn can_zoom_in(level: u8) -> bool {
    level < MAX_ZOOM_LEVEL
}

pub fn can_zoom_out(level: u8) -> bool {
    level > MIN_ZOOM_LEVEL
}

/// Converts a pixel distance to degrees at the given level
pub fn pixels_to_degrees(pixels: f64, level: u8) -> Result<f64> {
    Ok(pixels * zoom_level(level)?.degrees_per_pixel())
}

/// Converts a degree distance to pixels at the given level
pub fn degrees_to_pixels(degrees: f64, level: u8) -> Result<f64> {
    Ok(degrees / zoom_level(level)?.degrees_per_pixel())
}
