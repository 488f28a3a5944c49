use crate::core::bounds::{PixelPoint, ScreenPoint};
use crate::core::geo::WorldPoint;
use crate::core::metrics::RenderMetrics;
use crate::core::zoom::{self, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Viewport size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Manages the current view of the map: center, zoom level, and screen dimensions.
///
/// Every setter validates its input, so [`MapView::render_metrics`] only fails
/// if the view was built with invalid values in the first place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    center: WorldPoint,
    zoom_level: u8,
    dimensions: Dimensions,
}

impl MapView {
    /// Creates a new view, validating zoom level and dimensions
    pub fn new(center: WorldPoint, zoom_level: u8, dimensions: Dimensions) -> Result<Self> {
        // Validates both inputs in one place
        RenderMetrics::compute(center, zoom_level, dimensions)?;
        Ok(Self {
            center: clamp_center(center),
            zoom_level,
            dimensions,
        })
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Sets the center, clamped to valid latitude and longitude
    pub fn set_center(&mut self, center: WorldPoint) {
        self.center = clamp_center(center);
    }

    /// Sets the zoom level; out-of-table levels are rejected
    pub fn set_zoom_level(&mut self, zoom_level: u8) -> Result<()> {
        self.zoom_level = zoom::validate_zoom_level(zoom_level)?;
        Ok(())
    }

    /// Sets the viewport size; zero dimensions are rejected
    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<()> {
        if dimensions.is_empty() {
            return Err(MapError::InvalidViewport {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        self.dimensions = dimensions;
        Ok(())
    }

    /// Fresh transform snapshot for the current view
    pub fn render_metrics(&self) -> Result<RenderMetrics> {
        RenderMetrics::compute(self.center, self.zoom_level, self.dimensions)
    }

    /// Scale denominator of the current zoom level
    pub fn scale(&self) -> Result<u32> {
        Ok(zoom::zoom_level(self.zoom_level)?.scale)
    }

    pub fn can_zoom_in(&self) -> bool {
        zoom::can_zoom_in(self.zoom_level)
    }

    pub fn can_zoom_out(&self) -> bool {
        zoom::can_zoom_out(self.zoom_level)
    }

    /// Moves the center to the world point under a screen position
    pub fn center_on_screen_point(&mut self, point: ScreenPoint) -> Result<WorldPoint> {
        let metrics = self.render_metrics()?;
        let target = metrics.screen_to_world(&point);
        self.set_center(target);
        Ok(self.center)
    }

    /// Moves the view by a pixel offset: positive `dx` looks east,
    /// positive `dy` looks south.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) -> Result<WorldPoint> {
        let metrics = self.render_metrics()?;
        let current = metrics.project(&self.center);
        let target = metrics.unproject(&current.add(&PixelPoint::new(dx, dy)));
        self.set_center(target);
        Ok(self.center)
    }

    /// Zoom level clamped into the table
    pub fn clamp_zoom_level(level: i32) -> u8 {
        level.clamp(MIN_ZOOM_LEVEL as i32, MAX_ZOOM_LEVEL as i32) as u8
    }
}

fn clamp_center(center: WorldPoint) -> WorldPoint {
    WorldPoint::new(
        center.latitude.clamp(-90.0, 90.0),
        center.longitude.clamp(-180.0, 180.0),
    )
}
