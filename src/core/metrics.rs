use crate::core::bounds::{PixelPoint, ScreenPoint};
use crate::core::geo::{WorldPoint, WorldRect};
use crate::core::viewport::Dimensions;
use crate::core::zoom::{self, ZoomLevel};
use crate::{MapError, Result};

/// A snapshot of the world/screen transform for one view.
///
/// The bounding box is derived from the center, zoom level and viewport size
/// through the zoom table's fixed degrees-per-pixel; it is never set on its
/// own. Recompute a new snapshot whenever any input changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMetrics {
    zoom_level: u8,
    center: WorldPoint,
    bounding_box: WorldRect,
    dimensions: Dimensions,
    degrees_per_pixel: f64,
}

impl RenderMetrics {
    /// Builds the transform for a view.
    ///
    /// Fails with `OutOfRange` for a zoom level outside the table and with
    /// `InvalidViewport` when either dimension is zero.
    pub fn compute(center: WorldPoint, zoom_level: u8, dimensions: Dimensions) -> Result<Self> {
        let row = zoom::zoom_level(zoom_level)?;
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(MapError::InvalidViewport {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let degrees_per_pixel = row.degrees_per_pixel();
        let half_lon = dimensions.width as f64 * degrees_per_pixel / 2.0;
        let half_lat = dimensions.height as f64 * degrees_per_pixel / 2.0;
        let bounding_box = WorldRect::from_coords(
            center.latitude - half_lat,
            center.longitude - half_lon,
            center.latitude + half_lat,
            center.longitude + half_lon,
        );

        Ok(Self {
            zoom_level,
            center,
            bounding_box,
            dimensions,
            degrees_per_pixel,
        })
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    /// The zoom table row for this snapshot
    pub fn zoom_row(&self) -> Result<&'static ZoomLevel> {
        zoom::zoom_level(self.zoom_level)
    }

    pub fn style_bucket(&self) -> u8 {
        self.zoom_row().map(|row| row.style_bucket).unwrap_or(1)
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    /// The world rectangle visible in the viewport
    pub fn bounding_box(&self) -> &WorldRect {
        &self.bounding_box
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn degrees_per_pixel(&self) -> f64 {
        self.degrees_per_pixel
    }

    /// Longitude span of the viewport in degrees
    pub fn screen_longitude_span(&self) -> f64 {
        self.bounding_box.width()
    }

    /// Latitude span of the viewport in degrees
    pub fn screen_latitude_span(&self) -> f64 {
        self.bounding_box.height()
    }

    /// Exact world to pixel transform. North is up: latitude maps to
    /// `[height, 0]` and longitude to `[0, width]`.
    pub fn project(&self, point: &WorldPoint) -> PixelPoint {
        let a = &self.bounding_box.a;
        PixelPoint::new(
            (point.longitude - a.longitude) / self.degrees_per_pixel,
            self.dimensions.height as f64 - (point.latitude - a.latitude) / self.degrees_per_pixel,
        )
    }

    /// Inverse of [`RenderMetrics::project`]
    pub fn unproject(&self, pixel: &PixelPoint) -> WorldPoint {
        let a = &self.bounding_box.a;
        WorldPoint::new(
            a.latitude + (self.dimensions.height as f64 - pixel.y) * self.degrees_per_pixel,
            a.longitude + pixel.x * self.degrees_per_pixel,
        )
    }

    /// World to device pixel, rounded to the nearest pixel and saturated at
    /// the `i16` range for points far outside the view.
    pub fn world_to_screen(&self, point: &WorldPoint) -> ScreenPoint {
        ScreenPoint::from_pixel(self.project(point))
    }

    /// Device pixel to world; accurate to half a pixel
    pub fn screen_to_world(&self, point: &ScreenPoint) -> WorldPoint {
        self.unproject(&point.to_pixel())
    }

    /// Screen distance between two world points
    pub fn distance_in_pixels(&self, a: &WorldPoint, b: &WorldPoint) -> f64 {
        self.project(a).distance_to(&self.project(b))
    }

    /// Converts a pixel length to degrees at this zoom level
    pub fn pixels_to_degrees(&self, pixels: f64) -> f64 {
        pixels * self.degrees_per_pixel
    }
}
