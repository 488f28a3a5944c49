use crate::core::bounds::PixelPoint;
use crate::core::geo::WorldPoint;

/// Values that can be blended between two endpoints
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Interpolation helpers
pub struct Interpolation;

impl Interpolation {
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Blends two values by a fraction shaped elsewhere; exact at both ends
    pub fn between<T: Interpolatable + Copy>(start: &T, end: &T, t: f64) -> T {
        if t <= 0.0 {
            *start
        } else if t >= 1.0 {
            *end
        } else {
            start.lerp(end, t)
        }
    }
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }
}

impl Interpolatable for WorldPoint {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        // Inherent method; the segment walk uses the same blend
        WorldPoint::lerp(self, other, t)
    }
}

impl Interpolatable for PixelPoint {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        PixelPoint::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}
