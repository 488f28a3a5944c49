use serde::{Deserialize, Serialize};

/// A device pixel position local to the current viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i16,
    pub y: i16,
}

impl ScreenPoint {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Rounds a sub-pixel position, saturating at the `i16` range
    pub fn from_pixel(p: PixelPoint) -> Self {
        Self::new(saturate(p.x), saturate(p.y))
    }

    pub fn to_pixel(self) -> PixelPoint {
        PixelPoint::new(self.x as f64, self.y as f64)
    }

    /// Returns this point moved by the given offset, saturating
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

fn saturate(v: f64) -> i16 {
    let rounded = v.round();
    if rounded.is_nan() {
        0
    } else if rounded >= i16::MAX as f64 {
        i16::MAX
    } else if rounded <= i16::MIN as f64 {
        i16::MIN
    } else {
        rounded as i16
    }
}

/// A sub-pixel position; the exact counterpart of [`ScreenPoint`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in device pixels; `a` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub a: ScreenPoint,
    pub b: ScreenPoint,
}

impl ScreenRect {
    /// Creates a rectangle from any two opposite corners
    pub fn new(p1: ScreenPoint, p2: ScreenPoint) -> Self {
        Self {
            a: ScreenPoint::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            b: ScreenPoint::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    pub fn from_coords(x1: i16, y1: i16, x2: i16, y2: i16) -> Self {
        Self::new(ScreenPoint::new(x1, y1), ScreenPoint::new(x2, y2))
    }

    /// Creates a rectangle from its top-left corner and size
    pub fn from_origin_and_size(origin: ScreenPoint, width: i16, height: i16) -> Self {
        Self::new(origin, origin.offset(width, height))
    }

    pub fn width(&self) -> i16 {
        self.b.x.saturating_sub(self.a.x)
    }

    pub fn height(&self) -> i16 {
        self.b.y.saturating_sub(self.a.y)
    }

    /// Checks if the rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.a.x && point.x <= self.b.x && point.y >= self.a.y && point.y <= self.b.y
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            ((self.a.x as i32 + self.b.x as i32) / 2) as i16,
            ((self.a.y as i32 + self.b.y as i32) / 2) as i16,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixel_rounds_and_saturates() {
        assert_eq!(
            ScreenPoint::from_pixel(PixelPoint::new(10.4, 10.6)),
            ScreenPoint::new(10, 11)
        );
        assert_eq!(
            ScreenPoint::from_pixel(PixelPoint::new(1e9, -1e9)),
            ScreenPoint::new(i16::MAX, i16::MIN)
        );
        assert_eq!(
            ScreenPoint::from_pixel(PixelPoint::new(f64::NAN, 0.0)),
            ScreenPoint::new(0, 0)
        );
    }

    #[test]
    fn test_screen_rect_normalizes() {
        let rect = ScreenRect::from_coords(50, 40, 10, 20);
        assert_eq!(rect.a, ScreenPoint::new(10, 20));
        assert_eq!(rect.b, ScreenPoint::new(50, 40));
        assert_eq!(rect.width(), 40);
        assert_eq!(rect.height(), 20);
        assert_eq!(rect.center(), ScreenPoint::new(30, 30));
    }

    #[test]
    fn test_screen_rect_contains() {
        let rect = ScreenRect::from_origin_and_size(ScreenPoint::new(0, 0), 10, 10);
        assert!(rect.contains(&ScreenPoint::new(0, 0)));
        assert!(rect.contains(&ScreenPoint::new(10, 10)));
        assert!(!rect.contains(&ScreenPoint::new(11, 5)));
    }

    #[test]
    fn test_pixel_distance() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.subtract(&a).add(&a), b);
    }
}
