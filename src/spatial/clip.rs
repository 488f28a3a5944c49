//! Polyline clipping against a world rectangle.
//!
//! Each segment goes through Cohen-Sutherland clipping; the surviving pieces
//! are stitched back into runs wherever consecutive pieces share an endpoint.
//! Polygons are clipped as open polylines, so a clipped polygon is neither
//! closed nor re-triangulated along the rectangle edge.

use crate::core::geo::{WorldPoint, WorldRect};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// Outcode of a point; x is longitude, y is latitude
fn outcode(p: &WorldPoint, rect: &WorldRect) -> u8 {
    let mut code = INSIDE;

    if p.longitude < rect.a.longitude {
        code |= LEFT;
    } else if p.longitude > rect.b.longitude {
        code |= RIGHT;
    }

    if p.latitude < rect.a.latitude {
        code |= BOTTOM;
    } else if p.latitude > rect.b.latitude {
        code |= TOP;
    }

    code
}

fn clamp_to_rect(p: WorldPoint, rect: &WorldRect) -> WorldPoint {
    WorldPoint::new(
        p.latitude.clamp(rect.a.latitude, rect.b.latitude),
        p.longitude.clamp(rect.a.longitude, rect.b.longitude),
    )
}

/// Clips one segment, returning the visible part if any
pub fn clip_segment(
    p0: WorldPoint,
    p1: WorldPoint,
    rect: &WorldRect,
) -> Option<(WorldPoint, WorldPoint)> {
    let (mut p0, mut p1) = (p0, p1);
    let mut code0 = outcode(&p0, rect);
    let mut code1 = outcode(&p1, rect);

    loop {
        if code0 | code1 == INSIDE {
            return Some((p0, p1));
        }
        if code0 & code1 != INSIDE {
            return None;
        }

        let code_out = if code0 != INSIDE { code0 } else { code1 };
        let dx = p1.longitude - p0.longitude;
        let dy = p1.latitude - p0.latitude;

        // Both divisors are non-zero: the endpoints sit on opposite sides of the edge
        let clipped = if code_out & TOP != 0 {
            let lat = rect.b.latitude;
            WorldPoint::new(lat, p0.longitude + dx * (lat - p0.latitude) / dy)
        } else if code_out & BOTTOM != 0 {
            let lat = rect.a.latitude;
            WorldPoint::new(lat, p0.longitude + dx * (lat - p0.latitude) / dy)
        } else if code_out & RIGHT != 0 {
            let lon = rect.b.longitude;
            WorldPoint::new(p0.latitude + dy * (lon - p0.longitude) / dx, lon)
        } else {
            let lon = rect.a.longitude;
            WorldPoint::new(p0.latitude + dy * (lon - p0.longitude) / dx, lon)
        };

        let clipped = snap_to_rect(clipped, rect);
        if code_out == code0 {
            p0 = clipped;
            code0 = outcode(&p0, rect);
        } else {
            p1 = clipped;
            code1 = outcode(&p1, rect);
        }
    }
}

/// Rounding can leave an intersection a hair outside the rectangle; pull
/// such points onto the edge.
fn snap_to_rect(p: WorldPoint, rect: &WorldRect) -> WorldPoint {
    let clamped = clamp_to_rect(p, rect);
    if p.distance_to(&clamped) < SNAP_EPSILON {
        clamped
    } else {
        p
    }
}

const SNAP_EPSILON: f64 = 1e-12;

/// Clips a polyline into the separate runs that lie inside `rect`.
///
/// A polyline leaving and re-entering the rectangle produces one run per
/// visit, so a line renderer never joins an exit point to the next entry.
pub fn clip_polyline_runs(points: &[WorldPoint], rect: &WorldRect) -> Vec<Vec<WorldPoint>> {
    let mut runs: Vec<Vec<WorldPoint>> = Vec::new();

    if points.len() == 1 {
        if rect.contains(&points[0]) {
            runs.push(vec![points[0]]);
        }
        return runs;
    }

    let mut current: Vec<WorldPoint> = Vec::new();
    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], rect) {
            Some((c0, c1)) => {
                let continues = current.last().map_or(false, |last| *last == c0);
                if !continues {
                    if !current.is_empty() {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.push(c0);
                }
                current.push(c1);
            }
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Clips a polyline to `rect` as a single concatenated point sequence.
///
/// Boundary intersections are inserted where the line crosses an edge. A
/// polyline entirely inside `rect` is returned unchanged.
pub fn clip_polyline_to_rect(points: &[WorldPoint], rect: &WorldRect) -> Vec<WorldPoint> {
    clip_polyline_runs(points, rect).into_iter().flatten().collect()
}
