//! Per-frame geometry preparation.
//!
//! Turns fetched objects into backend draw calls for one draw step: cull by
//! bounding box, enforce vertex limits, clip what straddles the view, then
//! project to screen space with the style's pixel offset.

use crate::core::bounds::ScreenPoint;
use crate::core::geo::{Overlap, WorldPoint};
use crate::core::metrics::RenderMetrics;
use crate::data::object::MapObject;
use crate::layers::style::LayerStyle;
use crate::rendering::backend::RenderBackend;
use crate::search::address::{interpolate_address_point, RoadSide};
use crate::spatial::clip::{clip_polyline_runs, clip_polyline_to_rect};
use crate::spatial::culling::Culling;

/// Which passes a frame runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawFlags {
    pub geometry: bool,
    pub labels: bool,
}

impl DrawFlags {
    /// Everything: the full-fidelity frame
    pub const ALL: DrawFlags = DrawFlags {
        geometry: true,
        labels: true,
    };

    /// Geometry only, drawn while the view is moving
    pub const GEOMETRY: DrawFlags = DrawFlags {
        geometry: true,
        labels: false,
    };

    pub const LABELS: DrawFlags = DrawFlags {
        geometry: false,
        labels: true,
    };
}

impl Default for DrawFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Counters for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub steps: usize,
    pub fills: usize,
    pub polylines: usize,
    pub polygons: usize,
    pub labels: usize,
    /// Objects whose bounds miss the view
    pub culled: usize,
    /// Objects that straddled the view edge
    pub clipped: usize,
    /// Degenerate or over-long objects
    pub skipped: usize,
}

/// Emits the draw calls of one frame against a fixed transform
pub struct FramePipeline<'a> {
    metrics: &'a RenderMetrics,
    max_vertices: usize,
    stats: DrawStats,
}

impl<'a> FramePipeline<'a> {
    pub fn new(metrics: &'a RenderMetrics, max_vertices: usize) -> Self {
        Self {
            metrics,
            max_vertices,
            stats: DrawStats::default(),
        }
    }

    pub fn stats(&self) -> &DrawStats {
        &self.stats
    }

    pub fn finish(self) -> DrawStats {
        self.stats
    }

    pub fn begin_step(&mut self) {
        self.stats.steps += 1;
    }

    /// Full-viewport wash; textures are anchored at the world origin
    pub fn fill(&mut self, backend: &mut dyn RenderBackend, style: &LayerStyle) {
        if !style.draws_fill() {
            return;
        }
        let origin = self.metrics.project(&WorldPoint::new(0.0, 0.0));
        backend.fill_viewport(style, origin);
        self.stats.fills += 1;
    }

    pub fn lines(
        &mut self,
        backend: &mut dyn RenderBackend,
        objects: &[MapObject],
        style: &LayerStyle,
    ) {
        if !style.draws_lines() {
            return;
        }
        for object in objects {
            let Some(overlap) = self.admit(object, 2) else {
                continue;
            };
            match overlap {
                Overlap::Full => {
                    let screen = self.to_screen(&object.points, style);
                    backend.draw_polyline(&screen, style);
                    self.stats.polylines += 1;
                }
                _ => {
                    self.stats.clipped += 1;
                    for run in clip_polyline_runs(&object.points, self.metrics.bounding_box()) {
                        if run.len() < 2 {
                            continue;
                        }
                        let screen = self.to_screen(&run, style);
                        backend.draw_polyline(&screen, style);
                        self.stats.polylines += 1;
                    }
                }
            }
        }
    }

    /// Polygons straddling the view are clipped as an open polyline. The
    /// result is not re-closed along the view edge, so such fills are an
    /// approximation near the border.
    pub fn polygons(
        &mut self,
        backend: &mut dyn RenderBackend,
        objects: &[MapObject],
        style: &LayerStyle,
    ) {
        if !style.draws_fill() {
            return;
        }
        for object in objects {
            let Some(overlap) = self.admit(object, 3) else {
                continue;
            };
            let clipped;
            let points = match overlap {
                Overlap::Full => object.points.as_slice(),
                _ => {
                    self.stats.clipped += 1;
                    clipped = clip_polyline_to_rect(&object.points, self.metrics.bounding_box());
                    if clipped.len() < 3 {
                        log::trace!("polygon {} clipped to {} point(s)", object.id, clipped.len());
                        continue;
                    }
                    clipped.as_slice()
                }
            };
            let screen = self.to_screen(points, style);
            backend.draw_polygon(&screen, style);
            self.stats.polygons += 1;
        }
    }

    /// Names placed at the halfway point along each line
    pub fn line_labels(
        &mut self,
        backend: &mut dyn RenderBackend,
        objects: &[MapObject],
        style: &LayerStyle,
    ) {
        if !style.draws_labels() {
            return;
        }
        for object in objects {
            let Some(text) = object.attributes.display_name() else {
                continue;
            };
            let anchor = match interpolate_address_point(&object.points, 0.5, RoadSide::Center) {
                Ok(anchor) => anchor,
                Err(e) => {
                    log::trace!("no label anchor for {}: {}", object.id, e);
                    continue;
                }
            };
            self.label(backend, &text, &anchor, style);
        }
    }

    /// Names placed at the center of each polygon's bounding box
    pub fn polygon_labels(
        &mut self,
        backend: &mut dyn RenderBackend,
        objects: &[MapObject],
        style: &LayerStyle,
    ) {
        if !style.draws_labels() {
            return;
        }
        for object in objects {
            if let Some(text) = object.attributes.display_name() {
                self.label(backend, &text, &object.bounds.center(), style);
            }
        }
    }

    fn label(
        &mut self,
        backend: &mut dyn RenderBackend,
        text: &str,
        anchor: &WorldPoint,
        style: &LayerStyle,
    ) {
        if !Culling::point_visible(self.metrics.bounding_box(), anchor) {
            return;
        }
        let screen = self.transform(anchor, style);
        backend.draw_label(text, screen, style);
        self.stats.labels += 1;
    }

    /// Culls and size-checks one object, returning how it overlaps the view
    fn admit(&mut self, object: &MapObject, min_points: usize) -> Option<Overlap> {
        let overlap = Culling::classify(self.metrics.bounding_box(), &object.bounds);
        if overlap == Overlap::None {
            self.stats.culled += 1;
            return None;
        }
        if object.points.len() < min_points {
            log::debug!(
                "skipping {} {}: {} point(s), need {}",
                object.object_type,
                object.id,
                object.points.len(),
                min_points
            );
            self.stats.skipped += 1;
            return None;
        }
        if object.points.len() > self.max_vertices {
            log::debug!(
                "skipping {} {}: {} vertices exceeds {}",
                object.object_type,
                object.id,
                object.points.len(),
                self.max_vertices
            );
            self.stats.skipped += 1;
            return None;
        }
        Some(overlap)
    }

    fn transform(&self, point: &WorldPoint, style: &LayerStyle) -> ScreenPoint {
        self.metrics
            .world_to_screen(point)
            .offset(style.pixel_offset_x, style.pixel_offset_y)
    }

    fn to_screen(&self, points: &[WorldPoint], style: &LayerStyle) -> Vec<ScreenPoint> {
        points.iter().map(|p| self.transform(p, style)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Dimensions;
    use crate::data::object::{ObjectAttributes, ObjectType};
    use crate::layers::style::Color;
    use crate::rendering::backend::{DrawCall, RecordingBackend};

    fn metrics() -> RenderMetrics {
        RenderMetrics::compute(WorldPoint::new(42.0, -71.0), 8, Dimensions::new(400, 300))
            .unwrap()
    }

    fn line_style() -> LayerStyle {
        LayerStyle {
            color: Color::rgb(0, 0, 0),
            line_width: 3.0,
            ..Default::default()
        }
    }

    fn road(id: u64, points: Vec<WorldPoint>) -> MapObject {
        let attributes = ObjectAttributes {
            name: Some("Main".to_string()),
            suffix: Some("St".to_string()),
            ..Default::default()
        };
        MapObject::new(id, ObjectType::MinorRoad, points, attributes).unwrap()
    }

    #[test]
    fn test_inside_line_drawn_unclipped() {
        let m = metrics();
        let c = m.center();
        let object = road(
            1,
            vec![
                WorldPoint::new(c.latitude, c.longitude - 0.001),
                WorldPoint::new(c.latitude, c.longitude + 0.001),
            ],
        );
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 2000);
        pipeline.lines(&mut backend, &[object], &line_style());
        let stats = pipeline.finish();
        assert_eq!(stats.polylines, 1);
        assert_eq!(stats.clipped, 0);
        let line: Vec<_> = backend.polylines().next().unwrap().to_vec();
        assert_eq!(line.len(), 2);
        assert!(line[0].x < line[1].x);
        assert_eq!(line[0].y, 150);
    }

    #[test]
    fn test_outside_line_culled() {
        let m = metrics();
        let object = road(1, vec![WorldPoint::new(10.0, 10.0), WorldPoint::new(10.1, 10.1)]);
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 2000);
        pipeline.lines(&mut backend, &[object], &line_style());
        assert_eq!(pipeline.stats().culled, 1);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_straddling_line_clipped_to_view() {
        let m = metrics();
        let c = m.center();
        let object = road(
            1,
            vec![
                WorldPoint::new(c.latitude, c.longitude),
                WorldPoint::new(c.latitude, c.longitude + 10.0),
            ],
        );
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 2000);
        pipeline.lines(&mut backend, &[object], &line_style());
        assert_eq!(pipeline.stats().clipped, 1);
        let line = backend.polylines().next().unwrap();
        assert_eq!(line.last().unwrap().x, 400);
    }

    #[test]
    fn test_vertex_limit_and_degenerate() {
        let m = metrics();
        let c = m.center();
        let many: Vec<_> = (0..10)
            .map(|i| WorldPoint::new(c.latitude, c.longitude + i as f64 * 1e-5))
            .collect();
        let single = road(2, vec![c]);
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 5);
        pipeline.lines(&mut backend, &[road(1, many), single], &line_style());
        assert_eq!(pipeline.stats().skipped, 2);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_pixel_offset_applied() {
        let m = metrics();
        let c = m.center();
        let object = road(1, vec![c, WorldPoint::new(c.latitude + 0.001, c.longitude)]);
        let style = LayerStyle {
            pixel_offset_x: 2,
            pixel_offset_y: -1,
            ..line_style()
        };
        let mut backend = RecordingBackend::new();
        FramePipeline::new(&m, 2000).lines(&mut backend, &[object], &style);
        let first = backend.polylines().next().unwrap()[0];
        assert_eq!(first, ScreenPoint::new(202, 149));
    }

    #[test]
    fn test_invisible_style_draws_nothing() {
        let m = metrics();
        let c = m.center();
        let object = road(1, vec![c, WorldPoint::new(c.latitude + 0.001, c.longitude)]);
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 2000);
        pipeline.lines(&mut backend, &[object.clone()], &LayerStyle::default());
        pipeline.line_labels(&mut backend, &[object], &LayerStyle::default());
        pipeline.fill(&mut backend, &LayerStyle::default());
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_labels_at_midpoint() {
        let m = metrics();
        let c = m.center();
        let object = road(
            1,
            vec![
                WorldPoint::new(c.latitude, c.longitude - 0.002),
                WorldPoint::new(c.latitude, c.longitude + 0.002),
            ],
        );
        let style = LayerStyle {
            color: Color::rgb(0, 0, 0),
            font_size: 9.0,
            ..Default::default()
        };
        let mut backend = RecordingBackend::new();
        FramePipeline::new(&m, 2000).line_labels(&mut backend, &[object], &style);
        match &backend.calls[0] {
            DrawCall::Label { text, anchor, .. } => {
                assert_eq!(text, "Main St");
                assert_eq!(*anchor, ScreenPoint::new(200, 150));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let m = metrics();
        let c = m.center();
        let style = LayerStyle {
            color: Color::rgb(0, 0, 255),
            ..Default::default()
        };
        let triangle = MapObject::new(
            1,
            ObjectType::Lake,
            vec![
                c,
                WorldPoint::new(c.latitude + 0.001, c.longitude),
                WorldPoint::new(c.latitude, c.longitude + 0.001),
            ],
            ObjectAttributes::default(),
        )
        .unwrap();
        let sliver = MapObject::new(
            2,
            ObjectType::Lake,
            vec![c, WorldPoint::new(c.latitude + 0.001, c.longitude)],
            ObjectAttributes::default(),
        )
        .unwrap();
        let mut backend = RecordingBackend::new();
        let mut pipeline = FramePipeline::new(&m, 2000);
        pipeline.polygons(&mut backend, &[triangle, sliver], &style);
        assert_eq!(pipeline.stats().polygons, 1);
        assert_eq!(pipeline.stats().skipped, 1);
        assert_eq!(backend.polygons().next().unwrap().len(), 3);
    }
}
