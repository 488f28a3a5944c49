use crate::core::bounds::ScreenPoint;
use crate::core::config::MapConfig;
use crate::core::geo::{point_segment_distance, WorldPoint, WorldRect};
use crate::core::metrics::RenderMetrics;
use crate::core::selection::{LocationSelection, SelectionSet};
use crate::core::viewport::{Dimensions, MapView};
use crate::core::zoom::MIN_ZOOM_LEVEL_FOR_LOCATIONS;
use crate::data::object::ObjectType;
use crate::input::hit::HitResult;
use crate::layers::scene::Scene;
use crate::layers::style::RenderType;
use crate::rendering::backend::RenderBackend;
use crate::rendering::pipeline::{DrawFlags, DrawStats, FramePipeline};
use crate::spatial::culling::Culling;
use crate::spatial::store::{SpatialStore, TileStore};
use crate::Result;

/// The map: a view, the layer list that styles it, the objects fetched for
/// it, and the open location balloons.
///
/// A `Map` holds no UI state and no reference to any store; callers pass the
/// store in when the view needs new data. Not synchronized: the owner
/// serializes every call.
#[derive(Debug, Clone)]
pub struct Map {
    view: MapView,
    scene: Scene,
    tiles: TileStore,
    selections: SelectionSet,
    config: MapConfig,
}

impl Map {
    pub fn new(view: MapView, scene: Scene, config: MapConfig) -> Self {
        let selections = SelectionSet::new(config.selection.max_selections);
        Self {
            view,
            scene,
            tiles: TileStore::empty(),
            selections,
            config,
        }
    }

    /// A map using the bundled style and default configuration
    pub fn with_default_style(view: MapView) -> Result<Self> {
        Ok(Self::new(view, Scene::default_style()?, MapConfig::default()))
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tiles(&self) -> &TileStore {
        &self.tiles
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn center(&self) -> WorldPoint {
        self.view.center()
    }

    pub fn zoom_level(&self) -> u8 {
        self.view.zoom_level()
    }

    pub fn render_metrics(&self) -> Result<RenderMetrics> {
        self.view.render_metrics()
    }

    pub fn set_center(&mut self, center: WorldPoint) {
        self.view.set_center(center);
        self.view_changed();
    }

    pub fn set_zoom_level(&mut self, zoom_level: u8) -> Result<()> {
        self.view.set_zoom_level(zoom_level)?;
        self.view_changed();
        Ok(())
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<()> {
        self.view.set_dimensions(dimensions)?;
        self.view_changed();
        Ok(())
    }

    /// Moves the view by a pixel offset; see [`MapView::pan_pixels`]
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) -> Result<WorldPoint> {
        let center = self.view.pan_pixels(dx, dy)?;
        self.view_changed();
        Ok(center)
    }

    pub fn center_on_screen_point(&mut self, point: ScreenPoint) -> Result<WorldPoint> {
        let center = self.view.center_on_screen_point(point)?;
        self.view_changed();
        Ok(center)
    }

    /// Replaces per-bucket styles; the current layers survive a bad document
    pub fn reload_styles(&mut self, json: &str) -> Result<()> {
        self.scene.reload_styles(json)
    }

    /// Balloon rects are screen-relative, so any view change moves them
    fn view_changed(&mut self) {
        match self.view.render_metrics() {
            Ok(metrics) => self.selections.layout(&metrics),
            Err(e) => log::debug!("selection layout skipped: {}", e),
        }
    }

    /// Whether the fetched objects no longer cover the current view
    pub fn needs_refresh(&self) -> bool {
        let Ok(metrics) = self.view.render_metrics() else {
            return false;
        };
        match self.tiles.region() {
            Some(region) => {
                self.tiles.bucket() != metrics.style_bucket()
                    || !region.contains_rect(metrics.bounding_box())
            }
            None => true,
        }
    }

    /// Fetches a fresh snapshot of every type the scene draws for the
    /// current view. Locations are fetched only where pins are shown.
    pub fn refresh(&mut self, store: &dyn SpatialStore) -> Result<()> {
        let metrics = self.view.render_metrics()?;
        let with_locations = metrics.zoom_level() >= MIN_ZOOM_LEVEL_FOR_LOCATIONS;
        self.tiles = TileStore::load(
            store,
            &self.scene.data_sources(),
            *metrics.bounding_box(),
            metrics.style_bucket(),
            with_locations,
        );
        log::debug!(
            "refreshed {} at zoom {} (bucket {}), {} location(s)",
            metrics.bounding_box().center(),
            metrics.zoom_level(),
            metrics.style_bucket(),
            self.tiles.locations().len()
        );
        Ok(())
    }

    /// Emits one frame to `backend`, back to front.
    ///
    /// Per-object problems are logged and skipped; only an invalid view
    /// fails the whole frame.
    pub fn draw(&self, backend: &mut dyn RenderBackend, flags: DrawFlags) -> Result<DrawStats> {
        let metrics = self.view.render_metrics()?;
        let steps = self.scene.draw_order(metrics.style_bucket())?;
        let mut pipeline = FramePipeline::new(&metrics, self.config.render.max_vertices);

        backend.begin_frame(metrics.dimensions(), flags);
        for step in steps {
            pipeline.begin_step();
            let objects = step
                .layer
                .data_source
                .map(|source| self.tiles.objects(source))
                .unwrap_or(&[]);
            match step.render_type {
                RenderType::Fill if flags.geometry => pipeline.fill(backend, step.style),
                RenderType::Lines if flags.geometry => {
                    pipeline.lines(backend, objects, step.style)
                }
                RenderType::Polygons if flags.geometry => {
                    pipeline.polygons(backend, objects, step.style)
                }
                RenderType::LineLabels if flags.labels => {
                    pipeline.line_labels(backend, objects, step.style)
                }
                RenderType::PolygonLabels if flags.labels => {
                    pipeline.polygon_labels(backend, objects, step.style)
                }
                // Pins are drawn by the caller from `tiles().locations()`
                RenderType::Locations => {}
                _ => {}
            }
        }
        backend.end_frame();

        let stats = pipeline.finish();
        log::trace!("frame: {:?}", stats);
        Ok(stats)
    }

    /// Finds what lies under a world point.
    ///
    /// Balloons are tried first (newest on top), then location pins when
    /// zoomed in far enough, then the nearest road segment within tolerance.
    pub fn hit_test(&self, point: WorldPoint) -> Option<HitResult> {
        let metrics = match self.view.render_metrics() {
            Ok(metrics) => metrics,
            Err(e) => {
                log::debug!("hit test skipped: {}", e);
                return None;
            }
        };

        let screen = metrics.world_to_screen(&point);
        if let Some(hit) = self.selections.hit_test(&screen) {
            return Some(hit);
        }

        if metrics.zoom_level() >= MIN_ZOOM_LEVEL_FOR_LOCATIONS {
            let radius = self.config.interaction.location_hit_radius_pixels;
            if let Some(location) = self
                .tiles
                .locations()
                .iter()
                .find(|l| metrics.distance_in_pixels(&point, &l.point) <= radius)
            {
                return Some(HitResult::location(location.id, location.point, &location.name));
            }
        }

        self.hit_test_roads(&metrics, &point)
    }

    fn hit_test_roads(&self, metrics: &RenderMetrics, point: &WorldPoint) -> Option<HitResult> {
        let bucket = metrics.style_bucket();
        let slack = self.config.interaction.road_hit_slack_pixels;
        let mut best: Option<(f64, u64, WorldPoint, ObjectType)> = None;

        for object_type in ObjectType::ALL.into_iter().filter(|t| t.is_road()) {
            // Roads not drawn at this bucket cannot be clicked
            let Some(width) = self.scene.max_line_width(object_type, bucket) else {
                continue;
            };
            let tolerance = width / 2.0 + slack;
            let reach = WorldRect::new(*point, *point).expanded(metrics.pixels_to_degrees(tolerance));
            let objects = self.tiles.objects(object_type);

            for index in Culling::visible_indices(&reach, objects.iter().map(|o| &o.bounds)) {
                let object = &objects[index];
                for segment in object.points.windows(2) {
                    let (degrees, closest) = point_segment_distance(point, &segment[0], &segment[1]);
                    let pixels = degrees / metrics.degrees_per_pixel();
                    if pixels <= tolerance && best.map_or(true, |(d, ..)| pixels < d) {
                        best = Some((pixels, object.id, closest, object_type));
                    }
                }
            }
        }

        let (_, road_id, closest, object_type) = best?;
        let name = self
            .tiles
            .objects(object_type)
            .iter()
            .find(|o| o.id == road_id)
            .and_then(|o| o.attributes.display_name());
        Some(HitResult::road(road_id, closest, name))
    }

    /// Hit test at a device pixel
    pub fn hit_test_screen(&self, point: ScreenPoint) -> Option<HitResult> {
        let world = self.view.render_metrics().ok()?.screen_to_world(&point);
        self.hit_test(world)
    }

    /// Opens the balloon for a fetched location.
    ///
    /// Returns `false` when it is already open, the set is full, or the
    /// location is not in the current snapshot.
    pub fn add_selection(&mut self, location_id: u64) -> bool {
        let Some(location) = self.tiles.location(location_id) else {
            log::debug!("location {} is not loaded", location_id);
            return false;
        };
        let metrics = self.view.render_metrics().ok();
        self.selections.add(location, metrics.as_ref())
    }

    pub fn remove_selection(&mut self, location_id: u64) -> bool {
        self.selections.remove(location_id)
    }

    pub fn selection(&self, location_id: u64) -> Option<&LocationSelection> {
        self.selections.get(location_id)
    }

    pub fn selection_attribute(&self, location_id: u64, name: &str) -> Option<&str> {
        self.selections.get(location_id)?.attribute(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::object::{Location, LocationAttribute, MapObject, ObjectAttributes};
    use crate::input::hit::HitKind;
    use crate::rendering::backend::{DrawCall, RecordingBackend};
    use crate::spatial::store::MemoryStore;

    const STYLE: &str = r##"{
        "layers": [
            { "name": "pins", "render_type": "locations" },
            { "name": "road labels", "data_source": "minor-road", "render_type": "line-labels",
              "styles": [ { "buckets": [1, 5], "color": "#000000ff", "font_size": 9 } ] },
            { "name": "roads", "data_source": "minor-road", "render_type": "lines",
              "styles": [ { "buckets": [3, 5], "color": "#ffffffff", "line_width": 6 } ] },
            { "name": "lakes", "data_source": "lake", "render_type": "polygons",
              "styles": [ { "buckets": [1, 5], "color": "#3060c0ff" } ] },
            { "name": "background", "render_type": "fill",
              "styles": [ { "buckets": [1, 5], "color": "#f0ebe0ff" } ] }
        ]
    }"##;

    fn center() -> WorldPoint {
        WorldPoint::new(42.0, -71.0)
    }

    fn store() -> MemoryStore {
        let c = center();
        let mut store = MemoryStore::new();
        let attributes = ObjectAttributes {
            name: Some("Main".to_string()),
            suffix: Some("St".to_string()),
            ..Default::default()
        };
        store.insert_object(
            MapObject::new(
                1,
                ObjectType::MinorRoad,
                vec![
                    WorldPoint::new(c.latitude - 0.01, c.longitude),
                    WorldPoint::new(c.latitude + 0.01, c.longitude),
                ],
                attributes,
            )
            .unwrap(),
        );
        store.insert_object(
            MapObject::new(
                2,
                ObjectType::Lake,
                vec![
                    WorldPoint::new(c.latitude + 0.001, c.longitude + 0.001),
                    WorldPoint::new(c.latitude + 0.002, c.longitude + 0.001),
                    WorldPoint::new(c.latitude + 0.002, c.longitude + 0.002),
                ],
                ObjectAttributes::default(),
            )
            .unwrap(),
        );
        store.insert_location(Location {
            id: 7,
            location_set_id: 1,
            point: WorldPoint::new(c.latitude, c.longitude + 0.0015),
            name: "Cafe".to_string(),
            attributes: vec![LocationAttribute::new("web", "https://cafe.example")],
        });
        store
    }

    fn map(zoom: u8) -> Map {
        let view = MapView::new(center(), zoom, Dimensions::new(800, 600)).unwrap();
        let mut map = Map::new(view, Scene::from_json(STYLE).unwrap(), MapConfig::default());
        map.refresh(&store()).unwrap();
        map
    }

    #[test]
    fn test_draw_back_to_front() {
        let map = map(8);
        let mut backend = RecordingBackend::new();
        let stats = map.draw(&mut backend, DrawFlags::ALL).unwrap();

        assert!(matches!(backend.calls[0], DrawCall::Fill { .. }));
        assert!(matches!(backend.calls[1], DrawCall::Polygon { .. }));
        assert!(matches!(backend.calls[2], DrawCall::Polyline { .. }));
        assert!(matches!(backend.calls.last(), Some(DrawCall::Label { .. })));
        assert_eq!(stats.steps, 5);
        assert_eq!(stats.fills, 1);
        assert_eq!(backend.frames, 1);
    }

    #[test]
    fn test_geometry_only_frame_has_no_labels() {
        let map = map(8);
        let mut backend = RecordingBackend::new();
        map.draw(&mut backend, DrawFlags::GEOMETRY).unwrap();
        assert_eq!(backend.labels().count(), 0);
        assert_eq!(backend.polylines().count(), 1);
    }

    #[test]
    fn test_roads_hidden_at_low_bucket() {
        // bucket 1: the road style is invisible
        let map = map(1);
        let mut backend = RecordingBackend::new();
        map.draw(&mut backend, DrawFlags::ALL).unwrap();
        assert_eq!(backend.polylines().count(), 0);
        assert!(map.hit_test(center()).is_none());
    }

    #[test]
    fn test_hit_road_nearest_point() {
        let map = map(8);
        let metrics = map.render_metrics().unwrap();
        let click = WorldPoint::new(42.0, -71.0 + metrics.pixels_to_degrees(4.0));
        let hit = map.hit_test(click).unwrap();
        match hit.kind {
            HitKind::Road {
                road_id,
                closest_point,
            } => {
                assert_eq!(road_id, 1);
                assert!((closest_point.longitude - -71.0).abs() < 1e-12);
            }
            other => panic!("unexpected hit {:?}", other),
        }
        assert_eq!(hit.text, "Main St");

        // 3 px half width + 3 px slack; west of the road, away from the pin
        let far = WorldPoint::new(42.0, -71.0 - metrics.pixels_to_degrees(7.0));
        assert!(map.hit_test(far).is_none());
    }

    #[test]
    fn test_pins_only_when_zoomed_in() {
        let pin = WorldPoint::new(42.0, -71.0 + 0.0015);
        let hit = map(8).hit_test(pin).unwrap();
        assert_eq!(
            hit.kind,
            HitKind::Location {
                location_id: 7,
                coords: pin
            }
        );
        assert_eq!(hit.text, "Cafe");

        let zoomed_out = map(6);
        assert!(zoomed_out.tiles().locations().is_empty());
        assert!(!matches!(
            zoomed_out.hit_test(pin).map(|h| h.kind),
            Some(HitKind::Location { .. })
        ));
    }

    #[test]
    fn test_selection_wins_over_pin() {
        let mut map = map(8);
        assert!(map.add_selection(7));
        assert!(!map.add_selection(7));
        assert!(!map.add_selection(99));
        assert_eq!(map.selection_attribute(7, "web"), Some("https://cafe.example"));

        let close = map.selection(7).unwrap().close_rect.center();
        let hit = map.hit_test_screen(close).unwrap();
        assert_eq!(hit.kind, HitKind::LocationSelectionClose { location_id: 7 });

        assert!(map.remove_selection(7));
        assert!(!map.remove_selection(7));
    }

    #[test]
    fn test_selection_follows_view() {
        let mut map = map(8);
        map.add_selection(7);
        let before = map.selection(7).unwrap().info_box_rect;
        map.pan_pixels(10.0, 0.0).unwrap();
        let after = map.selection(7).unwrap().info_box_rect;
        assert_eq!(after.a.x, before.a.x - 10);
        assert_eq!(after.a.y, before.a.y);
    }

    #[test]
    fn test_needs_refresh() {
        let mut map = map(8);
        assert!(!map.needs_refresh());
        map.set_center(WorldPoint::new(43.0, -71.0));
        assert!(map.needs_refresh());
        map.refresh(&store()).unwrap();
        assert!(!map.needs_refresh());
        assert!(map.tiles().objects(ObjectType::MinorRoad).is_empty());
    }
}
