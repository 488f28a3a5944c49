//! Interactive session state.
//!
//! [`MapSession`] is the explicit application state a UI owns and polls: the
//! map, browser-style view history, the running slide animation, and the
//! debounced full-fidelity redraw. Time is always passed in, so the session
//! never reads a clock or blocks.

use crate::animation::animator::AnimationCurve;
use crate::animation::transitions::Slide;
use crate::core::bounds::ScreenPoint;
use crate::core::geo::WorldPoint;
use crate::core::history::History;
use crate::core::map::Map;
use crate::core::viewport::{Dimensions, MapView};
use crate::core::zoom;
use crate::input::events::{match_border, Direction, InputEvent};
use crate::input::hit::HitKind;
use crate::rendering::backend::RenderBackend;
use crate::rendering::pipeline::{DrawFlags, DrawStats};
use crate::rendering::redraw::{RedrawReason, RedrawScheduler};
use crate::search::result::SearchResult;
use crate::spatial::store::SpatialStore;
use crate::Result;
use instant::Instant;

/// What a click asks the caller to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A balloon opened for this location
    Selected(u64),
    /// A balloon was closed
    Deselected(u64),
    /// The balloon's edit link was clicked
    Edit(u64),
    /// A balloon link the caller should open
    OpenUrl(String),
}

#[derive(Debug)]
pub struct MapSession {
    map: Map,
    history: History,
    slide: Option<Slide>,
    redraw: RedrawScheduler,
}

impl MapSession {
    /// Starts a session; the initial view is the first history entry
    pub fn new(map: Map) -> Self {
        let mut history = History::new();
        history.add(map.center(), map.zoom_level());
        let redraw = RedrawScheduler::new(map.config().redraw.clone());
        Self {
            map,
            history,
            slide: None,
            redraw,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    fn add_history(&mut self) {
        self.history.add(self.map.center(), self.map.zoom_level());
    }

    fn begin_slide(
        &mut self,
        target: WorldPoint,
        seconds: f64,
        curve: AnimationCurve,
        now: Instant,
    ) -> Result<()> {
        // A new slide replaces any running one
        self.slide = Some(Slide::new(self.map.center(), target, seconds, curve, now)?);
        self.redraw.cancel();
        Ok(())
    }

    /// Moves the view to `target`: slides when the target is close enough
    /// on screen, otherwise jumps there and records history. A target equal
    /// to the center does nothing.
    pub fn slide_to(&mut self, target: WorldPoint, now: Instant) -> Result<()> {
        if target.points_equal(&self.map.center()) {
            return Ok(());
        }
        let metrics = self.map.render_metrics()?;
        let distance = metrics.distance_in_pixels(&self.map.center(), &target);
        let interaction = self.map.config().interaction.clone();

        if distance <= interaction.max_auto_slide_pixels {
            log::debug!("sliding {:.0} px to {}", distance, target);
            self.begin_slide(
                target,
                interaction.auto_slide_seconds,
                interaction.auto_slide_curve,
                now,
            )
        } else {
            log::debug!("jumping {:.0} px to {}", distance, target);
            self.slide = None;
            self.map.set_center(target);
            self.add_history();
            Ok(())
        }
    }

    /// Brings a search result into view at its suggested zoom level
    pub fn show_search_result(&mut self, result: &SearchResult, now: Instant) -> Result<()> {
        if result.zoom_level != self.map.zoom_level() {
            self.slide = None;
            self.map.set_zoom_level(result.zoom_level)?;
            if result.point.points_equal(&self.map.center()) {
                self.add_history();
            }
        }
        self.slide_to(result.point, now)
    }

    /// Pans so the double-clicked point becomes the center. Clicks on the
    /// edge-scroll border are ignored.
    pub fn double_click(&mut self, position: ScreenPoint, now: Instant) -> Result<bool> {
        if self.border_direction(position) != Direction::None {
            return Ok(false);
        }
        let target = self.map.render_metrics()?.screen_to_world(&position);
        let interaction = self.map.config().interaction.clone();
        self.begin_slide(target, interaction.slide_seconds, interaction.slide_curve, now)?;
        Ok(true)
    }

    /// Advances time. Returns the kind of frame to draw, if any.
    pub fn tick(&mut self, now: Instant) -> Option<DrawFlags> {
        if let Some(slide) = self.slide {
            self.map.set_center(slide.position(now));
            if !slide.is_done(now) {
                return Some(DrawFlags::GEOMETRY);
            }
            self.slide = None;
            self.add_history();
            return Some(DrawFlags::ALL);
        }
        self.redraw.poll(now).map(|reason| {
            log::trace!("full redraw after {:?}", reason);
            DrawFlags::ALL
        })
    }

    /// Drags the map content by a pixel delta, as if pulled by the pointer
    pub fn drag_by(&mut self, dx: i32, dy: i32, now: Instant) -> Result<()> {
        self.slide = None;
        self.map.pan_pixels(-(dx as f64), -(dy as f64))?;
        self.redraw.schedule(RedrawReason::Drag, now);
        Ok(())
    }

    /// Ends a drag: draw in full now and remember the view
    pub fn drag_end(&mut self) -> DrawFlags {
        self.redraw.cancel();
        self.add_history();
        DrawFlags::ALL
    }

    /// Changes zoom; returns `false` when the level is already current
    pub fn set_zoom_level(&mut self, level: u8, now: Instant) -> Result<bool> {
        zoom::validate_zoom_level(level)?;
        if level == self.map.zoom_level() {
            return Ok(false);
        }
        self.slide = None;
        self.map.set_zoom_level(level)?;
        self.redraw.schedule(RedrawReason::Zoom, now);
        self.add_history();
        Ok(true)
    }

    pub fn zoom_in(&mut self, now: Instant) -> Result<bool> {
        if !self.map.view().can_zoom_in() {
            return Ok(false);
        }
        self.set_zoom_level(self.map.zoom_level() + 1, now)
    }

    pub fn zoom_out(&mut self, now: Instant) -> Result<bool> {
        if !self.map.view().can_zoom_out() {
            return Ok(false);
        }
        self.set_zoom_level(self.map.zoom_level() - 1, now)
    }

    pub fn go_back(&mut self) -> Result<bool> {
        match self.history.go_back() {
            Some(entry) => self.restore(entry.center, entry.zoom_level),
            None => Ok(false),
        }
    }

    pub fn go_forward(&mut self) -> Result<bool> {
        match self.history.go_forward() {
            Some(entry) => self.restore(entry.center, entry.zoom_level),
            None => Ok(false),
        }
    }

    fn restore(&mut self, center: WorldPoint, zoom_level: u8) -> Result<bool> {
        self.slide = None;
        self.redraw.cancel();
        self.map.set_zoom_level(zoom_level)?;
        self.map.set_center(center);
        Ok(true)
    }

    /// Handles a click that did not drag the map
    pub fn click(&mut self, position: ScreenPoint) -> Option<ClickOutcome> {
        let hit = self.map.hit_test_screen(position)?;
        log::debug!("click hit {:?}", hit.kind);
        match hit.kind {
            HitKind::Location { location_id, .. } => self
                .map
                .add_selection(location_id)
                .then_some(ClickOutcome::Selected(location_id)),
            HitKind::LocationSelectionClose { location_id } => self
                .map
                .remove_selection(location_id)
                .then_some(ClickOutcome::Deselected(location_id)),
            HitKind::LocationSelectionEdit { location_id } => Some(ClickOutcome::Edit(location_id)),
            HitKind::Url { url } => Some(ClickOutcome::OpenUrl(url)),
            HitKind::Road { .. } | HitKind::LocationSelection { .. } => None,
        }
    }

    /// Edge-scroll target under a screen position
    pub fn border_direction(&self, position: ScreenPoint) -> Direction {
        let dimensions = self.map.view().dimensions();
        match_border(
            position.x as i32,
            position.y as i32,
            dimensions.width as i32,
            dimensions.height as i32,
            self.map.config().interaction.border_pixels as i32,
        )
    }

    /// Jumps half a screen towards an edge; corners jump half the diagonal
    /// along both axes.
    pub fn edge_click(&mut self, direction: Direction, now: Instant) -> Result<bool> {
        if direction == Direction::None {
            return Ok(false);
        }
        let dimensions = self.map.view().dimensions();
        let distance = direction.jump_distance(dimensions.width, dimensions.height);
        let (mx, my) = direction.multipliers();

        self.slide = None;
        self.map.pan_pixels(mx as f64 * distance, my as f64 * distance)?;
        self.redraw.schedule(RedrawReason::Scroll, now);
        self.add_history();
        Ok(true)
    }

    pub fn resize(&mut self, dimensions: Dimensions, now: Instant) -> Result<()> {
        self.map.set_dimensions(dimensions)?;
        self.redraw.schedule(RedrawReason::Resize, now);
        Ok(())
    }

    /// Dispatches one input event
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        now: Instant,
    ) -> Result<Option<ClickOutcome>> {
        match event {
            InputEvent::Click { position } => {
                let direction = self.border_direction(*position);
                if direction != Direction::None {
                    self.edge_click(direction, now)?;
                    return Ok(None);
                }
                Ok(self.click(*position))
            }
            InputEvent::DoubleClick { position } => {
                self.double_click(*position, now)?;
                Ok(None)
            }
            InputEvent::Drag { dx, dy } => {
                self.drag_by(*dx, *dy, now)?;
                Ok(None)
            }
            InputEvent::DragEnd => {
                self.drag_end();
                Ok(None)
            }
            InputEvent::Scroll { steps } => {
                let target = (self.map.zoom_level() as i32).saturating_add(*steps);
                let level = MapView::clamp_zoom_level(target);
                self.set_zoom_level(level, now)?;
                Ok(None)
            }
            InputEvent::Resize { dimensions } => {
                self.resize(*dimensions, now)?;
                Ok(None)
            }
        }
    }

    /// Fetches data if the view left the current snapshot, then draws
    pub fn render(
        &mut self,
        store: &dyn SpatialStore,
        backend: &mut dyn RenderBackend,
        flags: DrawFlags,
    ) -> Result<DrawStats> {
        if self.map.needs_refresh() {
            self.map.refresh(store)?;
        }
        self.map.draw(backend, flags)
    }
}
