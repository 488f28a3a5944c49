//! Selected location pins and their info balloons.
//!
//! Balloon decorations are laid out in screen space relative to the pin, so
//! every view change must call [`SelectionSet::layout`] before hit testing.

use crate::constants::MAX_LOCATION_SELECTION_URLS;
use crate::core::bounds::{ScreenPoint, ScreenRect};
use crate::core::geo::WorldPoint;
use crate::core::metrics::RenderMetrics;
use crate::data::object::{Location, LocationAttribute};
use crate::input::hit::HitResult;

const BOX_WIDTH: i16 = 220;
const BOX_LEFT_OF_PIN: i16 = 24;
/// Vertical gap between the pin and the bottom of its balloon
const POINTER_GAP: i16 = 14;
const PADDING: i16 = 6;
const TITLE_HEIGHT: i16 = 18;
const LINE_HEIGHT: i16 = 14;
const CLOSE_SIZE: i16 = 12;
const EDIT_WIDTH: i16 = 36;

/// A clickable link inside a balloon
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub rect: ScreenRect,
    pub url: String,
}

/// An open info balloon for one location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSelection {
    pub location_id: u64,
    pub point: WorldPoint,
    pub name: String,
    /// Whether the pin is inside the current view
    pub visible: bool,
    pub attributes: Vec<LocationAttribute>,
    pub info_box_rect: ScreenRect,
    pub close_rect: ScreenRect,
    pub edit_rect: ScreenRect,
    pub urls: Vec<UrlEntry>,
}

impl LocationSelection {
    pub fn new(location: &Location) -> Self {
        let urls = location
            .attributes
            .iter()
            .filter(|a| a.is_url())
            .take(MAX_LOCATION_SELECTION_URLS)
            .map(|a| UrlEntry {
                rect: ScreenRect::default(),
                url: a.value.trim().to_string(),
            })
            .collect();

        Self {
            location_id: location.id,
            point: location.point,
            name: location.name.clone(),
            visible: false,
            attributes: location.attributes.clone(),
            info_box_rect: ScreenRect::default(),
            close_rect: ScreenRect::default(),
            edit_rect: ScreenRect::default(),
            urls,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    fn text_rows(&self) -> i16 {
        let rows = self.attributes.iter().filter(|a| !a.is_url()).count();
        rows.min(i16::MAX as usize) as i16
    }

    /// Places the balloon above and to the right of the pin
    pub fn layout(&mut self, metrics: &RenderMetrics) {
        self.visible = metrics.bounding_box().contains(&self.point);
        let pin = metrics.world_to_screen(&self.point);

        let text_rows = self.text_rows();
        let url_rows = self.urls.len() as i16;
        let body_rows = text_rows.saturating_add(url_rows).saturating_add(1);
        let height = (2 * PADDING + TITLE_HEIGHT).saturating_add(LINE_HEIGHT.saturating_mul(body_rows));

        let origin = pin.offset(-BOX_LEFT_OF_PIN, -(POINTER_GAP.saturating_add(height)));
        let row = |i: i16| {
            (PADDING + TITLE_HEIGHT).saturating_add(LINE_HEIGHT.saturating_mul(i))
        };

        self.info_box_rect = ScreenRect::from_origin_and_size(origin, BOX_WIDTH, height);
        self.close_rect = ScreenRect::from_origin_and_size(
            origin.offset(BOX_WIDTH - PADDING - CLOSE_SIZE, PADDING),
            CLOSE_SIZE,
            CLOSE_SIZE,
        );
        for (i, entry) in self.urls.iter_mut().enumerate() {
            entry.rect = ScreenRect::from_origin_and_size(
                origin.offset(PADDING, row(text_rows.saturating_add(i as i16))),
                BOX_WIDTH - 2 * PADDING,
                LINE_HEIGHT,
            );
        }
        self.edit_rect = ScreenRect::from_origin_and_size(
            origin.offset(PADDING, row(text_rows.saturating_add(url_rows))),
            EDIT_WIDTH,
            LINE_HEIGHT,
        );
    }

    /// Close button, edit link, URLs, then the balloon body
    pub fn hit_test(&self, point: &ScreenPoint) -> Option<HitResult> {
        if !self.visible || !self.info_box_rect.contains(point) {
            return None;
        }
        if self.close_rect.contains(point) {
            return Some(HitResult::selection_close(self.location_id));
        }
        if self.edit_rect.contains(point) {
            return Some(HitResult::selection_edit(self.location_id));
        }
        if let Some(entry) = self.urls.iter().find(|u| u.rect.contains(point)) {
            return Some(HitResult::url(&entry.url));
        }
        Some(HitResult::selection(self.location_id, &self.name))
    }
}

/// Open balloons in selection order, newest last
#[derive(Debug, Clone)]
pub struct SelectionSet {
    selections: Vec<LocationSelection>,
    max_selections: usize,
}

impl SelectionSet {
    pub fn new(max_selections: usize) -> Self {
        Self {
            selections: Vec::new(),
            max_selections,
        }
    }

    pub fn max_selections(&self) -> usize {
        self.max_selections
    }

    /// Opens a balloon. Returns `false` if the location is already selected
    /// or the set is full.
    pub fn add(&mut self, location: &Location, metrics: Option<&RenderMetrics>) -> bool {
        if self.contains(location.id) {
            log::debug!("location {} is already selected", location.id);
            return false;
        }
        if self.selections.len() >= self.max_selections {
            log::debug!(
                "selection of location {} refused: {} balloon(s) open",
                location.id,
                self.selections.len()
            );
            return false;
        }
        let mut selection = LocationSelection::new(location);
        if let Some(metrics) = metrics {
            selection.layout(metrics);
        }
        self.selections.push(selection);
        true
    }

    pub fn remove(&mut self, location_id: u64) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.location_id != location_id);
        self.selections.len() != before
    }

    pub fn contains(&self, location_id: u64) -> bool {
        self.get(location_id).is_some()
    }

    pub fn get(&self, location_id: u64) -> Option<&LocationSelection> {
        self.selections.iter().find(|s| s.location_id == location_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationSelection> {
        self.selections.iter()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn layout(&mut self, metrics: &RenderMetrics) {
        for selection in &mut self.selections {
            selection.layout(metrics);
        }
    }

    /// The most recently opened balloon under the point wins
    pub fn hit_test(&self, point: &ScreenPoint) -> Option<HitResult> {
        self.selections.iter().rev().find_map(|s| s.hit_test(point))
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new(8)
    }
}
