use crate::core::geo::WorldPoint;
use serde::{Deserialize, Serialize};

/// A view the user can navigate back to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub center: WorldPoint,
    pub zoom_level: u8,
}

impl HistoryEntry {
    pub fn new(center: WorldPoint, zoom_level: u8) -> Self {
        Self { center, zoom_level }
    }
}

/// Browser-style view history.
///
/// Entries `[0, current]` are back targets and `(current, len)` are forward
/// targets. Adding an entry discards every forward target.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    current: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a view after the current one, truncating forward entries.
    ///
    /// Forward entries are dropped even when the view is already current; the
    /// duplicate itself is not pushed.
    pub fn add(&mut self, center: WorldPoint, zoom_level: u8) {
        let keep = self.current.map_or(0, |i| i + 1);
        self.entries.truncate(keep);

        if let Some(current) = self.current() {
            if current.zoom_level == zoom_level && current.center.points_equal(&center) {
                return;
            }
        }

        self.entries.push(HistoryEntry::new(center, zoom_level));
        self.current = Some(self.entries.len() - 1);
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.entries.len())
    }

    /// Steps back, returning the entry that becomes current
    pub fn go_back(&mut self) -> Option<HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        let i = self.current? - 1;
        self.current = Some(i);
        self.entries.get(i).copied()
    }

    /// Steps forward, returning the entry that becomes current
    pub fn go_forward(&mut self) -> Option<HistoryEntry> {
        if !self.can_go_forward() {
            return None;
        }
        let i = self.current? + 1;
        self.current = Some(i);
        self.entries.get(i).copied()
    }
}
