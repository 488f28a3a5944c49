use crate::core::geo::WorldPoint;
use serde::{Deserialize, Serialize};

/// What a hit test landed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HitKind {
    Location {
        location_id: u64,
        coords: WorldPoint,
    },
    Road {
        road_id: u64,
        /// Closest point on the road's centreline to the click
        closest_point: WorldPoint,
    },
    /// The body of an open info balloon
    LocationSelection { location_id: u64 },
    LocationSelectionClose { location_id: u64 },
    LocationSelectionEdit { location_id: u64 },
    Url { url: String },
}

impl HitKind {
    /// The location a balloon or pin hit refers to
    pub fn location_id(&self) -> Option<u64> {
        match self {
            HitKind::Location { location_id, .. }
            | HitKind::LocationSelection { location_id }
            | HitKind::LocationSelectionClose { location_id }
            | HitKind::LocationSelectionEdit { location_id } => Some(*location_id),
            HitKind::Road { .. } | HitKind::Url { .. } => None,
        }
    }

    /// Hits on a balloon decoration rather than on map data
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            HitKind::LocationSelection { .. }
                | HitKind::LocationSelectionClose { .. }
                | HitKind::LocationSelectionEdit { .. }
                | HitKind::Url { .. }
        )
    }
}

/// A single hit with its tooltip text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    pub kind: HitKind,
    pub text: String,
}

impl HitResult {
    pub fn location(location_id: u64, coords: WorldPoint, name: &str) -> Self {
        let text = if name.trim().is_empty() {
            format!("Location #{}", location_id)
        } else {
            name.trim().to_string()
        };
        Self {
            kind: HitKind::Location {
                location_id,
                coords,
            },
            text,
        }
    }

    pub fn road(road_id: u64, closest_point: WorldPoint, name: Option<String>) -> Self {
        Self {
            kind: HitKind::Road {
                road_id,
                closest_point,
            },
            text: name.unwrap_or_else(|| "Unnamed road".to_string()),
        }
    }

    pub fn selection(location_id: u64, name: &str) -> Self {
        Self {
            kind: HitKind::LocationSelection { location_id },
            text: name.to_string(),
        }
    }

    pub fn selection_close(location_id: u64) -> Self {
        Self {
            kind: HitKind::LocationSelectionClose { location_id },
            text: "Close".to_string(),
        }
    }

    pub fn selection_edit(location_id: u64) -> Self {
        Self {
            kind: HitKind::LocationSelectionEdit { location_id },
            text: "Edit".to_string(),
        }
    }

    pub fn url(url: &str) -> Self {
        Self {
            kind: HitKind::Url {
                url: url.to_string(),
            },
            text: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts() {
        let p = WorldPoint::new(42.0, -71.0);
        assert_eq!(HitResult::location(3, p, " Cafe ").text, "Cafe");
        assert_eq!(HitResult::location(3, p, "").text, "Location #3");
        assert_eq!(HitResult::road(9, p, Some("Main St".into())).text, "Main St");
        assert_eq!(HitResult::road(9, p, None).text, "Unnamed road");
        assert_eq!(HitResult::url("http://a.example").text, "http://a.example");
    }

    #[test]
    fn test_location_id() {
        assert_eq!(HitResult::selection_close(4).kind.location_id(), Some(4));
        assert_eq!(HitResult::url("http://x").kind.location_id(), None);
        assert!(HitResult::selection_edit(4).kind.is_selection());
        let road = HitResult::road(1, WorldPoint::default(), None);
        assert!(!road.kind.is_selection());
    }
}
