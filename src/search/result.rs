use crate::core::geo::WorldPoint;
use crate::search::address::RoadSide;
use crate::search::location::{search_locations, LocationDirectory};
use crate::search::query::Gazetteer;
use crate::search::road::{search_roads, RoadDirectory};
use crate::Result;

/// What a search result was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Road { road_id: u64, side: RoadSide },
    Location { location_id: u64 },
}

/// A place a search resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub source: MatchSource,
    /// Title line, then the address if one is known
    pub text: String,
    pub point: WorldPoint,
    /// Zoom level the view should show the result at
    pub zoom_level: u8,
}

impl SearchResult {
    pub fn road_id(&self) -> Option<u64> {
        match self.source {
            MatchSource::Road { road_id, .. } => Some(road_id),
            MatchSource::Location { .. } => None,
        }
    }

    /// Side of the road an address was placed on
    pub fn side(&self) -> Option<RoadSide> {
        match self.source {
            MatchSource::Road { side, .. } => Some(side),
            MatchSource::Location { .. } => None,
        }
    }

    pub fn location_id(&self) -> Option<u64> {
        match self.source {
            MatchSource::Location { location_id } => Some(location_id),
            MatchSource::Road { .. } => None,
        }
    }

    /// First line of the result text
    pub fn title(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }
}

/// Runs a road search and a location search over the same sentence; road
/// results come first.
pub fn search_all(
    sentence: &str,
    gazetteer: &dyn Gazetteer,
    roads: &dyn RoadDirectory,
    locations: &dyn LocationDirectory,
) -> Result<Vec<SearchResult>> {
    let mut results = search_roads(sentence, gazetteer, roads)?;
    results.extend(search_locations(sentence, locations)?);
    Ok(results)
}
