use crate::core::constants::SEARCH_RESULT_COUNT_LIMIT;
use crate::core::geo::WorldPoint;
use crate::core::zoom::SEARCH_RESULT_ZOOM_LEVEL;
use crate::data::object::{MapObject, SideAttributes};
use crate::search::address::{address_fraction, interpolate_address_point, RoadSide};
use crate::search::query::{Gazetteer, RoadQuery, RoadSuffix};
use crate::search::result::{MatchSource, SearchResult};
use crate::Result;

/// Source of road candidates for a search
pub trait RoadDirectory {
    /// Roads whose name equals `name`, ignoring case
    fn roads_named(&self, name: &str) -> Result<Vec<MapObject>>;
}

/// `"City, ST, 02139"`; the placeholder ZIP `00000` is left out
fn city_state_zip(side: &SideAttributes) -> String {
    let mut text = side.city.clone().unwrap_or_default();
    if let Some(state) = side.state.as_deref() {
        text.push_str(", ");
        text.push_str(state);
    }
    if let Some(zip) = side.zip.as_deref().filter(|z| !z.is_empty() && *z != "00000") {
        text.push_str(", ");
        text.push_str(zip);
    }
    text
}

fn road_title(road: &MapObject) -> String {
    let name = road.name().unwrap_or_default();
    match road.attributes.suffix.as_deref() {
        Some(raw) => {
            let suffix = raw.parse::<RoadSuffix>().map(|s| s.long()).unwrap_or(raw);
            format!("{} {}", name, suffix)
        }
        None => name.to_string(),
    }
}

fn side_attributes(road: &MapObject, side: RoadSide) -> &SideAttributes {
    match side {
        RoadSide::Left => &road.attributes.left,
        _ => &road.attributes.right,
    }
}

/// Turns one candidate road into results for a query.
///
/// Without a house number the road's midpoint is returned. With one, each
/// side whose range holds the number (with matching parity) yields a point
/// on that side of the road.
pub fn filter_candidate(query: &RoadQuery, road: &MapObject) -> Vec<SearchResult> {
    let title = road_title(road);
    let mut results = Vec::new();

    let Some(number) = query.number else {
        match interpolate_address_point(&road.points, 0.5, RoadSide::Center) {
            Ok(point) => results.push(SearchResult {
                source: MatchSource::Road {
                    road_id: road.id,
                    side: RoadSide::Center,
                },
                text: format!("{}\n{}", title, city_state_zip(&road.attributes.right)),
                point,
                zoom_level: SEARCH_RESULT_ZOOM_LEVEL,
            }),
            Err(e) => log::debug!("skipping road {}: {}", road.id, e),
        }
        return results;
    };

    for side in [RoadSide::Left, RoadSide::Right] {
        let attributes = side_attributes(road, side);
        let Some(fraction) = address_fraction(number, &attributes.range) else {
            continue;
        };
        match interpolate_address_point(&road.points, fraction, side) {
            Ok(point) => results.push(SearchResult {
                source: MatchSource::Road {
                    road_id: road.id,
                    side,
                },
                text: format!("{} {}\n{}", number, title, city_state_zip(attributes)),
                point,
                zoom_level: SEARCH_RESULT_ZOOM_LEVEL,
            }),
            Err(e) => log::debug!("skipping road {}: {}", road.id, e),
        }
    }

    results
}

fn either_side(road: &MapObject, test: impl Fn(&SideAttributes) -> bool) -> bool {
    test(&road.attributes.left) || test(&road.attributes.right)
}

fn eq_opt(value: &Option<String>, wanted: &str) -> bool {
    value.as_deref().map_or(false, |v| v.eq_ignore_ascii_case(wanted))
}

/// Checks the query's suffix, number and place against a road
fn candidate_matches(query: &RoadQuery, road: &MapObject) -> bool {
    if let Some(suffix) = query.suffix {
        let road_suffix = road
            .attributes
            .suffix
            .as_deref()
            .and_then(|s| s.parse::<RoadSuffix>().ok());
        if road_suffix != Some(suffix) {
            return false;
        }
    }
    if let Some(number) = query.number {
        if !either_side(road, |side| side.range.contains(number)) {
            return false;
        }
    }
    if let Some(zip) = query.zip.as_deref() {
        if !either_side(road, |side| eq_opt(&side.zip, zip)) {
            return false;
        }
    }
    if let Some(city) = query.city.as_deref() {
        if !either_side(road, |side| eq_opt(&side.city, city)) {
            return false;
        }
    }
    if let Some(state) = query.state.as_deref() {
        if !either_side(road, |side| eq_opt(&side.state, state)) {
            return false;
        }
    }
    true
}

/// Runs a free-text road search.
///
/// At most [`SEARCH_RESULT_COUNT_LIMIT`] candidate roads are considered.
pub fn search_roads(
    sentence: &str,
    gazetteer: &dyn Gazetteer,
    directory: &dyn RoadDirectory,
) -> Result<Vec<SearchResult>> {
    let Some(query) = RoadQuery::parse(sentence, gazetteer) else {
        return Ok(Vec::new());
    };
    log::debug!("road search {:?}", query);

    let candidates = directory.roads_named(&query.name)?;
    let results: Vec<SearchResult> = candidates
        .iter()
        .filter(|road| candidate_matches(&query, road))
        .take(SEARCH_RESULT_COUNT_LIMIT)
        .flat_map(|road| filter_candidate(&query, road))
        .collect();

    log::debug!("road search '{}' found {} result(s)", sentence, results.len());
    Ok(results)
}
