//! Searching points of interest by the words in their attributes.
//!
//! A location matches when any word of the sentence appears as a whole word,
//! ignoring case, in its name or in any attribute value.

use crate::core::constants::LOCATION_SEARCH_RESULT_LIMIT;
use crate::core::zoom::LOCATION_RESULT_ZOOM_LEVEL;
use crate::data::object::Location;
use crate::search::result::{MatchSource, SearchResult};
use crate::Result;

/// Attribute holding a location's street address
pub const ADDRESS_ATTRIBUTE: &str = "address";

/// Source of locations for a search
pub trait LocationDirectory {
    /// Locations matching at least one of `words`, ordered by id
    fn locations_matching(&self, words: &[String]) -> Result<Vec<Location>>;
}

/// Lowercased words of a sentence with surrounding punctuation removed
pub fn search_words(sentence: &str) -> Vec<String> {
    let mut words: Vec<String> = sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    words.dedup();
    words
}

fn contains_word(text: &str, words: &[String]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| {
            let token = token.to_lowercase();
            words.iter().any(|w| *w == token)
        })
}

/// Whether any of the (lowercased) `words` appears in the location's text
pub fn location_matches(location: &Location, words: &[String]) -> bool {
    contains_word(&location.name, words)
        || location
            .attributes
            .iter()
            .any(|attribute| contains_word(&attribute.value, words))
}

/// The name, then the address when the location has one
fn location_result(location: &Location) -> SearchResult {
    let text = match location
        .attribute(ADDRESS_ATTRIBUTE)
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        Some(address) => format!("{}\n{}", location.name, address),
        None => location.name.clone(),
    };
    SearchResult {
        source: MatchSource::Location {
            location_id: location.id,
        },
        text,
        point: location.point,
        zoom_level: LOCATION_RESULT_ZOOM_LEVEL,
    }
}

/// Runs a free-text location search.
///
/// At most [`LOCATION_SEARCH_RESULT_LIMIT`] locations are returned.
pub fn search_locations(
    sentence: &str,
    directory: &dyn LocationDirectory,
) -> Result<Vec<SearchResult>> {
    let words = search_words(sentence);
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let matches = directory.locations_matching(&words)?;
    if matches.len() > LOCATION_SEARCH_RESULT_LIMIT {
        log::debug!(
            "location search '{}' matched {}, keeping {}",
            sentence,
            matches.len(),
            LOCATION_SEARCH_RESULT_LIMIT
        );
    }
    let results: Vec<SearchResult> = matches
        .iter()
        .take(LOCATION_SEARCH_RESULT_LIMIT)
        .map(location_result)
        .collect();

    log::debug!("location search '{}' found {} result(s)", sentence, results.len());
    Ok(results)
}
