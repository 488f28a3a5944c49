//! Parsing a free-text road search such as `"150 Main St Boston MA 02139"`.

use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Street type suffixes with their abbreviated and full forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadSuffix {
    Alley,
    Avenue,
    Boulevard,
    Circle,
    Court,
    Crossing,
    Drive,
    Expressway,
    Freeway,
    Highway,
    Lane,
    Loop,
    Parkway,
    Path,
    Pike,
    Place,
    Road,
    Square,
    Street,
    Terrace,
    Trail,
    Turnpike,
    Way,
}

impl RoadSuffix {
    pub const ALL: [RoadSuffix; 23] = [
        RoadSuffix::Alley,
        RoadSuffix::Avenue,
        RoadSuffix::Boulevard,
        RoadSuffix::Circle,
        RoadSuffix::Court,
        RoadSuffix::Crossing,
        RoadSuffix::Drive,
        RoadSuffix::Expressway,
        RoadSuffix::Freeway,
        RoadSuffix::Highway,
        RoadSuffix::Lane,
        RoadSuffix::Loop,
        RoadSuffix::Parkway,
        RoadSuffix::Path,
        RoadSuffix::Pike,
        RoadSuffix::Place,
        RoadSuffix::Road,
        RoadSuffix::Square,
        RoadSuffix::Street,
        RoadSuffix::Terrace,
        RoadSuffix::Trail,
        RoadSuffix::Turnpike,
        RoadSuffix::Way,
    ];

    pub fn short(self) -> &'static str {
        match self {
            RoadSuffix::Alley => "Aly",
            RoadSuffix::Avenue => "Ave",
            RoadSuffix::Boulevard => "Blvd",
            RoadSuffix::Circle => "Cir",
            RoadSuffix::Court => "Ct",
            RoadSuffix::Crossing => "Xing",
            RoadSuffix::Drive => "Dr",
            RoadSuffix::Expressway => "Expy",
            RoadSuffix::Freeway => "Fwy",
            RoadSuffix::Highway => "Hwy",
            RoadSuffix::Lane => "Ln",
            RoadSuffix::Loop => "Loop",
            RoadSuffix::Parkway => "Pkwy",
            RoadSuffix::Path => "Path",
            RoadSuffix::Pike => "Pike",
            RoadSuffix::Place => "Pl",
            RoadSuffix::Road => "Rd",
            RoadSuffix::Square => "Sq",
            RoadSuffix::Street => "St",
            RoadSuffix::Terrace => "Ter",
            RoadSuffix::Trail => "Trl",
            RoadSuffix::Turnpike => "Tpke",
            RoadSuffix::Way => "Way",
        }
    }

    pub fn long(self) -> &'static str {
        match self {
            RoadSuffix::Alley => "Alley",
            RoadSuffix::Avenue => "Avenue",
            RoadSuffix::Boulevard => "Boulevard",
            RoadSuffix::Circle => "Circle",
            RoadSuffix::Court => "Court",
            RoadSuffix::Crossing => "Crossing",
            RoadSuffix::Drive => "Drive",
            RoadSuffix::Expressway => "Expressway",
            RoadSuffix::Freeway => "Freeway",
            RoadSuffix::Highway => "Highway",
            RoadSuffix::Lane => "Lane",
            RoadSuffix::Loop => "Loop",
            RoadSuffix::Parkway => "Parkway",
            RoadSuffix::Path => "Path",
            RoadSuffix::Pike => "Pike",
            RoadSuffix::Place => "Place",
            RoadSuffix::Road => "Road",
            RoadSuffix::Square => "Square",
            RoadSuffix::Street => "Street",
            RoadSuffix::Terrace => "Terrace",
            RoadSuffix::Trail => "Trail",
            RoadSuffix::Turnpike => "Turnpike",
            RoadSuffix::Way => "Way",
        }
    }
}

impl fmt::Display for RoadSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long())
    }
}

impl FromStr for RoadSuffix {
    type Err = MapError;

    /// Accepts either form, case-insensitive, with an optional trailing period
    fn from_str(s: &str) -> Result<Self> {
        let word = s.trim().trim_end_matches('.');
        Self::ALL
            .iter()
            .copied()
            .find(|suffix| {
                suffix.short().eq_ignore_ascii_case(word) || suffix.long().eq_ignore_ascii_case(word)
            })
            .ok_or_else(|| MapError::NotFound(format!("road suffix '{}'", s)))
    }
}

/// Place-name lookups consulted while parsing a query
pub trait Gazetteer {
    /// Canonical state code for a state name or code
    fn lookup_state(&self, text: &str) -> Option<String>;

    /// Canonical city name, restricted to `state` when one was recognised
    fn lookup_city(&self, text: &str, state: Option<&str>) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    /// State code
    pub state: String,
}

/// An in-memory [`Gazetteer`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryGazetteer {
    pub states: Vec<StateEntry>,
    pub cities: Vec<CityEntry>,
}

impl MemoryGazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, name: &str, code: &str) -> Self {
        self.states.push(StateEntry {
            name: name.to_string(),
            code: code.to_string(),
        });
        self
    }

    pub fn with_city(mut self, name: &str, state: &str) -> Self {
        self.cities.push(CityEntry {
            name: name.to_string(),
            state: state.to_string(),
        });
        self
    }
}

impl Gazetteer for MemoryGazetteer {
    fn lookup_state(&self, text: &str) -> Option<String> {
        self.states
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(text) || s.code.eq_ignore_ascii_case(text))
            .map(|s| s.code.clone())
    }

    fn lookup_city(&self, text: &str, state: Option<&str>) -> Option<String> {
        self.cities
            .iter()
            .filter(|c| state.map_or(true, |code| c.state.eq_ignore_ascii_case(code)))
            .find(|c| c.name.eq_ignore_ascii_case(text))
            .map(|c| c.name.clone())
    }
}

/// The parts recognised in a road search sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadQuery {
    pub number: Option<i32>,
    pub name: String,
    pub suffix: Option<RoadSuffix>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

const MAX_CITY_WORDS: usize = 5;

fn is_zip(word: &str) -> bool {
    (4..=5).contains(&word.len()) && word.bytes().all(|b| b.is_ascii_digit())
}

fn parse_house_number(word: &str) -> Option<i32> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    word.parse().ok()
}

impl RoadQuery {
    /// Splits a sentence into house number, road name, suffix and place.
    ///
    /// Words are claimed from the outside in: a leading number (only when
    /// another word follows), a trailing 4-5 digit ZIP, a two- then one-word
    /// state, a city of up to five words, then a suffix. What remains is the
    /// road name. Returns `None` when no words are left for the name.
    pub fn parse(sentence: &str, gazetteer: &dyn Gazetteer) -> Option<RoadQuery> {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let mut rest: &[&str] = &words;
        let mut query = RoadQuery::default();

        if rest.len() >= 2 {
            if let Some(number) = parse_house_number(rest[0]) {
                query.number = Some(number);
                rest = &rest[1..];
            }
        }

        if let Some((last, init)) = rest.split_last() {
            if is_zip(last) {
                query.zip = Some(last.to_string());
                rest = init;
            }
        }

        if rest.is_empty() {
            log::debug!("search '{}' has no road name", sentence);
            return None;
        }

        if rest.len() >= 3 {
            let two = rest[rest.len() - 2..].join(" ");
            if let Some(code) = gazetteer.lookup_state(&two) {
                query.state = Some(code);
                rest = &rest[..rest.len() - 2];
            }
        }
        if query.state.is_none() && rest.len() >= 2 {
            if let Some(code) = gazetteer.lookup_state(rest[rest.len() - 1]) {
                query.state = Some(code);
                rest = &rest[..rest.len() - 1];
            }
        }

        for length in (1..=MAX_CITY_WORDS).rev() {
            if rest.len() > length {
                let candidate = rest[rest.len() - length..].join(" ");
                if let Some(city) = gazetteer.lookup_city(&candidate, query.state.as_deref()) {
                    query.city = Some(city);
                    rest = &rest[..rest.len() - length];
                    break;
                }
            }
        }

        if rest.len() >= 2 {
            if let Ok(suffix) = rest[rest.len() - 1].parse::<RoadSuffix>() {
                query.suffix = Some(suffix);
                rest = &rest[..rest.len() - 1];
            }
        }

        query.name = rest.join(" ");
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer() -> MemoryGazetteer {
        MemoryGazetteer::new()
            .with_state("Massachusetts", "MA")
            .with_state("New York", "NY")
            .with_city("Boston", "MA")
            .with_city("New York", "NY")
            .with_city("Salt Lake City", "UT")
    }

    #[test]
    fn test_suffix_forms() {
        assert_eq!("st".parse::<RoadSuffix>().unwrap(), RoadSuffix::Street);
        assert_eq!("AVENUE".parse::<RoadSuffix>().unwrap(), RoadSuffix::Avenue);
        assert_eq!("Blvd.".parse::<RoadSuffix>().unwrap(), RoadSuffix::Boulevard);
        assert!("Main".parse::<RoadSuffix>().is_err());
        assert_eq!(RoadSuffix::Street.to_string(), "Street");
    }

    #[test]
    fn test_full_address() {
        let q = RoadQuery::parse("150 Main St Boston MA 02139", &gazetteer()).unwrap();
        assert_eq!(q.number, Some(150));
        assert_eq!(q.name, "Main");
        assert_eq!(q.suffix, Some(RoadSuffix::Street));
        assert_eq!(q.city.as_deref(), Some("Boston"));
        assert_eq!(q.state.as_deref(), Some("MA"));
        assert_eq!(q.zip.as_deref(), Some("02139"));
    }

    #[test]
    fn test_two_word_state_and_city() {
        let q = RoadQuery::parse("12 Broad Way New York New York", &gazetteer()).unwrap();
        assert_eq!(q.state.as_deref(), Some("NY"));
        assert_eq!(q.city.as_deref(), Some("New York"));
        assert_eq!(q.suffix, Some(RoadSuffix::Way));
        assert_eq!(q.name, "Broad");
    }

    #[test]
    fn test_bare_name() {
        let q = RoadQuery::parse("Main", &gazetteer()).unwrap();
        assert_eq!(q.number, None);
        assert_eq!(q.name, "Main");
        assert_eq!(q.suffix, None);

        // A lone number is a road name, not a house number
        let q = RoadQuery::parse("66", &gazetteer()).unwrap();
        assert_eq!(q.number, None);
        assert_eq!(q.name, "66");
    }

    #[test]
    fn test_suffix_alone_is_the_name() {
        let q = RoadQuery::parse("Street", &gazetteer()).unwrap();
        assert_eq!(q.suffix, None);
        assert_eq!(q.name, "Street");
    }

    #[test]
    fn test_city_never_consumes_whole_name() {
        let q = RoadQuery::parse("Boston", &gazetteer()).unwrap();
        assert_eq!(q.city, None);
        assert_eq!(q.name, "Boston");
    }

    #[test]
    fn test_zip_only_has_no_name() {
        assert!(RoadQuery::parse("02139", &gazetteer()).is_none());
        assert!(RoadQuery::parse("150 02139", &gazetteer()).is_none());
        assert!(RoadQuery::parse("   ", &gazetteer()).is_none());
    }

    #[test]
    fn test_city_restricted_to_state() {
        let q = RoadQuery::parse("Elm St Boston NY", &gazetteer()).unwrap();
        assert_eq!(q.state.as_deref(), Some("NY"));
        assert_eq!(q.city, None);
        assert_eq!(q.name, "Elm St Boston");
    }
}
