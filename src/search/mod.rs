pub mod address;
pub mod location;
pub mod query;
pub mod result;
pub mod road;

pub use address::{address_fraction, interpolate_address_point, AddressRange, RoadSide};
pub use location::{location_matches, search_locations, LocationDirectory};
pub use query::{Gazetteer, MemoryGazetteer, RoadQuery, RoadSuffix};
pub use result::{search_all, MatchSource, SearchResult};
pub use road::{filter_candidate, search_roads, RoadDirectory};
