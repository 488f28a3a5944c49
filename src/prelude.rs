//! Prelude module for common vectormap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use vectormap::prelude::*;`

pub use crate::core::{
    bounds::{PixelPoint, ScreenPoint, ScreenRect},
    config::{InteractionConfig, InteractionProfile, MapConfig},
    geo::{classify_overlap, DistanceUnit, Overlap, WorldPoint, WorldRect},
    history::{History, HistoryEntry},
    map::Map,
    metrics::RenderMetrics,
    selection::{LocationSelection, SelectionSet},
    viewport::{Dimensions, MapView},
    zoom::{
        ZoomLevel, LOCATION_RESULT_ZOOM_LEVEL, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL,
        SEARCH_RESULT_ZOOM_LEVEL,
    },
};

pub use crate::data::object::{Location, LocationAttribute, MapObject, ObjectType};

pub use crate::layers::{scene::Scene, style::LayerStyle};

pub use crate::spatial::{
    clip::{clip_polyline_runs, clip_polyline_to_rect},
    store::{MemoryStore, SpatialStore, StoreDocument, TileStore},
};

pub use crate::rendering::{
    backend::{DrawCall, RecordingBackend, RenderBackend},
    pipeline::{DrawFlags, DrawStats},
};

pub use crate::input::{
    events::{Direction, InputEvent},
    hit::{HitKind, HitResult},
};

pub use crate::animation::{AnimationCurve, Animator, Slide};

pub use crate::search::{
    address::{address_fraction, interpolate_address_point, AddressRange, RoadSide},
    query::{Gazetteer, MemoryGazetteer, RoadQuery},
    location::{search_locations, LocationDirectory},
    result::{search_all, MatchSource, SearchResult},
    road::{search_roads, RoadDirectory},
};

pub use crate::session::{ClickOutcome, MapSession};

pub use crate::{MapError, Result};

// Re-export commonly used external types
pub use fxhash::FxHashMap as HashMap;
