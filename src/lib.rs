//! # vectormap
//!
//! The geometry core of a vector road map: world/screen transforms, a fixed
//! zoom table with style buckets, polyline clipping, data-driven draw order,
//! hit testing, road address interpolation and location search.
//!
//! Drawing, windowing and storage are external collaborators. The core emits
//! abstract draw calls through [`rendering::backend::RenderBackend`] and reads
//! geometry through an injected [`spatial::store::SpatialStore`].
//!
//! All types assume a single control thread: callers serialize access to a
//! [`Map`] and its session state.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod search;
pub mod session;
pub mod spatial;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::{PixelPoint, ScreenPoint, ScreenRect},
    geo::{classify_overlap, Overlap, WorldPoint, WorldRect},
    history::History,
    map::Map,
    metrics::RenderMetrics,
    viewport::{Dimensions, MapView},
    zoom::ZoomLevel,
};

pub use data::{
    object::{Location, MapObject, ObjectType},
    wkb::DecodeError,
};

pub use spatial::{
    clip::clip_polyline_to_rect,
    store::{MemoryStore, SpatialStore},
};

pub use layers::{scene::Scene, style::LayerStyle};

pub use rendering::{
    backend::{RecordingBackend, RenderBackend},
    pipeline::{DrawFlags, DrawStats},
};

pub use input::hit::{HitKind, HitResult};

pub use animation::animator::{AnimationCurve, Animator};

pub use search::{
    address::{interpolate_address_point, AddressRange, RoadSide},
    location::search_locations,
    result::{search_all, MatchSource, SearchResult},
    road::search_roads,
};

pub use session::{ClickOutcome, MapSession};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("style error: {0}")]
    Style(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
