pub mod clip;
pub mod culling;
pub mod index;
pub mod store;

pub use clip::{clip_polyline_runs, clip_polyline_to_rect};
pub use culling::Culling;
pub use index::{SpatialIndex, SpatialItem};
pub use store::{MemoryStore, SpatialStore, StoreDocument, TileStore};
