pub mod backend;
pub mod pipeline;
pub mod redraw;

// Re-export main types
pub use backend::{DrawCall, RecordingBackend, RenderBackend};
pub use pipeline::{DrawFlags, DrawStats, FramePipeline};
pub use redraw::{RedrawReason, RedrawScheduler};
