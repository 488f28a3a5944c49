pub mod events;
pub mod hit;

// Re-export the essential types
pub use events::{match_border, Direction, InputEvent};
pub use hit::{HitKind, HitResult};
