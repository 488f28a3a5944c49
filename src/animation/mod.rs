pub mod animator;
pub mod interpolation;
pub mod transitions;

// Re-export commonly used types for convenience
pub use animator::{AnimationCurve, Animator};
pub use interpolation::{Interpolatable, Interpolation};
pub use transitions::Slide;
