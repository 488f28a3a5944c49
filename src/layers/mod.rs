pub mod scene;
pub mod style;

pub use scene::{DrawStep, Scene, SceneLayer};
pub use style::{Color, LayerStyle, LineCap, RenderType};
