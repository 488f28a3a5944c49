use crate::core::bounds::{PixelPoint, ScreenPoint};
use crate::core::viewport::Dimensions;
use crate::layers::style::LayerStyle;
use crate::rendering::pipeline::DrawFlags;

/// Receiver of the ordered draw calls for one frame.
///
/// Points are already transformed, clipped and offset; implementations only
/// rasterize them.
pub trait RenderBackend {
    /// Called once before the first draw call of a frame
    fn begin_frame(&mut self, _dimensions: Dimensions, _flags: DrawFlags) {}

    /// Paints the whole viewport. A textured fill aligns its tiles to
    /// `texture_origin` so the texture scrolls with the map.
    fn fill_viewport(&mut self, style: &LayerStyle, texture_origin: PixelPoint);

    fn draw_polyline(&mut self, points: &[ScreenPoint], style: &LayerStyle);

    fn draw_polygon(&mut self, points: &[ScreenPoint], style: &LayerStyle);

    /// Backends without text support may ignore labels
    fn draw_label(&mut self, _text: &str, _anchor: ScreenPoint, _style: &LayerStyle) {}

    fn end_frame(&mut self) {}
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill {
        style: LayerStyle,
        texture_origin: PixelPoint,
    },
    Polyline {
        points: Vec<ScreenPoint>,
        style: LayerStyle,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        style: LayerStyle,
    },
    Label {
        text: String,
        anchor: ScreenPoint,
        style: LayerStyle,
    },
}

/// A backend that keeps every call, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub frames: usize,
    pub calls: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[ScreenPoint]> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &[ScreenPoint]> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Polygon { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, _dimensions: Dimensions, _flags: DrawFlags) {
        self.frames += 1;
    }

    fn fill_viewport(&mut self, style: &LayerStyle, texture_origin: PixelPoint) {
        self.calls.push(DrawCall::Fill {
            style: style.clone(),
            texture_origin,
        });
    }

    fn draw_polyline(&mut self, points: &[ScreenPoint], style: &LayerStyle) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], style: &LayerStyle) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_label(&mut self, text: &str, anchor: ScreenPoint, style: &LayerStyle) {
        self.calls.push(DrawCall::Label {
            text: text.to_string(),
            anchor,
            style: style.clone(),
        });
    }
}
