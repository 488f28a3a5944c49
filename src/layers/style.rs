use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA colour, written in style documents as `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses exactly eight hex digits, with or without a leading `#`
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MapError::Style(format!(
                "colour '{}' is not #RRGGBBAA",
                text
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| MapError::Style(format!("colour '{}': {}", text, e)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl FromStr for Color {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Line end decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// How a layer's geometry is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderType {
    Lines,
    Polygons,
    LineLabels,
    PolygonLabels,
    /// Full-viewport wash painted before any geometry
    Fill,
    Locations,
}

impl RenderType {
    pub fn name(self) -> &'static str {
        match self {
            RenderType::Lines => "lines",
            RenderType::Polygons => "polygons",
            RenderType::LineLabels => "line-labels",
            RenderType::PolygonLabels => "polygon-labels",
            RenderType::Fill => "fill",
            RenderType::Locations => "locations",
        }
    }
}

impl FromStr for RenderType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        [
            RenderType::Lines,
            RenderType::Polygons,
            RenderType::LineLabels,
            RenderType::PolygonLabels,
            RenderType::Fill,
            RenderType::Locations,
        ]
        .into_iter()
        .find(|t| t.name() == wanted)
        .ok_or_else(|| MapError::Style(format!("unknown render type '{}'", s)))
    }
}

/// Resolved style of one layer at one style bucket.
///
/// The default style draws nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    pub color: Color,
    /// Line width in pixels
    pub line_width: f64,
    /// Alternating on/off lengths in pixels; empty for a solid line
    pub dash: Vec<u8>,
    pub cap: LineCap,
    /// Texture tiled by fill layers instead of the flat colour
    pub fill_glyph: Option<String>,
    pub pixel_offset_x: i16,
    pub pixel_offset_y: i16,
    /// Label text size in points
    pub font_size: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            line_width: 0.0,
            dash: Vec::new(),
            cap: LineCap::Butt,
            fill_glyph: None,
            pixel_offset_x: 0,
            pixel_offset_y: 0,
            font_size: 0.0,
        }
    }
}

impl LayerStyle {
    /// A line needs width and a colour that is not fully transparent
    pub fn draws_lines(&self) -> bool {
        self.line_width > 0.0 && !self.color.is_transparent()
    }

    pub fn draws_fill(&self) -> bool {
        self.fill_glyph.is_some() || !self.color.is_transparent()
    }

    pub fn draws_labels(&self) -> bool {
        self.font_size > 0.0 && !self.color.is_transparent()
    }
}
