//! The data-driven layer list.
//!
//! A scene is loaded from a style document: an ordered list of layers, each
//! naming its data source, how it renders, and one resolved style per style
//! bucket. The list is authoritative: its first entry is the top-most layer,
//! so drawing walks it from the end.

use crate::core::zoom::{MAX_STYLE_BUCKET, MIN_STYLE_BUCKET};
use crate::data::object::ObjectType;
use crate::layers::style::{LayerStyle, RenderType};
use crate::{MapError, Result};
use serde::Deserialize;

const DEFAULT_STYLE: &str = include_str!("../../data/default_style.json");

const NUM_STYLE_BUCKETS: usize = (MAX_STYLE_BUCKET - MIN_STYLE_BUCKET + 1) as usize;

/// One entry of the layer list
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayer {
    pub name: String,
    /// Object type drawn by this layer; fills have none
    pub data_source: Option<ObjectType>,
    pub render_type: RenderType,
    styles: [LayerStyle; NUM_STYLE_BUCKETS],
}

impl SceneLayer {
    /// Style at a bucket; out-of-range buckets get the invisible default
    pub fn style(&self, bucket: u8) -> &LayerStyle {
        static INVISIBLE: once_cell::sync::Lazy<LayerStyle> =
            once_cell::sync::Lazy::new(LayerStyle::default);
        bucket
            .checked_sub(MIN_STYLE_BUCKET)
            .and_then(|i| self.styles.get(i as usize))
            .unwrap_or(&INVISIBLE)
    }
}

/// One step of the back-to-front draw sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStep<'a> {
    pub layer_index: usize,
    pub layer: &'a SceneLayer,
    pub render_type: RenderType,
    pub style: &'a LayerStyle,
}

#[derive(Debug, Deserialize)]
struct SceneDocument {
    layers: Vec<LayerRecord>,
}

#[derive(Debug, Deserialize)]
struct LayerRecord {
    name: String,
    #[serde(default)]
    data_source: Option<ObjectType>,
    render_type: RenderType,
    #[serde(default)]
    styles: Vec<StyleRecord>,
}

#[derive(Debug, Deserialize)]
struct StyleRecord {
    /// Inclusive `[from, to]` bucket range
    buckets: [u8; 2],
    #[serde(flatten)]
    style: LayerStyle,
}

impl LayerRecord {
    fn into_layer(self) -> Result<SceneLayer> {
        if self.data_source.is_none()
            && !matches!(self.render_type, RenderType::Fill | RenderType::Locations)
        {
            return Err(MapError::Style(format!(
                "layer '{}' draws {} but has no data source",
                self.name,
                self.render_type.name()
            )));
        }

        let mut styles: [LayerStyle; NUM_STYLE_BUCKETS] = Default::default();
        for record in self.styles {
            let [from, to] = record.buckets;
            if from < MIN_STYLE_BUCKET || to > MAX_STYLE_BUCKET || from > to {
                return Err(MapError::Style(format!(
                    "layer '{}' has invalid bucket range {}-{}",
                    self.name, from, to
                )));
            }
            for bucket in from..=to {
                styles[(bucket - MIN_STYLE_BUCKET) as usize] = record.style.clone();
            }
        }

        Ok(SceneLayer {
            name: self.name,
            data_source: self.data_source,
            render_type: self.render_type,
            styles,
        })
    }
}

/// The ordered layer list with per-bucket styles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    layers: Vec<SceneLayer>,
}

impl Scene {
    /// Parses a style document
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SceneDocument = serde_json::from_str(json)?;
        let layers = document
            .layers
            .into_iter()
            .map(LayerRecord::into_layer)
            .collect::<Result<Vec<_>>>()?;
        log::debug!("loaded scene with {} layer(s)", layers.len());
        Ok(Self { layers })
    }

    /// The bundled style
    pub fn default_style() -> Result<Self> {
        Self::from_json(DEFAULT_STYLE)
    }

    /// Replaces the layer list from a new document.
    ///
    /// On error the current layers are kept. The zoom table is not affected.
    pub fn reload_styles(&mut self, json: &str) -> Result<()> {
        *self = Self::from_json(json)?;
        Ok(())
    }

    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Back-to-front draw sequence for a style bucket.
    ///
    /// Fill layers come first, then every other layer from the end of the
    /// list to its start.
    pub fn draw_order(&self, bucket: u8) -> Result<Vec<DrawStep<'_>>> {
        if !(MIN_STYLE_BUCKET..=MAX_STYLE_BUCKET).contains(&bucket) {
            return Err(MapError::OutOfRange {
                what: "style bucket",
                value: bucket as f64,
            });
        }

        let reversed = || self.layers.iter().enumerate().rev();
        let fills = reversed().filter(|(_, l)| l.render_type == RenderType::Fill);
        let geometry = reversed().filter(|(_, l)| l.render_type != RenderType::Fill);

        Ok(fills
            .chain(geometry)
            .map(|(layer_index, layer)| DrawStep {
                layer_index,
                layer,
                render_type: layer.render_type,
                style: layer.style(bucket),
            })
            .collect())
    }

    /// Object types any layer draws, in list order without repeats
    pub fn data_sources(&self) -> Vec<ObjectType> {
        let mut sources = Vec::new();
        for source in self.layers.iter().filter_map(|l| l.data_source) {
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources
    }

    /// Whether any layer shows location pins
    pub fn shows_locations(&self) -> bool {
        self.layers
            .iter()
            .any(|l| l.render_type == RenderType::Locations)
    }

    /// Widest visible line drawn for an object type at a bucket, if any
    pub fn max_line_width(&self, object_type: ObjectType, bucket: u8) -> Option<f64> {
        self.layers
            .iter()
            .filter(|l| l.render_type == RenderType::Lines && l.data_source == Some(object_type))
            .map(|l| l.style(bucket))
            .filter(|s| s.draws_lines())
            .map(|s| s.line_width)
            .reduce(f64::max)
    }
}
