//! Configuration system for interaction and rendering tuning
//!
//! Values come from presets or from a JSON document; every field has a
//! default, so a partial document only overrides what it names.

use crate::animation::animator::AnimationCurve;
use crate::rendering::redraw::RedrawReason;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionProfile {
    Smooth,
    Snappy,
    Custom(InteractionConfig),
}

impl InteractionProfile {
    pub fn resolve(&self) -> InteractionConfig {
        match self {
            Self::Smooth => InteractionConfig::default(),
            Self::Snappy => InteractionConfig {
                slide_seconds: 0.2,
                auto_slide_seconds: 0.4,
                max_auto_slide_pixels: 1500.0,
                ..InteractionConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for InteractionProfile {
    fn default() -> Self {
        Self::Smooth
    }
}

/// Top-level configuration for a map session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub interaction: InteractionConfig,
    pub redraw: RedrawConfig,
    pub render: RenderConfig,
    pub selection: SelectionConfig,
}

impl MapConfig {
    /// Parses a (possibly partial) JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_profile(profile: InteractionProfile) -> Self {
        Self {
            interaction: profile.resolve(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pan animation after a double click
    pub slide_seconds: f64,
    pub slide_curve: AnimationCurve,
    /// Pan animation towards a search result
    pub auto_slide_seconds: f64,
    pub auto_slide_curve: AnimationCurve,
    /// Farther targets jump instead of sliding
    pub max_auto_slide_pixels: f64,
    /// Width of the clickable strip along the viewport edges
    pub border_pixels: u32,
    /// Added to half the road's drawn width when hit-testing roads
    pub road_hit_slack_pixels: f64,
    pub location_hit_radius_pixels: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            slide_seconds: 0.4,
            slide_curve: AnimationCurve::FastThenSlide,
            auto_slide_seconds: 0.8,
            auto_slide_curve: AnimationCurve::FastThenSlide,
            max_auto_slide_pixels: 3500.0,
            border_pixels: 20,
            road_hit_slack_pixels: 3.0,
            location_hit_radius_pixels: 8.0,
        }
    }
}

/// Debounce timeouts for the full-fidelity redraw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedrawConfig {
    pub scroll_ms: u64,
    pub zoom_ms: u64,
    pub drag_ms: u64,
    pub resize_ms: u64,
}

impl RedrawConfig {
    pub fn timeout(&self, reason: RedrawReason) -> Duration {
        let ms = match reason {
            RedrawReason::Scroll => self.scroll_ms,
            RedrawReason::Zoom => self.zoom_ms,
            RedrawReason::Drag => self.drag_ms,
            RedrawReason::Resize => self.resize_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for RedrawConfig {
    fn default() -> Self {
        Self {
            scroll_ms: 110,
            zoom_ms: 180,
            drag_ms: 250,
            resize_ms: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Geometry with more vertices than this is skipped
    pub max_vertices: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_vertices: crate::constants::MAX_LINE_SEGMENTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Further selections are refused with a `false` return
    pub max_selections: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { max_selections: 8 }
    }
}
