//! Pointer-driven editing: drafts, selection, moves and handle drags.
//!
//! The [`Controller`] receives pointer positions already mapped into image
//! space and mutates a scene's [`SceneState`](crate::scene::SceneState).

mod controller;

pub use controller::{Controller, Draft, PointerOutcome};

use crate::constants::{
    DEFAULT_MOSAIC_BLOCK_SIZE, DEFAULT_STROKE_WIDTH, MIN_MOSAIC_BLOCK_SIZE,
};
use crate::model::Rgba;

/// Style applied to newly drawn objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    stroke_color: Rgba,
    stroke_width: f64,
    mosaic_block_size: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            mosaic_block_size: DEFAULT_MOSAIC_BLOCK_SIZE,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the stroke color.
    pub fn with_stroke_color(mut self, color: Rgba) -> Self {
        self.set_stroke_color(color);
        self
    }

    /// Builder: set the stroke width.
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.set_stroke_width(width);
        self
    }

    /// Builder: set the mosaic block size.
    pub fn with_mosaic_block_size(mut self, size: f64) -> Self {
        self.set_mosaic_block_size(size);
        self
    }

    pub fn stroke_color(&self) -> Rgba {
        self.stroke_color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn mosaic_block_size(&self) -> u32 {
        self.mosaic_block_size
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke_color = color;
    }

    /// Non-finite or non-positive widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.stroke_width = width;
        }
    }

    /// Round to whole pixels and clamp to at least [`MIN_MOSAIC_BLOCK_SIZE`].
    pub fn set_mosaic_block_size(&mut self, size: f64) {
        let rounded = if size.is_finite() { size.round() } else { 0.0 };
        self.mosaic_block_size = (rounded.min(f64::from(u32::MAX)) as u32).max(MIN_MOSAIC_BLOCK_SIZE);
    }
}
